use chrono::{DateTime, Utc};
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};

use crate::model::common::{CandidateId, ElectionPosition};

/// A candidate standing for one position, as stored in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(rename = "_id")]
    pub id: CandidateId,
    /// Display name.
    pub name: String,
    /// The position they are standing for.
    pub position: ElectionPosition,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl Candidate {
    pub fn new(
        id: impl Into<CandidateId>,
        name: impl Into<String>,
        position: ElectionPosition,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            position,
            created_at: Utc::now(),
        }
    }
}

/// Example data for tests.
#[cfg(test)]
pub mod examples {
    use super::*;

    use ElectionPosition::*;

    impl Candidate {
        /// A full slate: at least one candidate for every position, two for most.
        pub fn examples() -> Vec<Self> {
            vec![
                Self::new("c1", "Ama Owusu", VicePresident),
                Self::new("c2", "Bola Adeyemi", VicePresident),
                Self::new("c3", "Chidi Okafor", Secretary),
                Self::new("c4", "Abena Mensah", Secretary),
                Self::new("c5", "Efua Boateng", JointSecretary),
                Self::new("c6", "Femi Lawal", AssociateSecretary),
                Self::new("c7", "Grace Nwosu", AssociateSecretary),
                Self::new("c8", "Hassan Bello", JointTreasurer),
                Self::new("c9", "Ifeoma Eze", JointTreasurer),
            ]
        }

        /// The first example candidate for the given position.
        pub fn example_for(position: ElectionPosition) -> Self {
            Self::examples()
                .into_iter()
                .find(|c| c.position == position)
                .unwrap()
        }
    }
}
