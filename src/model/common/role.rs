use mongodb::bson::{to_bson, Bson};
use serde::{Deserialize, Serialize};

use super::Points;

/// The capacity in which someone votes. This fixes the weight of every vote they cast.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoterRole {
    /// Ordinary staff member. Asked for their name.
    #[default]
    Staff,
    /// Head of department. Skips the name step.
    Hod,
}

impl VoterRole {
    /// Points carried by each vote cast in this role.
    pub const fn points(self) -> Points {
        match self {
            Self::Staff => 30,
            Self::Hod => 50,
        }
    }

    /// Whether the wizard asks for a name before voting.
    pub fn asks_for_name(self) -> bool {
        self == Self::Staff
    }

    /// Human-readable name.
    pub fn label(self) -> &'static str {
        match self {
            Self::Staff => "Staff Member",
            Self::Hod => "Head of Department",
        }
    }
}

impl From<VoterRole> for Bson {
    fn from(role: VoterRole) -> Self {
        to_bson(&role).expect("Serialisation is infallible")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights() {
        assert_eq!(VoterRole::Staff.points(), 30);
        assert_eq!(VoterRole::Hod.points(), 50);
        assert_eq!(VoterRole::default(), VoterRole::Staff);
    }

    #[test]
    fn serialised_lowercase() {
        assert_eq!(Bson::from(VoterRole::Hod), Bson::String("hod".to_string()));
        assert_eq!(
            Bson::from(VoterRole::Staff),
            Bson::String("staff".to_string())
        );
    }
}
