use serde::{Deserialize, Serialize};

use crate::model::common::{CandidateId, VoterRole};

/// Body of `POST /wizard/<id>/role`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleChoice {
    pub role: VoterRole,
}

/// Body of `POST /wizard/<id>/name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameEntry {
    pub name: String,
}

/// Body of `POST /wizard/<id>/mark` and `POST /wizard/<id>/select`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateChoice {
    pub candidate_id: CandidateId,
}
