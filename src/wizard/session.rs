use std::collections::{BTreeMap, HashSet};

use crate::model::{
    common::{CandidateId, ElectionPosition, Points, VoterRole},
    mongodb::Id,
};

/// Everything a voter has told the wizard so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VotingSession {
    pub(super) role: VoterRole,
    pub(super) voter_name: Option<String>,
    /// Only set once the ballot has been stored.
    pub(super) voter_id: Option<Id>,
    /// At most one choice per position. Iterates in ballot order.
    selections: BTreeMap<ElectionPosition, CandidateId>,
}

impl VotingSession {
    pub fn role(&self) -> VoterRole {
        self.role
    }

    pub fn voter_name(&self) -> Option<&str> {
        self.voter_name.as_deref()
    }

    pub fn voter_id(&self) -> Option<Id> {
        self.voter_id
    }

    pub fn selection(&self, position: ElectionPosition) -> Option<&CandidateId> {
        self.selections.get(&position)
    }

    pub fn selections(&self) -> &BTreeMap<ElectionPosition, CandidateId> {
        &self.selections
    }

    /// The distinct candidates chosen so far.
    pub fn selected_ids(&self) -> HashSet<CandidateId> {
        self.selections.values().cloned().collect()
    }

    pub fn selection_count(&self) -> usize {
        self.selections.len()
    }

    /// Points carried by each vote in this session.
    pub fn points_per_vote(&self) -> Points {
        self.role.points()
    }

    /// Combined weight of every selection.
    pub fn total_points(&self) -> Points {
        self.points_per_vote() * self.selections.len() as Points
    }

    /// Record a choice, replacing any earlier one for the same position.
    pub(super) fn select(&mut self, position: ElectionPosition, candidate: CandidateId) {
        self.selections.insert(position, candidate);
    }
}
