//! What a client should show for each step of the wizard.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::ApiId;
use crate::model::{
    common::{CandidateId, ElectionPosition, Points, VoterRole, POSITION_COUNT},
    db::Candidate,
    mongodb::Id,
};
use crate::wizard::{Step, StepKind, VotingSession, Wizard};

/// A role with its label and vote weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleDesc {
    pub role: VoterRole,
    pub label: &'static str,
    pub points: Points,
}

impl From<VoterRole> for RoleDesc {
    fn from(role: VoterRole) -> Self {
        Self {
            role,
            label: role.label(),
            points: role.points(),
        }
    }
}

/// A position with its label and 1-based place on the ballot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PositionDesc {
    pub position: ElectionPosition,
    pub label: &'static str,
    pub number: usize,
}

impl From<ElectionPosition> for PositionDesc {
    fn from(position: ElectionPosition) -> Self {
        Self {
            position,
            label: position.label(),
            number: position.index() + 1,
        }
    }
}

/// A candidate as shown to voters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateDesc {
    pub id: CandidateId,
    pub name: String,
    pub position: ElectionPosition,
}

impl From<Candidate> for CandidateDesc {
    fn from(candidate: Candidate) -> Self {
        Self {
            id: candidate.id,
            name: candidate.name,
            position: candidate.position,
        }
    }
}

/// The voting step for one position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VotingView {
    #[serde(flatten)]
    pub position: PositionDesc,
    pub total: usize,
    /// Percentage of the ballot reached, counting this position.
    pub progress: u8,
    /// Sorted by name. Empty if nobody is standing or the directory failed.
    pub candidates: Vec<CandidateDesc>,
    pub selected: Option<CandidateId>,
    /// Whether the "next" action is available.
    pub can_advance: bool,
    pub next_label: &'static str,
}

impl VotingView {
    pub fn new(
        position: ElectionPosition,
        candidates: Vec<Candidate>,
        selected: Option<&CandidateId>,
    ) -> Self {
        let position = PositionDesc::from(position);
        let progress = (position.number * 100 / POSITION_COUNT) as u8;
        let next_label = if position.position.is_last() {
            "Review Votes"
        } else {
            "Next Position"
        };
        Self {
            position,
            total: POSITION_COUNT,
            progress,
            candidates: candidates.into_iter().map(CandidateDesc::from).collect(),
            selected: selected.cloned(),
            can_advance: selected.is_some(),
            next_label,
        }
    }
}

/// One row of the review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewEntry {
    #[serde(flatten)]
    pub position: PositionDesc,
    pub candidate_id: Option<CandidateId>,
    /// Absent if nothing was chosen or the directory does not know the candidate.
    pub candidate_name: Option<String>,
    pub points: Points,
}

/// The review step: every position, in ballot order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewView {
    pub entries: Vec<ReviewEntry>,
    pub selections: usize,
    pub points_per_vote: Points,
    pub total_points: Points,
    pub can_submit: bool,
}

impl ReviewView {
    pub fn new(session: &VotingSession, known: &HashMap<CandidateId, Candidate>) -> Self {
        let points = session.points_per_vote();
        let entries = ElectionPosition::ORDER
            .into_iter()
            .map(|position| {
                let candidate_id = session.selection(position).cloned();
                let candidate_name = candidate_id
                    .as_ref()
                    .and_then(|id| known.get(id))
                    .map(|candidate| candidate.name.clone());
                ReviewEntry {
                    position: position.into(),
                    candidate_id,
                    candidate_name,
                    points,
                }
            })
            .collect();
        Self {
            entries,
            selections: session.selection_count(),
            points_per_vote: points,
            total_points: session.total_points(),
            can_submit: session.selection_count() > 0,
        }
    }
}

/// The confirmation step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfirmationView {
    pub voter_id: Option<ApiId>,
    pub positions_voted: usize,
    pub points_per_vote: Points,
    pub total_points: Points,
}

impl From<&VotingSession> for ConfirmationView {
    fn from(session: &VotingSession) -> Self {
        Self {
            voter_id: session.voter_id().map(ApiId::from),
            positions_voted: session.selection_count(),
            points_per_vote: session.points_per_vote(),
            total_points: session.total_points(),
        }
    }
}

/// Everything a client needs to render the current step of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WizardView {
    pub session_id: ApiId,
    pub step: StepKind,
    pub role: RoleDesc,
    pub voter_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voting: Option<VotingView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review: Option<ReviewView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmation: Option<ConfirmationView>,
    pub notice: Option<String>,
}

impl WizardView {
    /// The parts of the view that need no candidate data.
    /// Voting and review details are attached with [`Self::with_voting`]
    /// and [`Self::with_review`].
    pub fn new(session_id: Id, wizard: &Wizard) -> Self {
        let session = wizard.session();
        let confirmation = match wizard.step() {
            Step::Confirmation => Some(ConfirmationView::from(session)),
            _ => None,
        };
        Self {
            session_id: session_id.into(),
            step: wizard.step().kind(),
            role: session.role().into(),
            voter_name: session.voter_name().map(str::to_string),
            voting: None,
            review: None,
            confirmation,
            notice: None,
        }
    }

    pub fn with_voting(mut self, voting: VotingView) -> Self {
        self.voting = Some(voting);
        self
    }

    pub fn with_review(mut self, review: ReviewView) -> Self {
        self.review = Some(review);
        self
    }

    pub fn with_notice(mut self, notice: Option<String>) -> Self {
        self.notice = notice;
        self
    }
}
