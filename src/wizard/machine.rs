use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::VotingSession;
use crate::model::{
    common::{CandidateId, ElectionPosition, VoterRole, POSITION_COUNT},
    mongodb::Id,
};

/// Where the voter is in the wizard.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum Step {
    /// Choosing staff or HOD.
    #[default]
    Role,
    /// Staff only: entering a name.
    Name,
    /// Choosing a candidate for the position at `cursor` in ballot order.
    Voting { cursor: usize },
    /// Checking every choice before submitting.
    Review,
    /// Ballot stored. Terminal until the voter starts over.
    Confirmation,
}

/// [`Step`] without its payload, as reported to clients.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Role,
    Name,
    Voting,
    Review,
    Confirmation,
}

impl Step {
    pub fn kind(self) -> StepKind {
        match self {
            Self::Role => StepKind::Role,
            Self::Name => StepKind::Name,
            Self::Voting { .. } => StepKind::Voting,
            Self::Review => StepKind::Review,
            Self::Confirmation => StepKind::Confirmation,
        }
    }

    /// The position being voted on, if in the voting step.
    pub fn position(self) -> Option<ElectionPosition> {
        match self {
            Self::Voting { cursor } => ElectionPosition::at(cursor),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self.kind() {
            StepKind::Role => "role",
            StepKind::Name => "name",
            StepKind::Voting => "voting",
            StepKind::Review => "review",
            StepKind::Confirmation => "confirmation",
        }
    }
}

/// Why an event was refused. The wizard is unchanged whenever one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Cannot {event} during the {step} step")]
    Illegal {
        event: &'static str,
        step: &'static str,
    },
    #[error("Name must not be empty")]
    EmptyName,
    #[error("Candidate ID must not be empty")]
    EmptyCandidate,
    #[error("No candidate selected for {0}")]
    NoSelection(ElectionPosition),
    #[error("At least one selection is required before submitting")]
    NothingSelected,
}

/// The wizard's state machine: the current step plus the session it is filling in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Wizard {
    step: Step,
    session: VotingSession,
}

impl Wizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn session(&self) -> &VotingSession {
        &self.session
    }

    /// Role chosen. HODs skip the name step.
    pub fn choose_role(&mut self, role: VoterRole) -> Result<Step, TransitionError> {
        self.expect(Step::Role, "choose a role")?;
        self.session.role = role;
        if role.asks_for_name() {
            self.step = Step::Name;
        } else {
            // A name typed before switching to HOD is not theirs to keep.
            self.session.voter_name = None;
            self.step = Step::Voting { cursor: 0 };
        }
        Ok(self.step)
    }

    /// Name submitted. Surrounding whitespace is dropped.
    pub fn submit_name(&mut self, name: &str) -> Result<Step, TransitionError> {
        self.expect(Step::Name, "submit a name")?;
        let name = name.trim();
        if name.is_empty() {
            return Err(TransitionError::EmptyName);
        }
        self.session.voter_name = Some(name.to_string());
        self.step = Step::Voting { cursor: 0 };
        Ok(self.step)
    }

    /// The position currently being voted on.
    pub fn current_position(
        &self,
        event: &'static str,
    ) -> Result<ElectionPosition, TransitionError> {
        self.step.position().ok_or(TransitionError::Illegal {
            event,
            step: self.step.name(),
        })
    }

    /// Choose a candidate for the current position without moving on.
    /// Replaces any earlier choice for that position.
    pub fn mark(&mut self, candidate: impl Into<CandidateId>) -> Result<Step, TransitionError> {
        let position = self.current_position("select a candidate")?;
        let candidate = candidate.into();
        if candidate.trim().is_empty() {
            return Err(TransitionError::EmptyCandidate);
        }
        self.session.select(position, candidate);
        Ok(self.step)
    }

    /// Accept the current position's choice and move to the next position,
    /// or to review after the last one.
    pub fn next(&mut self) -> Result<Step, TransitionError> {
        let position = self.current_position("move to the next position")?;
        if self.session.selection(position).is_none() {
            return Err(TransitionError::NoSelection(position));
        }
        self.step = match ElectionPosition::at(position.index() + 1) {
            Some(next) => Step::Voting {
                cursor: next.index(),
            },
            None => Step::Review,
        };
        Ok(self.step)
    }

    /// Choose a candidate for the current position and move on in one go.
    pub fn select(&mut self, candidate: impl Into<CandidateId>) -> Result<Step, TransitionError> {
        self.mark(candidate)?;
        self.next()
    }

    /// Go back one step. Leaving the first position returns to wherever the
    /// voter came from, which depends on their role.
    pub fn back(&mut self) -> Result<Step, TransitionError> {
        self.step = match self.step {
            Step::Name => Step::Role,
            Step::Voting { cursor: 0 } => {
                if self.session.role.asks_for_name() {
                    Step::Name
                } else {
                    Step::Role
                }
            }
            Step::Voting { cursor } => Step::Voting { cursor: cursor - 1 },
            Step::Review => Step::Voting {
                cursor: POSITION_COUNT - 1,
            },
            step @ (Step::Role | Step::Confirmation) => {
                return Err(TransitionError::Illegal {
                    event: "go back",
                    step: step.name(),
                })
            }
        };
        Ok(self.step)
    }

    /// Reopen one position from the review. Its current choice stays selected.
    pub fn edit(&mut self, position: ElectionPosition) -> Result<Step, TransitionError> {
        self.expect(Step::Review, "edit a position")?;
        self.step = Step::Voting {
            cursor: position.index(),
        };
        Ok(self.step)
    }

    /// The session, if it is ready to be submitted.
    pub fn ready_to_submit(&self) -> Result<&VotingSession, TransitionError> {
        self.expect(Step::Review, "submit")?;
        if self.session.selection_count() == 0 {
            return Err(TransitionError::NothingSelected);
        }
        Ok(&self.session)
    }

    /// The ballot was stored under `voter_id`.
    pub fn complete(&mut self, voter_id: Id) -> Result<Step, TransitionError> {
        self.ready_to_submit()?;
        self.session.voter_id = Some(voter_id);
        self.step = Step::Confirmation;
        Ok(self.step)
    }

    /// Forget everything and return to the first step.
    pub fn start_over(&mut self) -> Result<Step, TransitionError> {
        self.expect(Step::Confirmation, "start over")?;
        *self = Self::new();
        Ok(self.step)
    }

    fn expect(&self, step: Step, event: &'static str) -> Result<(), TransitionError> {
        if self.step == step {
            Ok(())
        } else {
            Err(TransitionError::Illegal {
                event,
                step: self.step.name(),
            })
        }
    }
}
