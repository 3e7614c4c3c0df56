//! The voting wizard: a per-voter state machine, the session it fills in,
//! and the sequence of writes that turns a reviewed session into a ballot.

mod machine;
mod registry;
mod session;
pub mod submission;

pub use machine::{Step, StepKind, TransitionError, Wizard};
pub use registry::{SessionRegistry, WizardSession};
pub use session::VotingSession;
