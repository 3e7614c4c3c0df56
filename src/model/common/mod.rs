mod position;
mod role;

pub use position::{ElectionPosition, UnknownPosition, POSITION_COUNT};
pub use role::VoterRole;

/// Candidate IDs are opaque strings assigned by whoever maintains the directory.
pub type CandidateId = String;

/// Points carried by a single vote.
pub type Points = u32;
