//! API-compatible types.
//!
//! The types in this module are serialised in an API-friendly way, e.g.:
//!
//! - IDs are serialised as hex strings.
//! - Enumerations carry their human-readable labels alongside them.

mod id;
pub use id::ApiId;

mod request;
pub use request::{CandidateChoice, NameEntry, RoleChoice};

mod view;
pub use view::{
    CandidateDesc, ConfirmationView, PositionDesc, ReviewEntry, ReviewView, RoleDesc,
    VotingView, WizardView,
};
