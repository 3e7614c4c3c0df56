use log::{error, warn};
use rocket::{http::Status, response::Responder};
use thiserror::Error;

use crate::model::mongodb::Id;
use crate::store::StoreError;
use crate::wizard::TransitionError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The candidate directory could not be read.
    #[error("Failed to fetch candidates: {0}")]
    FetchCandidates(#[source] StoreError),
    /// Submission failed before anything was stored.
    #[error("Failed to create voter record: {0}")]
    VoterCreate(#[source] StoreError),
    /// Submission failed after the voter record was stored.
    #[error("Failed to create votes for voter {voter_id}: {source}")]
    VoteCreate { voter_id: Id, source: StoreError },
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error("Session {0} is busy with another operation")]
    Busy(Id),
    #[error("Not found: {0}")]
    NotFound(String),
}

impl Error {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn status(&self) -> Status {
        match self {
            Self::FetchCandidates(_) | Self::VoterCreate(_) | Self::VoteCreate { .. } => {
                Status::BadGateway
            }
            Self::Transition(TransitionError::Illegal { .. }) | Self::Busy(_) => Status::Conflict,
            Self::Transition(_) => Status::BadRequest,
            Self::NotFound(_) => Status::NotFound,
        }
    }
}

impl<'r, 'o: 'r> Responder<'r, 'o> for Error {
    fn respond_to(self, _: &'r rocket::Request<'_>) -> rocket::response::Result<'o> {
        let status = self.status();
        if status.code >= 500 {
            error!("{self}");
        } else {
            warn!("{self}");
        }
        Err(status)
    }
}
