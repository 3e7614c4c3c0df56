//! The wizard's view of the outside world: a read-only candidate directory
//! and an append-only ballot store.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use mongodb::error::Error as DbError;
use rocket::tokio::time::timeout;
use thiserror::Error;

use crate::model::{
    common::{CandidateId, ElectionPosition},
    db::{Candidate, NewVote, NewVoter},
    mongodb::Id,
};

#[cfg(test)]
pub mod memory;
mod mongo;

pub use mongo::MongoStore;

/// Ways a store call can fail.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The database rejected the operation or could not be reached.
    #[error(transparent)]
    Db(#[from] DbError),
    /// The store did not answer in time.
    #[error("Store did not respond within {0:?}")]
    Timeout(Duration),
    /// The store answered, but not usefully.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Read-only lookup of candidates.
#[rocket::async_trait]
pub trait CandidateDirectory: Send + Sync {
    /// All candidates standing for `position`, sorted by name. May be empty.
    async fn list_by_position(
        &self,
        position: ElectionPosition,
    ) -> Result<Vec<Candidate>, StoreError>;

    /// The candidates with the given IDs. Unknown IDs are absent from the result.
    async fn lookup_by_ids(
        &self,
        ids: &HashSet<CandidateId>,
    ) -> Result<HashMap<CandidateId, Candidate>, StoreError>;
}

/// Append-only writer for voter and vote records.
#[rocket::async_trait]
pub trait BallotStore: Send + Sync {
    /// Insert a voter, returning the ID the store generated for it.
    async fn create_voter(&self, voter: &NewVoter) -> Result<Id, StoreError>;

    /// Insert a batch of votes in one call.
    async fn create_votes(&self, votes: &[NewVote]) -> Result<(), StoreError>;
}

/// The store handles placed into managed state, with every call bounded by
/// a timeout.
#[derive(Clone)]
pub struct Stores {
    directory: Arc<dyn CandidateDirectory>,
    ballots: Arc<dyn BallotStore>,
    timeout: Duration,
}

impl Stores {
    pub fn new(
        directory: Arc<dyn CandidateDirectory>,
        ballots: Arc<dyn BallotStore>,
        timeout: Duration,
    ) -> Self {
        Self {
            directory,
            ballots,
            timeout,
        }
    }

    pub async fn list_by_position(
        &self,
        position: ElectionPosition,
    ) -> Result<Vec<Candidate>, StoreError> {
        self.bounded(self.directory.list_by_position(position))
            .await
    }

    pub async fn lookup_by_ids(
        &self,
        ids: &HashSet<CandidateId>,
    ) -> Result<HashMap<CandidateId, Candidate>, StoreError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        self.bounded(self.directory.lookup_by_ids(ids)).await
    }

    pub async fn create_voter(&self, voter: &NewVoter) -> Result<Id, StoreError> {
        self.bounded(self.ballots.create_voter(voter)).await
    }

    pub async fn create_votes(&self, votes: &[NewVote]) -> Result<(), StoreError> {
        self.bounded(self.ballots.create_votes(votes)).await
    }

    /// Run a store call, giving up once the configured timeout passes.
    async fn bounded<T, F>(&self, call: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        timeout(self.timeout, call)
            .await
            .unwrap_or(Err(StoreError::Timeout(self.timeout)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use memory::MemoryStore;

    fn stores(store: &MemoryStore, limit: Duration) -> Stores {
        Stores::new(Arc::new(store.clone()), Arc::new(store.clone()), limit)
    }

    #[rocket::async_test]
    async fn list_sorted_by_name() {
        let store = MemoryStore::with_examples();
        let names = stores(&store, Duration::from_secs(1))
            .list_by_position(ElectionPosition::Secretary)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["Abena Mensah", "Chidi Okafor"]);
    }

    #[rocket::async_test]
    async fn unknown_ids_are_absent() {
        let store = MemoryStore::with_examples();
        let ids = ["c1".to_string(), "nobody".to_string()]
            .into_iter()
            .collect::<HashSet<_>>();
        let found = stores(&store, Duration::from_secs(1))
            .lookup_by_ids(&ids)
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found["c1"].name, "Ama Owusu");
    }

    #[rocket::async_test]
    async fn slow_store_times_out() {
        let store = MemoryStore::with_examples();
        store.set_delay(Duration::from_millis(500));
        let result = stores(&store, Duration::from_millis(20))
            .list_by_position(ElectionPosition::Secretary)
            .await;
        assert!(matches!(result, Err(StoreError::Timeout(_))));
    }
}
