//! An in-process store for tests, with switches for simulating failures.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use rocket::tokio::time::sleep;

use super::{BallotStore, CandidateDirectory, StoreError};
use crate::model::{
    common::{CandidateId, ElectionPosition},
    db::{Candidate, NewVote, NewVoter, Vote, Voter},
    mongodb::Id,
};

#[derive(Default)]
struct Inner {
    candidates: Vec<Candidate>,
    voters: Vec<Voter>,
    votes: Vec<Vote>,
    fail_reads: bool,
    fail_voter_inserts: bool,
    fail_vote_inserts: bool,
    delay: Option<Duration>,
}

/// Cloning gives another handle on the same data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    /// A store with no candidates at all.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding [`Candidate::examples`].
    pub fn with_examples() -> Self {
        let store = Self::new();
        for candidate in Candidate::examples() {
            store.add_candidate(candidate);
        }
        store
    }

    pub fn add_candidate(&self, candidate: Candidate) {
        self.lock().candidates.push(candidate);
    }

    pub fn fail_reads(&self, fail: bool) {
        self.lock().fail_reads = fail;
    }

    pub fn fail_voter_inserts(&self, fail: bool) {
        self.lock().fail_voter_inserts = fail;
    }

    pub fn fail_vote_inserts(&self, fail: bool) {
        self.lock().fail_vote_inserts = fail;
    }

    /// Make every call wait this long before answering.
    pub fn set_delay(&self, delay: Duration) {
        self.lock().delay = Some(delay);
    }

    pub fn voters(&self) -> Vec<Voter> {
        self.lock().voters.clone()
    }

    pub fn votes(&self) -> Vec<Vote> {
        self.lock().votes.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap()
    }

    async fn pause(&self) {
        let delay = self.lock().delay;
        if let Some(delay) = delay {
            sleep(delay).await;
        }
    }
}

#[rocket::async_trait]
impl CandidateDirectory for MemoryStore {
    async fn list_by_position(
        &self,
        position: ElectionPosition,
    ) -> Result<Vec<Candidate>, StoreError> {
        self.pause().await;
        let inner = self.lock();
        if inner.fail_reads {
            return Err(StoreError::Unavailable("candidate reads disabled".into()));
        }
        let mut candidates = inner
            .candidates
            .iter()
            .filter(|c| c.position == position)
            .cloned()
            .collect::<Vec<_>>();
        candidates.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(candidates)
    }

    async fn lookup_by_ids(
        &self,
        ids: &HashSet<CandidateId>,
    ) -> Result<HashMap<CandidateId, Candidate>, StoreError> {
        self.pause().await;
        let inner = self.lock();
        if inner.fail_reads {
            return Err(StoreError::Unavailable("candidate reads disabled".into()));
        }
        Ok(inner
            .candidates
            .iter()
            .filter(|c| ids.contains(&c.id))
            .map(|c| (c.id.clone(), c.clone()))
            .collect())
    }
}

#[rocket::async_trait]
impl BallotStore for MemoryStore {
    async fn create_voter(&self, voter: &NewVoter) -> Result<Id, StoreError> {
        self.pause().await;
        let mut inner = self.lock();
        if inner.fail_voter_inserts {
            return Err(StoreError::Unavailable("voter inserts disabled".into()));
        }
        let id = Id::new();
        inner.voters.push(Voter {
            id,
            voter: voter.clone(),
        });
        Ok(id)
    }

    async fn create_votes(&self, votes: &[NewVote]) -> Result<(), StoreError> {
        self.pause().await;
        let mut inner = self.lock();
        if inner.fail_vote_inserts {
            return Err(StoreError::Unavailable("vote inserts disabled".into()));
        }
        inner.votes.extend(votes.iter().map(|vote| Vote {
            id: Id::new(),
            vote: vote.clone(),
        }));
        Ok(())
    }
}
