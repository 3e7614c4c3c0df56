use std::collections::{HashMap, HashSet};

use mongodb::{
    bson::{doc, Document},
    options::FindOptions,
    Database,
};
use rocket::futures::TryStreamExt;

use super::{BallotStore, CandidateDirectory, StoreError};
use crate::model::{
    common::{CandidateId, ElectionPosition},
    db::{Candidate, NewVote, NewVoter},
    mongodb::{Coll, Id},
};

/// Both store interfaces, backed by MongoDB collections.
#[derive(Clone)]
pub struct MongoStore {
    candidates: Coll<Candidate>,
    voters: Coll<NewVoter>,
    votes: Coll<NewVote>,
}

impl MongoStore {
    pub fn from_db(db: &Database) -> Self {
        Self {
            candidates: Coll::from_db(db),
            voters: Coll::from_db(db),
            votes: Coll::from_db(db),
        }
    }
}

/// Candidates standing for `position`.
fn position_filter(position: ElectionPosition) -> Document {
    doc! {"position": position}
}

/// Alphabetical by name.
fn by_name() -> FindOptions {
    FindOptions::builder().sort(doc! {"name": 1}).build()
}

/// Candidates with any of the given IDs.
fn ids_filter(ids: &HashSet<CandidateId>) -> Document {
    let ids = ids.iter().cloned().collect::<Vec<_>>();
    doc! {"_id": {"$in": ids}}
}

#[rocket::async_trait]
impl CandidateDirectory for MongoStore {
    async fn list_by_position(
        &self,
        position: ElectionPosition,
    ) -> Result<Vec<Candidate>, StoreError> {
        let candidates = self
            .candidates
            .find(position_filter(position), by_name())
            .await?
            .try_collect::<Vec<_>>()
            .await?;
        Ok(candidates)
    }

    async fn lookup_by_ids(
        &self,
        ids: &HashSet<CandidateId>,
    ) -> Result<HashMap<CandidateId, Candidate>, StoreError> {
        let candidates = self
            .candidates
            .find(ids_filter(ids), None)
            .await?
            .map_ok(|candidate| (candidate.id.clone(), candidate))
            .try_collect::<HashMap<_, _>>()
            .await?;
        Ok(candidates)
    }
}

#[rocket::async_trait]
impl BallotStore for MongoStore {
    async fn create_voter(&self, voter: &NewVoter) -> Result<Id, StoreError> {
        let inserted = self.voters.insert_one(voter, None).await?;
        inserted
            .inserted_id
            .as_object_id()
            .map(Id::from)
            .ok_or_else(|| {
                StoreError::Unavailable(format!(
                    "Voter inserted with unexpected ID {}",
                    inserted.inserted_id
                ))
            })
    }

    async fn create_votes(&self, votes: &[NewVote]) -> Result<(), StoreError> {
        // MongoDB rejects an empty batch.
        if votes.is_empty() {
            return Ok(());
        }
        self.votes.insert_many(votes.iter(), None).await?;
        Ok(())
    }
}
