//! Turning a reviewed session into stored voter and vote records.
//!
//! The two writes are separate store calls, voter first. If the vote batch
//! is rejected the voter record is left in place: a voter with no votes is
//! an accepted outcome, and nothing here tries to delete it.

use chrono::{DateTime, Utc};
use log::{info, warn};

use super::VotingSession;
use crate::error::{Error, Result};
use crate::model::{
    db::{NewVote, NewVoter},
    mongodb::Id,
};
use crate::store::Stores;

/// The votes recording `session`'s choices for `voter_id`, in ballot order.
pub fn ballot_for(session: &VotingSession, voter_id: Id, cast_at: DateTime<Utc>) -> Vec<NewVote> {
    let points = session.points_per_vote();
    session
        .selections()
        .iter()
        .map(|(position, candidate_id)| NewVote {
            voter_id,
            candidate_id: candidate_id.clone(),
            position: *position,
            points,
            created_at: cast_at,
        })
        .collect()
}

/// Store the voter and their votes, returning the new voter's ID.
///
/// No retries: on failure the caller keeps the session as it was so the
/// voter can try again.
pub async fn submit(stores: &Stores, session: &VotingSession) -> Result<Id> {
    let voter = NewVoter::new(session.voter_name.clone(), session.role);
    let voter_id = stores
        .create_voter(&voter)
        .await
        .map_err(Error::VoterCreate)?;
    info!("Created voter {voter_id} ({:?})", session.role);

    let votes = ballot_for(session, voter_id, voter.created_at);
    if let Err(source) = stores.create_votes(&votes).await {
        warn!("Voter {voter_id} was stored without votes: {source}");
        return Err(Error::VoteCreate { voter_id, source });
    }
    info!("Stored {} votes for voter {voter_id}", votes.len());

    Ok(voter_id)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::model::common::{ElectionPosition, VoterRole};
    use crate::store::memory::MemoryStore;

    fn stores(store: &MemoryStore) -> Stores {
        Stores::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Duration::from_secs(5),
        )
    }

    fn session(role: VoterRole, name: Option<&str>) -> VotingSession {
        let mut session = VotingSession::default();
        session.role = role;
        session.voter_name = name.map(str::to_string);
        session.select(ElectionPosition::VicePresident, "c1".into());
        session
    }

    #[rocket::async_test]
    async fn staff_single_vote() {
        let store = MemoryStore::with_examples();
        let voter_id = submit(&stores(&store), &session(VoterRole::Staff, Some("Ama")))
            .await
            .unwrap();

        let voters = store.voters();
        assert_eq!(voters.len(), 1);
        assert_eq!(voters[0].id, voter_id);
        assert_eq!(voters[0].name.as_deref(), Some("Ama"));
        assert_eq!(voters[0].role, VoterRole::Staff);

        let votes = store.votes();
        assert_eq!(votes.len(), 1);
        assert_eq!(votes[0].voter_id, voter_id);
        assert_eq!(votes[0].candidate_id, "c1");
        assert_eq!(votes[0].position, ElectionPosition::VicePresident);
        assert_eq!(votes[0].points, 30);
    }

    #[rocket::async_test]
    async fn hod_votes_weigh_more() {
        let store = MemoryStore::with_examples();
        submit(&stores(&store), &session(VoterRole::Hod, None))
            .await
            .unwrap();

        let votes = store.votes();
        assert_eq!(votes.len(), 1);
        assert_eq!(votes[0].points, 50);
        assert_eq!(store.voters()[0].name, None);
    }

    #[rocket::async_test]
    async fn votes_match_selections() {
        let store = MemoryStore::with_examples();
        let mut session = session(VoterRole::Staff, Some("Ama"));
        session.select(ElectionPosition::JointTreasurer, "c9".into());
        session.select(ElectionPosition::Secretary, "c4".into());

        let voter_id = submit(&stores(&store), &session).await.unwrap();

        let stored = store
            .votes()
            .into_iter()
            .map(|vote| {
                assert_eq!(vote.voter_id, voter_id);
                (vote.position, vote.candidate_id.clone())
            })
            .collect::<Vec<_>>();
        let expected = session
            .selections()
            .iter()
            .map(|(position, candidate)| (*position, candidate.clone()))
            .collect::<Vec<_>>();
        assert_eq!(stored, expected);
    }

    #[rocket::async_test]
    async fn voter_failure_writes_nothing() {
        let store = MemoryStore::with_examples();
        store.fail_voter_inserts(true);

        let result = submit(&stores(&store), &session(VoterRole::Staff, Some("Ama"))).await;

        assert!(matches!(result, Err(Error::VoterCreate(_))));
        assert!(store.voters().is_empty());
        assert!(store.votes().is_empty());
    }

    #[rocket::async_test]
    async fn vote_failure_keeps_voter() {
        let store = MemoryStore::with_examples();
        store.fail_vote_inserts(true);
        let session = session(VoterRole::Staff, Some("Ama"));
        let before = session.clone();

        let result = submit(&stores(&store), &session).await;

        let voters = store.voters();
        assert_eq!(voters.len(), 1);
        match result {
            Err(Error::VoteCreate { voter_id, .. }) => assert_eq!(voter_id, voters[0].id),
            other => panic!("expected a vote creation error, got {other:?}"),
        }
        assert!(store.votes().is_empty());
        assert_eq!(session, before);
    }

    #[test]
    fn ballot_in_position_order() {
        let mut session = VotingSession::default();
        session.select(ElectionPosition::JointTreasurer, "c8".into());
        session.select(ElectionPosition::VicePresident, "c2".into());
        let voter_id = Id::new();

        let ballot = ballot_for(&session, voter_id, Utc::now());

        let positions = ballot.iter().map(|vote| vote.position).collect::<Vec<_>>();
        assert_eq!(
            positions,
            vec![ElectionPosition::VicePresident, ElectionPosition::JointTreasurer]
        );
        assert!(ballot.iter().all(|vote| vote.points == 30));
    }
}
