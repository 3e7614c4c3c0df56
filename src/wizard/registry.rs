use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::debug;
use rocket::tokio::sync::{Mutex, OwnedMutexGuard};

use super::Wizard;
use crate::error::{Error, Result};
use crate::model::mongodb::Id;

/// One voter's run through the wizard.
#[derive(Debug, Default)]
pub struct WizardSession {
    pub wizard: Wizard,
    /// Message about the last recovered failure, shown until the next successful event.
    pub notice: Option<String>,
}

struct Entry {
    session: Arc<Mutex<WizardSession>>,
    last_used: Instant,
}

impl Entry {
    fn expired(&self, ttl: Duration) -> bool {
        self.last_used.elapsed() > ttl
    }
}

/// Every live wizard session in this process.
///
/// Each session is handed out behind its own lock, and only to one caller at
/// a time: while one event is waiting on the store, any other event for the
/// same session is turned away as [`Error::Busy`] rather than queued.
pub struct SessionRegistry {
    sessions: Mutex<HashMap<Id, Entry>>,
    ttl: Duration,
}

impl SessionRegistry {
    /// Sessions untouched for longer than `ttl` are discarded.
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Default::default(),
            ttl,
        }
    }

    /// Start a new session, already locked for the caller.
    pub async fn create(&self) -> (Id, OwnedMutexGuard<WizardSession>) {
        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();
        sessions.retain(|_, entry| !entry.expired(self.ttl));
        if sessions.len() < before {
            debug!("Evicted {} idle wizard sessions", before - sessions.len());
        }

        let id = Id::new();
        let session = Arc::new(Mutex::new(WizardSession::default()));
        let guard = session
            .clone()
            .try_lock_owned()
            .expect("Nobody else can see a new session");
        sessions.insert(
            id,
            Entry {
                session,
                last_used: Instant::now(),
            },
        );
        (id, guard)
    }

    /// Lock an existing session for one event.
    pub async fn acquire(&self, id: Id) -> Result<OwnedMutexGuard<WizardSession>> {
        let mut sessions = self.sessions.lock().await;
        if sessions.get(&id).map_or(false, |entry| entry.expired(self.ttl)) {
            sessions.remove(&id);
        }
        let entry = sessions
            .get_mut(&id)
            .ok_or_else(|| Error::not_found(format!("Wizard session '{id}'")))?;
        entry.last_used = Instant::now();
        entry
            .session
            .clone()
            .try_lock_owned()
            .map_err(|_| Error::Busy(id))
    }

    /// Forget a session.
    pub async fn remove(&self, id: Id) -> Result<()> {
        self.sessions
            .lock()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| Error::not_found(format!("Wizard session '{id}'")))
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::common::VoterRole;
    use crate::wizard::Step;

    fn registry() -> SessionRegistry {
        SessionRegistry::new(Duration::from_secs(60))
    }

    #[rocket::async_test]
    async fn sessions_are_independent() {
        let registry = registry();
        let (first, mut guard) = registry.create().await;
        guard.wizard.choose_role(VoterRole::Hod).unwrap();
        drop(guard);
        let (second, _) = registry.create().await;

        assert_ne!(first, second);
        assert_eq!(
            registry.acquire(first).await.unwrap().wizard.step(),
            Step::Voting { cursor: 0 }
        );
        assert_eq!(
            registry.acquire(second).await.unwrap().wizard.step(),
            Step::Role
        );
    }

    #[rocket::async_test]
    async fn busy_while_locked() {
        let registry = registry();
        let (id, guard) = registry.create().await;

        assert!(matches!(registry.acquire(id).await, Err(Error::Busy(_))));
        drop(guard);
        assert!(registry.acquire(id).await.is_ok());
    }

    #[rocket::async_test]
    async fn unknown_and_removed() {
        let registry = registry();
        assert!(matches!(
            registry.acquire(Id::new()).await,
            Err(Error::NotFound(_))
        ));

        let (id, guard) = registry.create().await;
        drop(guard);
        registry.remove(id).await.unwrap();
        assert!(matches!(
            registry.acquire(id).await,
            Err(Error::NotFound(_))
        ));
        assert!(registry.remove(id).await.is_err());
    }

    #[rocket::async_test]
    async fn idle_sessions_expire() {
        let registry = SessionRegistry::new(Duration::ZERO);
        let (id, guard) = registry.create().await;
        drop(guard);
        rocket::tokio::time::sleep(Duration::from_millis(5)).await;

        assert!(matches!(
            registry.acquire(id).await,
            Err(Error::NotFound(_))
        ));
        registry.create().await;
        assert_eq!(registry.len().await, 1);
    }
}
