//! Per-user concurrent session cap.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use plotline_core::config::session::SessionConfig;
use plotline_core::error::AppError;

use super::store::SessionStore;

/// Outcome of a cap check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Admission {
    /// Whether every existing session for the user was evicted to make room.
    pub evicted_all: bool,
}

/// Enforces the maximum-concurrent-sessions-per-user invariant.
///
/// When the cap is reached the policy wipes ALL of the user's sessions and
/// lets the new one in — a full wipe-and-replace, not least-recently-used
/// eviction. Enforcement is per-call: no lock spans the count and the
/// subsequent insert, so two concurrent logins can both observe room and
/// transiently exceed the cap until the next admission corrects it.
#[derive(Debug, Clone)]
pub struct SessionPolicy {
    store: Arc<SessionStore>,
    max_sessions: i64,
}

impl SessionPolicy {
    /// Creates a new policy over the given store.
    pub fn new(store: Arc<SessionStore>, config: &SessionConfig) -> Self {
        Self {
            store,
            max_sessions: config.max_sessions_count as i64,
        }
    }

    /// Admits one new session for the user, evicting first if at the cap.
    ///
    /// A persistence error during eviction aborts the whole attempt; no
    /// partial admit.
    pub async fn admit(&self, user_id: Uuid) -> Result<Admission, AppError> {
        let count = self.store.count_active(user_id).await?;

        if count < self.max_sessions {
            return Ok(Admission { evicted_all: false });
        }

        let evicted = self.store.delete_all_for_user(user_id).await?;
        info!(%user_id, evicted, "Session cap reached; evicted all existing sessions");
        Ok(Admission { evicted_all: true })
    }
}

#[cfg(test)]
mod tests {
    use super::super::support;
    use super::*;
    use plotline_core::config::session::SessionConfig;

    #[tokio::test]
    async fn under_cap_admits_directly() {
        let (store, _sessions, _cache) = support::store();
        let store = Arc::new(store);
        let policy = SessionPolicy::new(Arc::clone(&store), &SessionConfig::default());
        let user_id = Uuid::new_v4();

        for i in 0..4 {
            store
                .create(&support::new_session(user_id, &format!("fp-{i}")))
                .await
                .unwrap();
        }

        let admission = policy.admit(user_id).await.unwrap();
        assert!(!admission.evicted_all);
        assert_eq!(store.count_active(user_id).await.unwrap(), 4);
    }

    #[tokio::test]
    async fn at_cap_wipes_every_session() {
        let (store, _sessions, _cache) = support::store();
        let store = Arc::new(store);
        let policy = SessionPolicy::new(Arc::clone(&store), &SessionConfig::default());
        let user_id = Uuid::new_v4();

        for i in 0..5 {
            store
                .create(&support::new_session(user_id, &format!("fp-{i}")))
                .await
                .unwrap();
        }

        let admission = policy.admit(user_id).await.unwrap();
        assert!(admission.evicted_all);
        assert_eq!(store.count_active(user_id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn expired_sessions_do_not_count_toward_the_cap() {
        let (store, _sessions, _cache) = support::store();
        let store = Arc::new(store);
        let policy = SessionPolicy::new(Arc::clone(&store), &SessionConfig::default());
        let user_id = Uuid::new_v4();

        for i in 0..5 {
            store
                .create(&support::expired_session(user_id, &format!("fp-{i}")))
                .await
                .unwrap();
        }

        let admission = policy.admit(user_id).await.unwrap();
        assert!(!admission.evicted_all);
    }
}
