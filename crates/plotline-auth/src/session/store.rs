//! Session storage wrapping the persistence collaborator.
//!
//! Every mutation goes through this type so that the cache mirror is
//! updated in step with the authoritative store: refreshed after the
//! store write succeeds, in sequence, not atomically with it.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::warn;
use uuid::Uuid;

use plotline_core::error::AppError;
use plotline_core::traits::SessionPersistence;
use plotline_entity::session::{NewSession, Session};

use super::cache::SessionCache;

/// Durable session records plus their cache mirror.
#[derive(Debug, Clone)]
pub struct SessionStore {
    persistence: Arc<dyn SessionPersistence>,
    cache: SessionCache,
}

impl SessionStore {
    /// Creates a new session store.
    pub fn new(persistence: Arc<dyn SessionPersistence>, cache: SessionCache) -> Self {
        Self { persistence, cache }
    }

    /// Creates a session row and refreshes the owner's cache mirror.
    pub async fn create(&self, session: &NewSession) -> Result<Session, AppError> {
        let created = self.persistence.create(session).await?;
        self.refresh_mirror(created.user_id).await;
        Ok(created)
    }

    /// Looks up a session by refresh token.
    ///
    /// Absent and expired rows are both reported as not-found here; expiry
    /// judgment belongs to the verifier, which sees the row if it exists.
    pub async fn find_by_refresh_token(&self, token: &str) -> Result<Session, AppError> {
        self.persistence
            .find_by_refresh_token(token)
            .await?
            .ok_or_else(|| AppError::not_found("Session not found"))
    }

    /// Atomically replaces the session holding the old token with a new one.
    pub async fn rotate(
        &self,
        old_refresh_token: &str,
        new_session: &NewSession,
    ) -> Result<Session, AppError> {
        let created = self
            .persistence
            .rotate(old_refresh_token, new_session)
            .await?;
        self.refresh_mirror(created.user_id).await;
        Ok(created)
    }

    /// Deletes the session holding the given refresh token.
    ///
    /// Idempotent: returns the owning user's id when a row was removed,
    /// `None` when the token matched nothing.
    pub async fn delete_by_refresh_token(&self, token: &str) -> Result<Option<Uuid>, AppError> {
        let owner = self.persistence.delete_by_refresh_token(token).await?;
        if let Some(user_id) = owner {
            self.refresh_mirror(user_id).await;
        }
        Ok(owner)
    }

    /// Deletes every session for a user and drops the cache mirror.
    pub async fn delete_all_for_user(&self, user_id: Uuid) -> Result<u64, AppError> {
        let deleted = self.persistence.delete_by_user(user_id).await?;
        self.cache.invalidate(user_id).await;
        Ok(deleted)
    }

    /// Counts the user's valid sessions, straight from the store.
    pub async fn count_active(&self, user_id: Uuid) -> Result<i64, AppError> {
        self.persistence.count_active(user_id).await
    }

    /// Lists the user's valid sessions, straight from the store.
    pub async fn list_active(&self, user_id: Uuid) -> Result<Vec<Session>, AppError> {
        self.persistence.list_active(user_id).await
    }

    /// Lists the user's valid sessions through the cache mirror.
    ///
    /// On a miss the list is loaded from the store and written back.
    pub async fn list_active_cached(&self, user_id: Uuid) -> Result<Vec<Session>, AppError> {
        if let Some(sessions) = self.cache.read(user_id).await {
            return Ok(sessions);
        }
        let sessions = self.persistence.list_active(user_id).await?;
        self.cache.write(user_id, &sessions).await;
        Ok(sessions)
    }

    /// Deletes expired session rows and invalidates affected users' mirrors.
    pub async fn purge_expired(&self) -> Result<u64, AppError> {
        let owners = self.persistence.delete_expired().await?;
        let purged = owners.len() as u64;
        let distinct: HashSet<Uuid> = owners.into_iter().collect();
        for user_id in distinct {
            self.cache.invalidate(user_id).await;
        }
        Ok(purged)
    }

    /// Rebuilds the cache mirror from the store after a mutation.
    async fn refresh_mirror(&self, user_id: Uuid) {
        match self.persistence.list_active(user_id).await {
            Ok(sessions) => self.cache.write(user_id, &sessions).await,
            Err(e) => {
                // The mutation itself already committed; a stale mirror is
                // tolerable, a failed request is not.
                warn!(%user_id, error = %e, "Failed to rebuild session cache mirror");
                self.cache.invalidate(user_id).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::support;
    use plotline_core::error::ErrorKind;

    #[tokio::test]
    async fn create_mirrors_sessions_into_cache() {
        let (store, sessions, cache) = support::store();
        let user_id = uuid::Uuid::new_v4();

        store.create(&support::new_session(user_id, "fp-1")).await.unwrap();
        store.create(&support::new_session(user_id, "fp-2")).await.unwrap();

        let mirrored = cache.read(user_id).await.expect("mirror populated");
        assert_eq!(mirrored.len(), 2);
        assert_eq!(sessions.len(), 2);
    }

    #[tokio::test]
    async fn delete_all_drops_the_mirror() {
        let (store, _sessions, cache) = support::store();
        let user_id = uuid::Uuid::new_v4();

        store.create(&support::new_session(user_id, "fp-1")).await.unwrap();
        store.delete_all_for_user(user_id).await.unwrap();

        assert!(cache.read(user_id).await.is_none());
        assert_eq!(store.count_active(user_id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn cached_listing_falls_back_to_store_and_repopulates() {
        let (store, _sessions, cache) = support::store();
        let user_id = uuid::Uuid::new_v4();

        store.create(&support::new_session(user_id, "fp-1")).await.unwrap();
        cache.invalidate(user_id).await;
        assert!(cache.read(user_id).await.is_none());

        let listed = store.list_active_cached(user_id).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert!(cache.read(user_id).await.is_some());
    }

    #[tokio::test]
    async fn missing_token_reports_not_found() {
        let (store, _sessions, _cache) = support::store();
        let err = store.find_by_refresh_token("unknown").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn deleting_missing_token_is_idempotent() {
        let (store, _sessions, _cache) = support::store();
        assert_eq!(store.delete_by_refresh_token("unknown").await.unwrap(), None);
    }
}
