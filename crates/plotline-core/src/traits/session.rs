//! Durable session persistence interface.

use async_trait::async_trait;
use uuid::Uuid;

use plotline_entity::session::{NewSession, Session};

use crate::result::AppResult;

/// Durable CRUD over session rows, keyed by refresh token.
///
/// Implementations own row storage and the `refresh_token` uniqueness
/// constraint. Deletions are idempotent: removing zero rows is not an
/// error. Nothing at this layer distinguishes expired rows from absent
/// ones on lookup; that judgment belongs to the caller.
#[async_trait]
pub trait SessionPersistence: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a new session row and return the canonical stored record.
    ///
    /// Fails with a persistence error when the refresh token collides with
    /// an existing row.
    async fn create(&self, session: &NewSession) -> AppResult<Session>;

    /// Look up a session by its refresh token.
    async fn find_by_refresh_token(&self, token: &str) -> AppResult<Option<Session>>;

    /// Delete the session holding the given refresh token.
    ///
    /// Returns the owning user's id when a row was removed, `None` when
    /// the token matched nothing.
    async fn delete_by_refresh_token(&self, token: &str) -> AppResult<Option<Uuid>>;

    /// Delete every session belonging to a user. Returns the number of
    /// rows removed.
    async fn delete_by_user(&self, user_id: Uuid) -> AppResult<u64>;

    /// Count the user's sessions whose expiry lies in the future.
    async fn count_active(&self, user_id: Uuid) -> AppResult<i64>;

    /// List the user's unexpired sessions, newest first.
    async fn list_active(&self, user_id: Uuid) -> AppResult<Vec<Session>>;

    /// Atomically replace the session holding `old_refresh_token` with a
    /// new one.
    ///
    /// The delete and the insert commit together: on any failure the old
    /// row survives untouched. Fails with a not-found error when the old
    /// token has already been consumed, which lets exactly one of two
    /// concurrent rotations win.
    async fn rotate(
        &self,
        old_refresh_token: &str,
        new_session: &NewSession,
    ) -> AppResult<Session>;

    /// Delete every expired session row. Returns the ids of the users
    /// whose sessions were removed, one entry per deleted row.
    async fn delete_expired(&self) -> AppResult<Vec<Uuid>>;
}
