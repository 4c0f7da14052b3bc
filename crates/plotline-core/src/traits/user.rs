//! User-management collaborator interface.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use plotline_entity::user::User;

use crate::result::AppResult;

/// The slice of user management the session core consumes.
///
/// Users are owned elsewhere; this core only loads them for credential
/// checks and token claims, and writes back the two login-related fields.
#[async_trait]
pub trait UserDirectory: Send + Sync + std::fmt::Debug + 'static {
    /// Find a user by primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find a user by login email (case-insensitive).
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Forget the user's remembered push-notification token.
    async fn clear_notification_token(&self, user_id: Uuid) -> AppResult<()>;

    /// Record a successful login time.
    async fn touch_last_login(&self, user_id: Uuid, at: DateTime<Utc>) -> AppResult<()>;
}
