//! Session entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// An authenticated device/browser instance bound to a user.
///
/// Sessions are created on login and on every successful token refresh,
/// and destroyed on logout, refresh (the replaced session), cap eviction,
/// or expiry. The refresh token is the lookup key and is globally unique.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Session {
    /// Unique session identifier, assigned by the store.
    pub id: Uuid,
    /// The user this session belongs to.
    pub user_id: Uuid,
    /// Opaque single-use refresh token.
    pub refresh_token: String,
    /// IP address from which the session was created.
    pub ip: String,
    /// User-Agent header value.
    pub user_agent: Option<String>,
    /// Client-supplied device signature, checked on every refresh.
    pub fingerprint: String,
    /// When the session expires.
    pub expires_at: DateTime<Utc>,
    /// When the session was created (login or refresh time).
    pub created_at: DateTime<Utc>,
    /// When the session was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Check whether the session is still valid.
    pub fn is_active(&self) -> bool {
        self.expires_at > Utc::now()
    }

    /// Check whether the session has expired.
    pub fn is_expired(&self) -> bool {
        !self.is_active()
    }
}

/// Data required to create a new session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSession {
    /// The user this session belongs to.
    pub user_id: Uuid,
    /// Freshly minted refresh token.
    pub refresh_token: String,
    /// IP address of the client.
    pub ip: String,
    /// User-Agent header.
    pub user_agent: Option<String>,
    /// Client device signature.
    pub fingerprint: String,
    /// When the session expires.
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn session(expires_at: DateTime<Utc>) -> Session {
        let now = Utc::now();
        Session {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            refresh_token: Uuid::new_v4().to_string(),
            ip: "203.0.113.7".to_string(),
            user_agent: Some("Mozilla/5.0".to_string()),
            fingerprint: "fp-1".to_string(),
            expires_at,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn future_expiry_is_active() {
        let s = session(Utc::now() + Duration::hours(1));
        assert!(s.is_active());
        assert!(!s.is_expired());
    }

    #[test]
    fn past_expiry_is_expired() {
        let s = session(Utc::now() - Duration::seconds(1));
        assert!(s.is_expired());
        assert!(!s.is_active());
    }
}
