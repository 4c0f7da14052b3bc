//! JWT claims structure embedded in access tokens.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use plotline_entity::user::UserRole;

/// Claims payload of every access token.
///
/// Refresh tokens are opaque random values looked up in the session store;
/// only access tokens carry claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject — the user ID.
    pub sub: Uuid,
    /// Session ID this token was issued under.
    pub sid: Uuid,
    /// User role at the time of token issuance.
    pub role: UserRole,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

impl AccessClaims {
    /// Returns the user ID from the subject claim.
    pub fn user_id(&self) -> Uuid {
        self.sub
    }

    /// Returns the session ID.
    pub fn session_id(&self) -> Uuid {
        self.sid
    }
}
