//! Token issuance — signed access tokens and opaque refresh tokens.

use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use plotline_core::config::auth::AuthConfig;
use plotline_core::error::AppError;
use plotline_entity::user::User;

use super::claims::AccessClaims;

/// Mints short-lived access tokens and single-use refresh tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    /// HMAC secret key for signing.
    encoding_key: EncodingKey,
    /// Access token TTL in minutes.
    access_ttl_minutes: i64,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("access_ttl_minutes", &self.access_ttl_minutes)
            .finish()
    }
}

impl TokenIssuer {
    /// Creates a new issuer from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            access_ttl_minutes: config.access_ttl_minutes as i64,
        }
    }

    /// Generates a signed access token carrying the user, role, and session.
    pub fn mint_access_token(&self, user: &User, session_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let exp = now + chrono::Duration::minutes(self.access_ttl_minutes);

        let claims = AccessClaims {
            sub: user.id,
            sid: session_id,
            role: user.role,
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode access token: {e}")))
    }

    /// Generates a fresh opaque refresh token.
    ///
    /// UUIDv4 entropy makes collisions astronomically unlikely; a collision
    /// surfaces as a uniqueness violation at the persistence layer rather
    /// than being pre-checked here.
    pub fn mint_refresh_token(&self) -> String {
        Uuid::new_v4().to_string()
    }
}
