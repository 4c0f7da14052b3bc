//! Access-token validation.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use tracing::debug;

use plotline_core::config::auth::AuthConfig;
use plotline_core::error::AppError;

use super::claims::AccessClaims;

/// Validates signed access tokens.
///
/// Every rejection surfaces as the uniform access-denied error; the precise
/// reason is logged server-side only.
#[derive(Clone)]
pub struct AccessTokenDecoder {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
}

impl std::fmt::Debug for AccessTokenDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessTokenDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl AccessTokenDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 5; // seconds of clock-skew tolerance

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Decodes and validates an access token string.
    pub fn decode(&self, token: &str) -> Result<AccessClaims, AppError> {
        decode::<AccessClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(reason = %e, "Access token rejected");
                AppError::access_denied()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::TokenIssuer;
    use chrono::Utc;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use plotline_entity::user::{User, UserRole};
    use uuid::Uuid;

    fn user() -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            email: "author@example.com".to_string(),
            password_hash: String::new(),
            display_name: None,
            role: UserRole::Author,
            notification_token: None,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn roundtrip_preserves_claims() {
        let config = AuthConfig::default();
        let issuer = TokenIssuer::new(&config);
        let decoder = AccessTokenDecoder::new(&config);

        let user = user();
        let session_id = Uuid::new_v4();
        let token = issuer.mint_access_token(&user, session_id).unwrap();

        let claims = decoder.decode(&token).unwrap();
        assert_eq!(claims.user_id(), user.id);
        assert_eq!(claims.session_id(), session_id);
        assert_eq!(claims.role, UserRole::Author);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let issuer = TokenIssuer::new(&AuthConfig::default());
        let decoder = AccessTokenDecoder::new(&AuthConfig {
            jwt_secret: "a-different-secret".to_string(),
            ..AuthConfig::default()
        });

        let token = issuer.mint_access_token(&user(), Uuid::new_v4()).unwrap();
        assert!(decoder.decode(&token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let config = AuthConfig::default();
        let decoder = AccessTokenDecoder::new(&config);

        let now = Utc::now().timestamp();
        let claims = crate::jwt::AccessClaims {
            sub: Uuid::new_v4(),
            sid: Uuid::new_v4(),
            role: UserRole::Author,
            iat: now - 3600,
            exp: now - 60,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
        )
        .unwrap();

        assert!(decoder.decode(&token).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        let decoder = AccessTokenDecoder::new(&AuthConfig::default());
        assert!(decoder.decode("not-a-jwt").is_err());
    }
}
