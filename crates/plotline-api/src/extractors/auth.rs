//! `AuthSession` extractor — pulls the Bearer access token from the
//! Authorization header and validates it.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use plotline_core::error::AppError;
use plotline_entity::user::UserRole;

use crate::state::AppState;

/// Authenticated caller context available in handlers.
#[derive(Debug, Clone)]
pub struct AuthSession {
    /// The authenticated user.
    pub user_id: Uuid,
    /// The session the access token was issued under.
    pub session_id: Uuid,
    /// Role at the time of token issuance.
    pub role: UserRole,
}

impl FromRequestParts<AppState> for AuthSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(AppError::access_denied)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(AppError::access_denied)?;

        let claims = state.token_decoder.decode(token)?;

        Ok(AuthSession {
            user_id: claims.user_id(),
            session_id: claims.session_id(),
            role: claims.role,
        })
    }
}
