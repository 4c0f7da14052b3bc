//! Auth handlers — login, refresh, logout, logout-all, session listing.

use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use validator::Validate;

use plotline_auth::session::lifecycle::ClientInfo;
use plotline_core::error::AppError;
use plotline_core::traits::UserDirectory;

use crate::dto::request::{LoginRequest, LogoutRequest, RefreshRequest};
use crate::dto::response::{MessageResponse, RefreshResponse, SessionResponse, TokenResponse};
use crate::extractors::AuthSession;
use crate::state::AppState;

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    // Unknown email and wrong password surface identically.
    let user = state
        .users
        .find_by_email(&req.email)
        .await?
        .ok_or_else(AppError::invalid_credentials)?;

    if !state
        .password_hasher
        .verify_password(&req.password, &user.password_hash)?
    {
        return Err(AppError::invalid_credentials());
    }

    let client = client_info(&headers, req.fingerprint);
    let tokens = state.lifecycle.login(&user, client).await?;

    Ok(Json(tokens.into()))
}

/// POST /auth/refresh-tokens
pub async fn refresh_tokens(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>, AppError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let client = client_info(&headers, req.fingerprint);
    let tokens = state.lifecycle.refresh(&req.refresh_token, client).await?;

    Ok(Json(tokens.into()))
}

/// POST /auth/logout
pub async fn logout(
    State(state): State<AppState>,
    Json(req): Json<LogoutRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    state.lifecycle.logout(&req.refresh_token).await?;

    Ok(Json(MessageResponse {
        message: "Logged out".to_string(),
    }))
}

/// POST /auth/logout-all-sessions
pub async fn logout_all(
    State(state): State<AppState>,
    auth: AuthSession,
) -> Result<Json<MessageResponse>, AppError> {
    state.lifecycle.logout_all(auth.user_id).await?;

    Ok(Json(MessageResponse {
        message: "All sessions terminated".to_string(),
    }))
}

/// GET /auth/sessions
pub async fn list_sessions(
    State(state): State<AppState>,
    auth: AuthSession,
) -> Result<Json<Vec<SessionResponse>>, AppError> {
    let sessions = state
        .lifecycle
        .list_sessions(auth.user_id, auth.session_id)
        .await?;

    Ok(Json(sessions.into_iter().map(Into::into).collect()))
}

/// Builds the client context from request headers.
fn client_info(headers: &HeaderMap, fingerprint: String) -> ClientInfo {
    let ip = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let user_agent = headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    ClientInfo {
        ip,
        user_agent,
        fingerprint,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_info_takes_first_forwarded_address() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            "203.0.113.7, 10.0.0.1".parse().unwrap(),
        );
        let client = client_info(&headers, "fp".to_string());
        assert_eq!(client.ip, "203.0.113.7");
        assert_eq!(client.user_agent, None);
    }

    #[test]
    fn client_info_defaults_when_headers_missing() {
        let client = client_info(&HeaderMap::new(), "fp".to_string());
        assert_eq!(client.ip, "unknown");
    }
}
