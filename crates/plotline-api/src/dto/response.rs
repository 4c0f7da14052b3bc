//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use plotline_auth::session::lifecycle::{IssuedTokens, RefreshedTokens, SessionOverview};

/// Login response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    /// Short-lived access token.
    pub access_token: String,
    /// Single-use refresh token.
    pub refresh_token: String,
}

impl From<IssuedTokens> for TokenResponse {
    fn from(tokens: IssuedTokens) -> Self {
        Self {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
        }
    }
}

/// Refresh response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    /// The user the rotated session belongs to.
    pub user_id: Uuid,
    /// Short-lived access token.
    pub access_token: String,
    /// Single-use refresh token.
    pub refresh_token: String,
}

impl From<RefreshedTokens> for RefreshResponse {
    fn from(tokens: RefreshedTokens) -> Self {
        Self {
            user_id: tokens.user_id,
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
        }
    }
}

/// One active session in the session listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    /// IP address the session was created from.
    pub ip: String,
    /// Resolved location, or `"unknown"`.
    pub location: String,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
    /// User-Agent header value.
    pub user_agent: Option<String>,
    /// Whether this is the caller's own session.
    pub is_current: bool,
}

impl From<SessionOverview> for SessionResponse {
    fn from(overview: SessionOverview) -> Self {
        Self {
            ip: overview.ip,
            location: overview.location,
            created_at: overview.created_at,
            user_agent: overview.user_agent,
            is_current: overview.is_current,
        }
    }
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status.
    pub status: String,
    /// Server version.
    pub version: String,
    /// Database reachability.
    pub database: String,
    /// Cache reachability.
    pub cache: String,
}
