//! Session lifecycle orchestration — login, refresh, logout flows.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use plotline_core::config::session::SessionConfig;
use plotline_core::error::{AppError, ErrorKind};
use plotline_core::traits::{IpLocator, UserDirectory};
use plotline_entity::session::NewSession;
use plotline_entity::user::User;

use crate::jwt::TokenIssuer;

use super::policy::SessionPolicy;
use super::store::SessionStore;
use super::verifier::Verifier;

/// Client context captured from the incoming request.
#[derive(Debug, Clone)]
pub struct ClientInfo {
    /// Client IP address.
    pub ip: String,
    /// User-Agent header value.
    pub user_agent: Option<String>,
    /// Client-supplied device signature.
    pub fingerprint: String,
}

/// Tokens returned from a successful login.
#[derive(Debug, Clone)]
pub struct IssuedTokens {
    /// Short-lived signed access token.
    pub access_token: String,
    /// Single-use refresh token.
    pub refresh_token: String,
}

/// Tokens returned from a successful refresh.
#[derive(Debug, Clone)]
pub struct RefreshedTokens {
    /// The user the rotated session belongs to.
    pub user_id: Uuid,
    /// Short-lived signed access token.
    pub access_token: String,
    /// Single-use refresh token replacing the consumed one.
    pub refresh_token: String,
}

/// One row of the active-session listing.
#[derive(Debug, Clone)]
pub struct SessionOverview {
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

/// Orchestrates the complete session lifecycle.
#[derive(Clone)]
pub struct SessionLifecycle {
    store: Arc<SessionStore>,
    policy: SessionPolicy,
    verifier: Verifier,
    issuer: Arc<TokenIssuer>,
    users: Arc<dyn UserDirectory>,
    locator: Arc<dyn IpLocator>,
    config: SessionConfig,
}

impl std::fmt::Debug for SessionLifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionLifecycle")
            .field("config", &self.config)
            .finish()
    }
}

impl SessionLifecycle {
    /// Creates a new lifecycle orchestrator with all required dependencies.
    pub fn new(
        store: Arc<SessionStore>,
        policy: SessionPolicy,
        verifier: Verifier,
        issuer: Arc<TokenIssuer>,
        users: Arc<dyn UserDirectory>,
        locator: Arc<dyn IpLocator>,
        config: SessionConfig,
    ) -> Self {
        Self {
            store,
            policy,
            verifier,
            issuer,
            users,
            locator,
            config,
        }
    }

    /// Creates a brand-new session for an already-authenticated user.
    ///
    /// 1. Apply the session cap policy (evicting all existing sessions if
    ///    at the cap)
    /// 2. Create the session row with a fresh refresh token
    /// 3. Mint the access token
    pub async fn login(&self, user: &User, client: ClientInfo) -> Result<IssuedTokens, AppError> {
        let admission = self.policy.admit(user.id).await?;

        let new_session = self.new_session(user.id, &client);
        let session = self.store.create(&new_session).await?;

        let access_token = self.issuer.mint_access_token(user, session.id)?;

        if let Err(e) = self.users.touch_last_login(user.id, Utc::now()).await {
            warn!(user_id = %user.id, error = %e, "Failed to record login time");
        }

        info!(
            user_id = %user.id,
            session_id = %session.id,
            evicted_all = admission.evicted_all,
            "Login successful"
        );

        Ok(IssuedTokens {
            access_token,
            refresh_token: session.refresh_token,
        })
    }

    /// Exchanges a refresh token for a new token pair, rotating the session.
    ///
    /// The presented token is single-use. On a fingerprint or expiry
    /// rejection the session is deleted before the error is returned, so a
    /// failed refresh permanently invalidates the token. On success the
    /// delete-old and insert-new commit together, so a transient store
    /// failure rolls back and leaves the old token usable instead of
    /// stranding the user logged out.
    pub async fn refresh(
        &self,
        refresh_token: &str,
        client: ClientInfo,
    ) -> Result<RefreshedTokens, AppError> {
        let session = match self.store.find_by_refresh_token(refresh_token).await {
            Ok(session) => session,
            Err(e) if e.kind == ErrorKind::NotFound => return Err(AppError::access_denied()),
            Err(e) => return Err(e),
        };

        if let Err(denied) = self.verifier.check(&session, &client.fingerprint) {
            self.store.delete_by_refresh_token(refresh_token).await?;
            return Err(denied);
        }

        let user = self
            .users
            .find_by_id(session.user_id)
            .await?
            .ok_or_else(AppError::access_denied)?;

        let admission = self.policy.admit(user.id).await?;
        let new_session = self.new_session(user.id, &client);

        let session = if admission.evicted_all {
            // The cap eviction already consumed the presented token along
            // with every other session; only the insert remains.
            self.store.create(&new_session).await?
        } else {
            match self.store.rotate(refresh_token, &new_session).await {
                Ok(session) => session,
                // A concurrent refresh consumed the token first.
                Err(e) if e.kind == ErrorKind::NotFound => return Err(AppError::access_denied()),
                Err(e) => return Err(e),
            }
        };

        let access_token = self.issuer.mint_access_token(&user, session.id)?;

        info!(
            user_id = %user.id,
            session_id = %session.id,
            "Refresh token rotated"
        );

        Ok(RefreshedTokens {
            user_id: user.id,
            access_token,
            refresh_token: session.refresh_token,
        })
    }

    /// Deletes the session matching the token and forgets the owner's
    /// notification token.
    ///
    /// Idempotent: an unknown or already-consumed token is not an error.
    pub async fn logout(&self, refresh_token: &str) -> Result<(), AppError> {
        if let Some(user_id) = self.store.delete_by_refresh_token(refresh_token).await? {
            self.users.clear_notification_token(user_id).await?;
            info!(%user_id, "Logout completed");
        }
        Ok(())
    }

    /// Deletes every session for the user, the caller's own included.
    pub async fn logout_all(&self, user_id: Uuid) -> Result<u64, AppError> {
        let deleted = self.store.delete_all_for_user(user_id).await?;
        info!(%user_id, deleted, "All sessions terminated");
        Ok(deleted)
    }

    /// Lists the user's active sessions, marking the caller's own.
    ///
    /// Reads go through the cache mirror with store fallback. Location is
    /// resolved per session through the geolocation collaborator.
    pub async fn list_sessions(
        &self,
        user_id: Uuid,
        current_session_id: Uuid,
    ) -> Result<Vec<SessionOverview>, AppError> {
        let sessions = self.store.list_active_cached(user_id).await?;

        let mut overviews = Vec::with_capacity(sessions.len());
        for session in sessions {
            let location = self
                .locator
                .locate(&session.ip)
                .await
                .unwrap_or_else(|| "unknown".to_string());

            overviews.push(SessionOverview {
                ip: session.ip,
                location,
                created_at: session.created_at,
                user_agent: session.user_agent,
                is_current: session.id == current_session_id,
            });
        }

        Ok(overviews)
    }

    fn new_session(&self, user_id: Uuid, client: &ClientInfo) -> NewSession {
        NewSession {
            user_id,
            refresh_token: self.issuer.mint_refresh_token(),
            ip: client.ip.clone(),
            user_agent: client.user_agent.clone(),
            fingerprint: client.fingerprint.clone(),
            expires_at: Utc::now() + chrono::Duration::days(self.config.session_ttl_days as i64),
        }
    }
}
