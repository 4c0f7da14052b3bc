//! Application state shared across all handlers.

use std::sync::Arc;

use plotline_auth::jwt::AccessTokenDecoder;
use plotline_auth::password::PasswordHasher;
use plotline_auth::session::SessionLifecycle;
use plotline_cache::CacheManager;
use plotline_core::config::AppConfig;
use plotline_core::traits::UserDirectory;
use plotline_database::DatabasePool;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// PostgreSQL connection pool.
    pub db: DatabasePool,
    /// Cache manager (Redis or in-memory).
    pub cache: Arc<CacheManager>,
    /// Session lifecycle orchestrator.
    pub lifecycle: Arc<SessionLifecycle>,
    /// Access-token validator.
    pub token_decoder: Arc<AccessTokenDecoder>,
    /// Password hasher (Argon2).
    pub password_hasher: Arc<PasswordHasher>,
    /// User directory collaborator.
    pub users: Arc<dyn UserDirectory>,
}
