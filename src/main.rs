//! Plotline Server — story-platform backend
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use plotline_auth::geo::{HttpIpLocator, NullIpLocator};
use plotline_auth::jwt::{AccessTokenDecoder, TokenIssuer};
use plotline_auth::password::PasswordHasher;
use plotline_auth::session::{
    SessionCache, SessionCleanup, SessionLifecycle, SessionPolicy, SessionStore, Verifier,
};
use plotline_cache::CacheManager;
use plotline_core::config::AppConfig;
use plotline_core::error::AppError;
use plotline_core::traits::{IpLocator, SessionPersistence, UserDirectory};
use plotline_database::DatabasePool;
use plotline_database::repositories::{SessionRepository, UserRepository};

#[tokio::main]
async fn main() {
    let env = std::env::var("PLOTLINE_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Plotline v{}", env!("CARGO_PKG_VERSION"));

    // ── Database connection + migrations ─────────────────────────
    let db = DatabasePool::connect(&config.database).await?;
    plotline_database::migration::run_migrations(db.pool()).await?;

    // ── Cache ────────────────────────────────────────────────────
    tracing::info!(provider = %config.cache.provider, "Initializing cache");
    let cache = Arc::new(CacheManager::new(&config.cache).await?);

    // ── Repositories ─────────────────────────────────────────────
    let sessions: Arc<dyn SessionPersistence> =
        Arc::new(SessionRepository::new(db.pool().clone()));
    let users: Arc<dyn UserDirectory> = Arc::new(UserRepository::new(db.pool().clone()));

    // ── Session core ─────────────────────────────────────────────
    let session_cache = SessionCache::new(Arc::clone(&cache), &config.session);
    let store = Arc::new(SessionStore::new(Arc::clone(&sessions), session_cache));
    let policy = SessionPolicy::new(Arc::clone(&store), &config.session);
    let issuer = Arc::new(TokenIssuer::new(&config.auth));
    let token_decoder = Arc::new(AccessTokenDecoder::new(&config.auth));
    let password_hasher = Arc::new(PasswordHasher::new());

    let locator: Arc<dyn IpLocator> = if config.geo.enabled {
        Arc::new(HttpIpLocator::new(&config.geo)?)
    } else {
        Arc::new(NullIpLocator)
    };

    let lifecycle = Arc::new(SessionLifecycle::new(
        Arc::clone(&store),
        policy,
        Verifier::new(),
        Arc::clone(&issuer),
        Arc::clone(&users),
        locator,
        config.session.clone(),
    ));

    // ── Shutdown channel ─────────────────────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // ── Background session sweep ─────────────────────────────────
    let cleanup = SessionCleanup::new(Arc::clone(&store));
    let cleanup_interval = Duration::from_secs(config.session.cleanup_interval_minutes * 60);
    let cleanup_handle = tokio::spawn(cleanup.run(cleanup_interval, shutdown_rx));

    // ── HTTP server ──────────────────────────────────────────────
    let app_state = plotline_api::AppState {
        config: Arc::new(config.clone()),
        db: db.clone(),
        cache: Arc::clone(&cache),
        lifecycle: Arc::clone(&lifecycle),
        token_decoder: Arc::clone(&token_decoder),
        password_hasher: Arc::clone(&password_hasher),
        users: Arc::clone(&users),
    };

    let app = plotline_api::build_router(app_state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("Plotline server listening on {addr}");

    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
        let _ = shutdown_tx.send(true);
    });

    server
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    // ── Wait for background tasks ────────────────────────────────
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let _ = tokio::time::timeout(grace, cleanup_handle).await;

    db.close().await;
    tracing::info!("Plotline server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
