//! Per-user session list mirrored into the cache.
//!
//! The cache is a secondary, denormalized index of the session store keyed
//! by user id. It accelerates session listings only: every read tolerates
//! a miss or staleness and falls back to the store, and no validity
//! decision is ever made from cached data. Cache failures degrade to a
//! warning; they never fail the mutation that triggered them.

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;
use uuid::Uuid;

use plotline_cache::{CacheManager, keys};
use plotline_core::config::session::SessionConfig;
use plotline_core::traits::CacheProvider;
use plotline_entity::session::Session;

/// Write-through mirror of a user's active sessions.
#[derive(Debug, Clone)]
pub struct SessionCache {
    cache: Arc<CacheManager>,
    ttl: Duration,
}

impl SessionCache {
    /// Creates a new session cache.
    pub fn new(cache: Arc<CacheManager>, config: &SessionConfig) -> Self {
        Self {
            cache,
            ttl: Duration::from_secs(config.cache_ttl_seconds),
        }
    }

    /// Reads the mirrored session list. `None` on miss or any cache error.
    pub async fn read(&self, user_id: Uuid) -> Option<Vec<Session>> {
        match self
            .cache
            .get_json::<Vec<Session>>(&keys::user_sessions(user_id))
            .await
        {
            Ok(sessions) => sessions,
            Err(e) => {
                warn!(%user_id, error = %e, "Session cache read failed; falling back to store");
                None
            }
        }
    }

    /// Replaces the mirrored session list for a user.
    pub async fn write(&self, user_id: Uuid, sessions: &[Session]) {
        if let Err(e) = self
            .cache
            .set_json(&keys::user_sessions(user_id), &sessions, self.ttl)
            .await
        {
            warn!(%user_id, error = %e, "Session cache write failed");
        }
    }

    /// Drops the mirrored session list for a user.
    pub async fn invalidate(&self, user_id: Uuid) {
        if let Err(e) = self.cache.delete(&keys::user_sessions(user_id)).await {
            warn!(%user_id, error = %e, "Session cache invalidation failed");
        }
    }
}
