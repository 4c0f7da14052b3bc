//! Session management configuration.

use serde::{Deserialize, Serialize};

/// Session management configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Maximum concurrently valid sessions per user. Exceeding the cap
    /// wipes all of the user's existing sessions before the new one is
    /// created.
    #[serde(default = "default_max_sessions")]
    pub max_sessions_count: u32,
    /// Session lifetime in days (refresh token validity).
    #[serde(default = "default_session_ttl")]
    pub session_ttl_days: u64,
    /// TTL for the per-user session list mirrored into the cache, in seconds.
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_seconds: u64,
    /// Interval for the expired session sweep in minutes.
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_minutes: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_sessions_count: default_max_sessions(),
            session_ttl_days: default_session_ttl(),
            cache_ttl_seconds: default_cache_ttl(),
            cleanup_interval_minutes: default_cleanup_interval(),
        }
    }
}

fn default_max_sessions() -> u32 {
    5
}

fn default_session_ttl() -> u64 {
    30
}

fn default_cache_ttl() -> u64 {
    300
}

fn default_cleanup_interval() -> u64 {
    15
}
