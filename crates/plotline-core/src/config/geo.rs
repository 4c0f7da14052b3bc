//! IP geolocation configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the external IP geolocation lookup used when
/// listing a user's active sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoConfig {
    /// Whether geolocation lookups are performed at all.
    #[serde(default)]
    pub enabled: bool,
    /// Base URL of the ip-api style endpoint; the IP is appended as a
    /// path segment.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Per-lookup timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_endpoint(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_endpoint() -> String {
    "http://ip-api.com/json".to_string()
}

fn default_timeout() -> u64 {
    2
}
