//! IP geolocation lookup for session listings.

use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use plotline_core::config::geo::GeoConfig;
use plotline_core::error::AppError;
use plotline_core::traits::IpLocator;

/// Response shape of an ip-api style geolocation endpoint.
#[derive(Debug, Deserialize)]
struct GeoResponse {
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    country: Option<String>,
}

/// Resolves session IPs against an external ip-api style service.
///
/// Lookups run once per listed session and are not cached; the endpoint
/// and timeout come from configuration.
#[derive(Debug, Clone)]
pub struct HttpIpLocator {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpIpLocator {
    /// Creates a locator from configuration.
    pub fn new(config: &GeoConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl IpLocator for HttpIpLocator {
    async fn locate(&self, ip: &str) -> Option<String> {
        // Private and loopback addresses never resolve to anything useful.
        let addr: IpAddr = ip.parse().ok()?;
        if is_non_routable(&addr) {
            return None;
        }

        let url = format!("{}/{ip}", self.endpoint);
        let response = match self.client.get(&url).send().await {
            Ok(r) => r,
            Err(e) => {
                debug!(ip, error = %e, "Geolocation lookup failed");
                return None;
            }
        };

        let body: GeoResponse = response.json().await.ok()?;
        match (body.city, body.country) {
            (Some(city), Some(country)) => Some(format!("{city}, {country}")),
            (None, Some(country)) => Some(country),
            _ => None,
        }
    }
}

/// A locator that never resolves, used when geolocation is disabled.
#[derive(Debug, Clone, Default)]
pub struct NullIpLocator;

#[async_trait]
impl IpLocator for NullIpLocator {
    async fn locate(&self, _ip: &str) -> Option<String> {
        None
    }
}

fn is_non_routable(addr: &IpAddr) -> bool {
    match addr {
        IpAddr::V4(v4) => v4.is_private() || v4.is_loopback() || v4.is_link_local(),
        IpAddr::V6(v6) => v6.is_loopback(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn null_locator_resolves_nothing() {
        assert_eq!(NullIpLocator.locate("203.0.113.7").await, None);
    }

    #[test]
    fn private_addresses_are_non_routable() {
        assert!(is_non_routable(&"192.168.1.10".parse().unwrap()));
        assert!(is_non_routable(&"127.0.0.1".parse().unwrap()));
        assert!(!is_non_routable(&"203.0.113.7".parse().unwrap()));
    }
}
