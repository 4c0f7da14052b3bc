//! IP geolocation collaborator interface.

use async_trait::async_trait;

/// Resolves an IP address to a human-readable location.
///
/// Lookups are best effort: any failure resolves to `None` and the caller
/// renders a placeholder. Results are not cached.
#[async_trait]
pub trait IpLocator: Send + Sync + std::fmt::Debug + 'static {
    /// Resolve an IP address to a display string such as `"Berlin, Germany"`.
    async fn locate(&self, ip: &str) -> Option<String>;
}
