//! Periodic sweep of expired session rows.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{error, info};

use plotline_core::error::AppError;

use super::store::SessionStore;

/// Deletes expired sessions on an interval.
///
/// Expired rows are already invisible to every read path; the sweep keeps
/// the table from growing without bound and drops the affected users'
/// cache mirrors.
#[derive(Debug, Clone)]
pub struct SessionCleanup {
    store: Arc<SessionStore>,
}

impl SessionCleanup {
    /// Creates a new cleanup handler.
    pub fn new(store: Arc<SessionStore>) -> Self {
        Self { store }
    }

    /// Runs a single sweep. Returns the number of rows removed.
    pub async fn run_sweep(&self) -> Result<u64, AppError> {
        let purged = self.store.purge_expired().await?;
        if purged > 0 {
            info!(purged, "Expired sessions removed");
        }
        Ok(purged)
    }

    /// Runs sweeps on the given interval until shutdown is signalled.
    pub async fn run(self, interval: Duration, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(interval);
        // The first tick fires immediately; skip it so startup stays quiet.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.run_sweep().await {
                        error!(error = %e, "Session sweep failed");
                    }
                }
                _ = shutdown.changed() => {
                    info!("Session cleanup stopping");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::support;
    use super::*;

    #[tokio::test]
    async fn sweep_removes_only_expired_rows() {
        let (store, sessions, _cache) = support::store();
        let store = Arc::new(store);
        let user_id = uuid::Uuid::new_v4();

        store
            .create(&support::new_session(user_id, "fp-live"))
            .await
            .unwrap();
        store
            .create(&support::expired_session(user_id, "fp-dead"))
            .await
            .unwrap();
        store
            .create(&support::expired_session(user_id, "fp-dead-2"))
            .await
            .unwrap();

        let cleanup = SessionCleanup::new(Arc::clone(&store));
        assert_eq!(cleanup.run_sweep().await.unwrap(), 2);
        assert_eq!(sessions.len(), 1);

        // A second sweep finds nothing.
        assert_eq!(cleanup.run_sweep().await.unwrap(), 0);
    }
}
