//! Expiry Sweeper Task
//!
//! Background task that periodically removes expired entries from the
//! in-memory store. Reads already skip expired keys; the sweep only
//! reclaims their memory.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::memory::MemoryStore;

/// Spawns a task that purges expired entries every `interval_secs` seconds
/// until `shutdown` is cancelled.
///
/// # Example
/// ```ignore
/// let shutdown = CancellationToken::new();
/// let sweeper = spawn_expiry_sweeper(store.clone(), 1, shutdown.clone());
/// // Later, during shutdown:
/// shutdown.cancel();
/// sweeper.await?;
/// ```
pub fn spawn_expiry_sweeper(
    store: MemoryStore,
    interval_secs: u64,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(interval_secs.max(1));

    tokio::spawn(async move {
        info!(interval_secs = interval.as_secs(), "Starting expiry sweeper");

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = tokio::time::sleep(interval) => {}
            }

            let removed = store.purge_expired().await;
            if removed > 0 {
                info!(removed, "Expiry sweep removed entries");
            } else {
                debug!("Expiry sweep found nothing to remove");
            }
        }

        info!("Expiry sweeper stopped");
    })
}
