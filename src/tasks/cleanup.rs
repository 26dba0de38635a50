//! Expiry Sweeper Task
//!
//! Background task that periodically drops expired entries from the
//! in-process backend. Network stores expire keys themselves and need no
//! sweeper.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::MemoryBackend;

/// Spawns a task that sweeps `store` every `cleanup_interval_secs` seconds.
///
/// Returns the JoinHandle so the caller can abort it during graceful
/// shutdown.
///
/// # Example
/// ```ignore
/// let store = MemoryBackend::new();
/// let sweeper = spawn_cleanup_task(store.clone(), 1);
/// // Later, during shutdown:
/// sweeper.abort();
/// ```
pub fn spawn_cleanup_task(store: MemoryBackend, cleanup_interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting expiry sweeper with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = store.cleanup_expired().await;
            if removed > 0 {
                info!("Expiry sweep: removed {} expired entries", removed);
            } else {
                debug!("Expiry sweep: no expired entries found");
            }
        }
    })
}
