//! Expiry Sweep Task
//!
//! Background task that periodically removes expired cache entries.

use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::{AgedCache, Clock};

/// Spawns a background task that periodically sweeps expired entries.
///
/// The task sleeps for `interval` between runs and only takes the cache lock
/// for the sweep itself. It runs until aborted through the returned handle.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(AgedCache::<String, String>::new());
/// let sweeper = spawn_sweeper(cache.clone(), Duration::from_secs(1));
/// // Later, during shutdown:
/// sweeper.abort();
/// ```
pub fn spawn_sweeper<K, V, C>(
    cache: Arc<AgedCache<K, V, C>>,
    interval: Duration,
) -> JoinHandle<()>
where
    K: Hash + Eq + Send + 'static,
    V: Send + 'static,
    C: Clock + 'static,
{
    tokio::spawn(async move {
        info!(
            "Starting expiry sweeper with interval of {} ms",
            interval.as_millis()
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.sweep();

            if removed > 0 {
                info!("Expiry sweep: removed {} expired entries", removed);
            } else {
                debug!("Expiry sweep: no expired entries found");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;

    fn shared_cache(clock: &ManualClock) -> Arc<AgedCache<String, String, ManualClock>> {
        Arc::new(AgedCache::with_clock_and_capacity(clock.clone(), 16).unwrap())
    }

    #[tokio::test]
    async fn test_sweeper_removes_expired_entries() {
        let clock = ManualClock::new(1000);
        let cache = shared_cache(&clock);
        cache
            .put("expire_soon".to_string(), "value".to_string(), 10)
            .unwrap();

        clock.advance(100);
        let handle = spawn_sweeper(cache.clone(), Duration::from_millis(20));

        tokio::time::sleep(Duration::from_millis(200)).await;

        let stats = cache.stats();
        assert_eq!(stats.swept, 1, "Expired entry should have been swept");
        assert_eq!(stats.lazy_expirations, 0);

        handle.abort();
    }

    #[tokio::test]
    async fn test_sweeper_preserves_live_entries() {
        let clock = ManualClock::new(1000);
        let cache = shared_cache(&clock);
        cache
            .put("long_lived".to_string(), "value".to_string(), 3_600_000)
            .unwrap();

        let handle = spawn_sweeper(cache.clone(), Duration::from_millis(20));

        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(cache.get("long_lived"), Some("value".to_string()));
        assert_eq!(cache.stats().swept, 0);

        handle.abort();
    }

    #[tokio::test]
    async fn test_sweeper_can_be_aborted() {
        let cache: Arc<AgedCache<String, String>> = Arc::new(AgedCache::new());

        let handle = spawn_sweeper(cache, Duration::from_secs(1));

        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
