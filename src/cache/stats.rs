//! Cache Statistics Module
//!
//! Tracks per-instance lookup outcomes and expiry activity.

use serde::Serialize;

// == Cache Stats ==
/// Counters kept alongside the table, under the same lock.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Lookups that returned a live value
    pub hits: u64,
    /// Lookups that found nothing or found an expired entry
    pub misses: u64,
    /// Entries unlinked because a read found them expired
    pub lazy_expirations: u64,
    /// Entries unlinked by explicit sweeps
    pub swept: u64,
    /// Live entries at the time of the snapshot
    pub live_entries: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub(crate) fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub(crate) fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub(crate) fn record_lazy_expiration(&mut self) {
        self.lazy_expirations += 1;
    }

    pub(crate) fn record_swept(&mut self, count: usize) {
        self.swept += count as u64;
    }
}
