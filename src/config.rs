//! Configuration Module
//!
//! Handles loading cache configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::cache::DEFAULT_CAPACITY;

/// Default interval between background sweeps, in milliseconds
pub const DEFAULT_SWEEP_INTERVAL_MS: u64 = 1000;

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Number of hash buckets (fixed for the cache's lifetime)
    pub capacity: usize,
    /// Background sweep interval in milliseconds
    pub sweep_interval_ms: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `AGED_CACHE_CAPACITY` - Bucket count (default: 128)
    /// - `AGED_CACHE_SWEEP_INTERVAL_MS` - Sweep frequency in milliseconds (default: 1000)
    pub fn from_env() -> Self {
        Self {
            capacity: env::var("AGED_CACHE_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_CAPACITY),
            sweep_interval_ms: env::var("AGED_CACHE_SWEEP_INTERVAL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SWEEP_INTERVAL_MS),
        }
    }

    /// Sweep interval as a `Duration`.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_millis(self.sweep_interval_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            sweep_interval_ms: DEFAULT_SWEEP_INTERVAL_MS,
        }
    }
}
