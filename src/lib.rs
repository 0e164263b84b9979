//! Aged Cache - a fixed-capacity, thread-safe TTL cache
//!
//! Entries live in a manually chained hash table guarded by one lock per
//! cache instance. Expired entries are dropped lazily when read, or in bulk
//! by an explicit (optionally background) sweep.

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{AgedCache, CacheStats, Clock, ManualClock, SystemClock, DEFAULT_CAPACITY};
pub use config::Config;
pub use error::{CacheError, Result};
pub use tasks::spawn_sweeper;
