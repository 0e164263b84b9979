//! Cache Module
//!
//! Provides a fixed-capacity TTL cache built on a chained hash table, with
//! lazy expiry on read and an explicit expiry sweep.

mod bucket;
mod clock;
mod entry;
mod stats;
mod store;


// Re-export public types
pub use bucket::Bucket;
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use stats::CacheStats;
pub use store::AgedCache;

// == Public Constants ==
/// Bucket count used when none is given
pub const DEFAULT_CAPACITY: usize = 128;
