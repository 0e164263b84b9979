//! Cache Store Module
//!
//! The aged cache: a fixed array of bucket chains behind one mutex, with
//! lazy expiry on read and an explicit sweep.

use std::borrow::Borrow;
use std::collections::hash_map::RandomState;
use std::fmt;
use std::hash::{BuildHasher, Hash};

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::cache::{Bucket, CacheEntry, CacheStats, Clock, SystemClock, DEFAULT_CAPACITY};
use crate::config::Config;
use crate::error::{CacheError, Result};

/// Everything the lock guards.
struct Table<K, V> {
    buckets: Box<[Bucket<K, V>]>,
    stats: CacheStats,
}

// == Aged Cache ==
/// Fixed-capacity, thread-safe TTL cache.
///
/// `capacity` is the number of hash buckets, not an entry limit: chains grow
/// without bound and the table is never resized. Every operation serializes
/// through a single per-instance lock.
///
/// # Example
/// ```
/// use aged_cache::{AgedCache, ManualClock};
///
/// let clock = ManualClock::new(1000);
/// let cache = AgedCache::with_clock_and_capacity(clock.clone(), 16).unwrap();
///
/// cache.put("foo".to_string(), 42, 10).unwrap();
/// assert_eq!(cache.get("foo"), Some(42));
///
/// clock.advance(11);
/// assert_eq!(cache.get("foo"), None);
/// ```
pub struct AgedCache<K, V, C = SystemClock> {
    clock: C,
    capacity: usize,
    hash_builder: RandomState,
    table: Mutex<Table<K, V>>,
}

impl<K, V> AgedCache<K, V, SystemClock>
where
    K: Hash + Eq,
{
    // == Constructors ==
    /// Creates a cache on the system clock with the default 128 buckets.
    pub fn new() -> Self {
        Self::build(SystemClock, DEFAULT_CAPACITY)
    }

    /// Creates a cache on the system clock with `capacity` buckets.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Self::with_clock_and_capacity(SystemClock, capacity)
    }

    /// Creates a system-clock cache sized from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::with_capacity(config.capacity)
    }
}

impl<K, V> Default for AgedCache<K, V, SystemClock>
where
    K: Hash + Eq,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, C> AgedCache<K, V, C>
where
    K: Hash + Eq,
    C: Clock,
{
    /// Creates a cache on `clock` with the default 128 buckets.
    pub fn with_clock(clock: C) -> Self {
        Self::build(clock, DEFAULT_CAPACITY)
    }

    /// Creates a cache on `clock` with `capacity` buckets.
    ///
    /// Fails with `InvalidArgument` when `capacity` is zero.
    pub fn with_clock_and_capacity(clock: C, capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::InvalidArgument(
                "Capacity must be positive".to_string(),
            ));
        }
        Ok(Self::build(clock, capacity))
    }

    fn build(clock: C, capacity: usize) -> Self {
        let buckets = (0..capacity).map(|_| Bucket::new()).collect();
        Self {
            clock,
            capacity,
            hash_builder: RandomState::new(),
            table: Mutex::new(Table {
                buckets,
                stats: CacheStats::new(),
            }),
        }
    }

    /// Number of hash buckets, fixed at construction.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn bucket_index<Q>(&self, key: &Q) -> usize
    where
        Q: Hash + ?Sized,
    {
        // The hash is unsigned, so no abs() is needed before the modulo
        (self.hash_builder.hash_one(key) % self.capacity as u64) as usize
    }

    // == Put ==
    /// Stores `value` under `key` for `retention_millis` milliseconds.
    ///
    /// An existing entry for `key` is updated in place: its value and expiry
    /// are overwritten and the chain is left as is. Otherwise a new entry is
    /// appended to the bucket's chain. Never triggers a sweep.
    ///
    /// Fails with `InvalidArgument` if `retention_millis <= 0`.
    pub fn put(&self, key: K, value: V, retention_millis: i64) -> Result<()> {
        if retention_millis <= 0 {
            return Err(CacheError::InvalidArgument(format!(
                "Retention must be positive, got {} ms",
                retention_millis
            )));
        }

        let expires_at = self.clock.now_millis().saturating_add(retention_millis);
        let index = self.bucket_index(&key);

        let mut table = self.table.lock();
        let bucket = &mut table.buckets[index];

        if let Some(entry) = bucket.find_mut(&key) {
            entry.value = value;
            entry.expires_at = expires_at;
            return Ok(());
        }

        bucket.push_back(Box::new(CacheEntry::new(key, value, expires_at)));
        Ok(())
    }

    /// Nullable-input form of [`put`](AgedCache::put).
    ///
    /// A `None` key or value is rejected with `InvalidArgument` before the
    /// table is touched.
    pub fn put_optional(
        &self,
        key: Option<K>,
        value: Option<V>,
        retention_millis: i64,
    ) -> Result<()> {
        let key =
            key.ok_or_else(|| CacheError::InvalidArgument("Key cannot be absent".to_string()))?;
        let value = value
            .ok_or_else(|| CacheError::InvalidArgument("Value cannot be absent".to_string()))?;
        self.put(key, value, retention_millis)
    }

    // == Get ==
    /// Returns a clone of the live value stored under `key`.
    ///
    /// An entry found with `expires_at < now` is unlinked on the spot and
    /// reported as absent. An entry expiring exactly at `now` is still live.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.read(key, V::clone)
    }

    /// Returns true if `key` maps to a live entry; same expiry side effect as `get`.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.read(key, |_| ()).is_some()
    }

    fn read<Q, R>(&self, key: &Q, f: impl FnOnce(&V) -> R) -> Option<R>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = self.bucket_index(key);

        let mut guard = self.table.lock();
        let table = &mut *guard;
        let now = self.clock.now_millis();
        let bucket = &mut table.buckets[index];

        match bucket.find(key) {
            Some(entry) if !entry.is_expired(now) => {
                table.stats.record_hit();
                return Some(f(&entry.value));
            }
            Some(_) => {}
            None => {
                table.stats.record_miss();
                return None;
            }
        }

        bucket.unlink(key);
        table.stats.record_lazy_expiration();
        table.stats.record_miss();
        trace!(bucket = index, "Expired entry unlinked on read");
        None
    }

    // == Remove ==
    /// Unlinks `key` and returns its value if it was still live.
    ///
    /// Counts as a lookup in the stats: a live entry is a hit, a missing or
    /// expired one is a miss.
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = self.bucket_index(key);

        let mut guard = self.table.lock();
        let table = &mut *guard;
        let now = self.clock.now_millis();

        let Some(entry) = table.buckets[index].unlink(key) else {
            table.stats.record_miss();
            return None;
        };
        if entry.is_expired(now) {
            table.stats.record_lazy_expiration();
            table.stats.record_miss();
            return None;
        }
        table.stats.record_hit();
        Some(entry.value)
    }

    // == Size ==
    /// Counts live entries across every chain.
    ///
    /// Expired entries are skipped but left in place.
    pub fn size(&self) -> usize {
        let now = self.clock.now_millis();
        let table = self.table.lock();
        Self::count_live(&table, now)
    }

    fn count_live(table: &Table<K, V>, now: i64) -> usize {
        table
            .buckets
            .iter()
            .map(|bucket| bucket.count_live(now))
            .sum()
    }

    // == Is Empty ==
    /// Returns true if no live entry remains.
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    // == Evict Expired ==
    /// Unlinks every entry with `expires_at < now` from every chain.
    ///
    /// Live entries keep their positions. Running it twice with no `put` in
    /// between removes nothing the second time.
    pub fn evict_expired(&self) {
        self.sweep();
    }

    /// Sweep that reports how many entries it dropped.
    pub(crate) fn sweep(&self) -> usize {
        let now = self.clock.now_millis();

        let removed = {
            let mut guard = self.table.lock();
            let table = &mut *guard;
            let removed: usize = table
                .buckets
                .iter_mut()
                .map(|bucket| bucket.remove_expired(now))
                .sum();
            table.stats.record_swept(removed);
            removed
        };

        if removed > 0 {
            debug!(removed, "Swept expired entries");
        }
        removed
    }

    // == Stats ==
    /// Returns a snapshot of the counters plus the current live count.
    pub fn stats(&self) -> CacheStats {
        let now = self.clock.now_millis();
        let table = self.table.lock();
        let mut stats = table.stats.clone();
        stats.live_entries = Self::count_live(&table, now);
        stats
    }

    #[cfg(test)]
    pub(crate) fn physical_len(&self) -> usize {
        self.table.lock().buckets.iter().map(Bucket::len).sum()
    }
}

impl<K, V, C> fmt::Debug for AgedCache<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgedCache")
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}
