//! Cache Entry Module
//!
//! Defines a single chained entry with its absolute expiry timestamp.

// == Cache Entry ==
/// One key/value pair in a bucket chain.
#[derive(Debug)]
pub struct CacheEntry<K, V> {
    /// The key, immutable once linked
    pub key: K,
    /// The stored value, overwritten in place on update
    pub value: V,
    /// Expiration timestamp (Unix milliseconds)
    pub expires_at: i64,
    /// Next entry in the same bucket
    pub(crate) next: Option<Box<CacheEntry<K, V>>>,
}

impl<K, V> CacheEntry<K, V> {
    // == Constructor ==
    /// Creates an unlinked entry expiring at `expires_at`.
    pub fn new(key: K, value: V, expires_at: i64) -> Self {
        Self {
            key,
            value,
            expires_at,
            next: None,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now`.
    ///
    /// Boundary condition: an entry whose expiry equals `now` is still live.
    /// Only `expires_at < now` counts as expired.
    pub fn is_expired(&self, now: i64) -> bool {
        self.expires_at < now
    }

    // == Time To Live ==
    /// Returns remaining TTL in milliseconds at `now`, or 0 once elapsed.
    pub fn ttl_remaining_ms(&self, now: i64) -> u64 {
        u64::try_from(self.expires_at.saturating_sub(now)).unwrap_or(0)
    }
}
