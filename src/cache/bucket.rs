//! Bucket Chain Module
//!
//! A singly linked chain of entries that share one hash slot.

use std::borrow::Borrow;

use crate::cache::CacheEntry;

type Link<K, V> = Option<Box<CacheEntry<K, V>>>;

/// Compares a stored key against a borrowed lookup key.
fn key_matches<K, Q>(stored: &K, key: &Q) -> bool
where
    K: Borrow<Q>,
    Q: Eq + ?Sized,
{
    key.eq(stored.borrow())
}

// == Bucket ==
/// Owned head of one bucket chain.
///
/// Order within a chain carries no meaning, but the operations here keep the
/// relative order of surviving entries anyway.
pub struct Bucket<K, V> {
    head: Link<K, V>,
}

impl<K, V> Bucket<K, V> {
    // == Constructor ==
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self { head: None }
    }

    /// Returns true if the chain holds no entries, live or expired.
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Physical chain length, expired entries included.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Iterates over every linked entry from the head.
    pub fn iter(&self) -> impl Iterator<Item = &CacheEntry<K, V>> {
        std::iter::successors(self.head.as_deref(), |entry| entry.next.as_deref())
    }

    // == Find ==
    /// Returns the entry whose key equals `key`, expired or not.
    pub fn find<Q>(&self, key: &Q) -> Option<&CacheEntry<K, V>>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.iter().find(|entry| key_matches(&entry.key, key))
    }

    /// Mutable variant of [`find`](Bucket::find).
    pub fn find_mut<Q>(&mut self, key: &Q) -> Option<&mut CacheEntry<K, V>>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        let mut current = self.head.as_deref_mut();
        while let Some(entry) = current {
            if key_matches(&entry.key, key) {
                return Some(entry);
            }
            current = entry.next.as_deref_mut();
        }
        None
    }

    // == Push Back ==
    /// Appends an entry at the tail of the chain.
    pub fn push_back(&mut self, entry: Box<CacheEntry<K, V>>) {
        let mut link = &mut self.head;
        while let Some(existing) = link {
            link = &mut existing.next;
        }
        *link = Some(entry);
    }

    // == Unlink ==
    /// Detaches the entry matching `key` and re-links its neighbours.
    ///
    /// Keys are unique per table, so the walk stops at the first match.
    pub fn unlink<Q>(&mut self, key: &Q) -> Option<Box<CacheEntry<K, V>>>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        let mut rest = self.head.take();
        let mut tail = &mut self.head;

        while let Some(mut entry) = rest {
            rest = entry.next.take();
            if key_matches(&entry.key, key) {
                *tail = rest;
                return Some(entry);
            }
            tail = &mut tail.insert(entry).next;
        }
        None
    }

    // == Remove Expired ==
    /// Unlinks every entry with `expires_at < now`.
    ///
    /// Survivors keep their relative order; the head is re-pointed when it is
    /// removed. Returns the number of entries dropped.
    pub fn remove_expired(&mut self, now: i64) -> usize {
        let mut rest = self.head.take();
        let mut tail = &mut self.head;
        let mut removed = 0;

        while let Some(mut entry) = rest {
            rest = entry.next.take();
            if entry.is_expired(now) {
                removed += 1;
            } else {
                tail = &mut tail.insert(entry).next;
            }
        }
        removed
    }

    // == Count Live ==
    /// Counts entries still live at `now` without unlinking anything.
    pub fn count_live(&self, now: i64) -> usize {
        self.iter().filter(|entry| !entry.is_expired(now)).count()
    }
}

impl<K, V> Default for Bucket<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

// Iterative teardown; the default recursive drop of a long chain can
// exhaust the stack.
impl<K, V> Drop for Bucket<K, V> {
    fn drop(&mut self) {
        let mut current = self.head.take();
        while let Some(mut entry) = current {
            current = entry.next.take();
        }
    }
}
