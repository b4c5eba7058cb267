//! Cache Store Module
//!
//! The backing-store seam between the generic [`CacheMap`](super::CacheMap)
//! engine and a concrete eviction policy.

use std::time::{Duration, Instant};

use crate::cache::CacheEntry;

/// Expiry bookkeeping the engine hands to a policy's sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryState {
    /// TTL applied to puts that don't supply one
    pub default_ttl: Duration,
    /// Whether any put so far used a non-zero TTL
    pub has_custom_ttl: bool,
}

impl ExpiryState {
    /// True when some entry could ever expire, i.e. a sweep can find work.
    pub fn is_active(&self) -> bool {
        !self.default_ttl.is_zero() || self.has_custom_ttl
    }
}

// == Cache Store ==
/// Backing store plus eviction policy.
///
/// The engine owns locking and entry bookkeeping; an implementation decides
/// how entries are ordered, which entry an over-capacity insert drops, and
/// what a capacity-pressure sweep removes. Every `&mut self` method is only
/// ever called under the engine's exclusive lock.
pub trait CacheStore<K, V> {
    /// Creates an empty store bounded at `capacity` entries (0 = unlimited).
    fn with_capacity(capacity: usize) -> Self
    where
        Self: Sized;

    /// Looks up an entry without recording an access.
    fn peek(&self, key: &K) -> Option<&CacheEntry<K, V>>;

    /// Looks up an entry and records an access in the policy's ordering.
    fn get_mut(&mut self, key: &K) -> Option<&mut CacheEntry<K, V>>;

    /// Inserts or overwrites an entry.
    ///
    /// Returns the entry the policy dropped to stay within capacity, if any.
    /// Overwriting an existing key never evicts.
    fn insert(&mut self, entry: CacheEntry<K, V>) -> Option<CacheEntry<K, V>>;

    fn remove(&mut self, key: &K) -> Option<CacheEntry<K, V>>;

    fn clear(&mut self);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Frees space under capacity pressure, returning how many entries were removed.
    fn eliminate_cache(&mut self, expiry: ExpiryState, now: Instant) -> usize;
}
