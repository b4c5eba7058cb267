//! Cache Entry Module
//!
//! Defines the unit of storage with sliding TTL bookkeeping.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// A single cache entry with its access metadata.
///
/// Key and value are fixed for the entry's lifetime. `last_access` and
/// `access_count` change only through [`CacheEntry::touch`], which the owning
/// map calls while holding exclusive access.
#[derive(Debug, Clone)]
pub struct CacheEntry<K, V> {
    key: K,
    value: V,
    /// Idle timeout, `Duration::ZERO` = never expires
    ttl: Duration,
    created_at: Instant,
    last_access: Instant,
    access_count: u64,
}

impl<K, V> CacheEntry<K, V> {
    // == Constructor ==
    /// Creates a new entry whose idle countdown starts at `now`.
    pub fn new(key: K, value: V, ttl: Duration, now: Instant) -> Self {
        Self {
            key,
            value,
            ttl,
            created_at: now,
            last_access: now,
            access_count: 0,
        }
    }

    // == Is Expired ==
    /// Checks whether the entry has been idle for at least its TTL.
    ///
    /// Expiry slides with every access: it is measured from `last_access`,
    /// not from creation. Entries with a zero TTL never expire.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        if self.ttl.is_zero() {
            return false;
        }
        now.saturating_duration_since(self.last_access) >= self.ttl
    }

    // == Touch ==
    /// Records a successful read and returns the stored value.
    pub fn touch(&mut self, now: Instant) -> &V {
        self.last_access = now;
        self.access_count += 1;
        &self.value
    }

    // == Time To Live ==
    /// Returns the idle time left before expiry.
    ///
    /// - `None` if the entry never expires
    /// - `Some(Duration::ZERO)` once it has expired
    pub fn remaining_ttl_at(&self, now: Instant) -> Option<Duration> {
        if self.ttl.is_zero() {
            return None;
        }
        let idle = now.saturating_duration_since(self.last_access);
        Some(self.ttl.saturating_sub(idle))
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    pub fn last_access(&self) -> Instant {
        self.last_access
    }

    /// Number of successful reads. Diagnostic only.
    pub fn access_count(&self) -> u64 {
        self.access_count
    }

    pub fn into_value(self) -> V {
        self.value
    }
}
