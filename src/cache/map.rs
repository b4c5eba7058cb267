//! Cache Map Module
//!
//! Generic cache engine: locking, entry bookkeeping, and the capacity
//! protocol. What an eviction or sweep actually does is delegated to a
//! [`CacheStore`] implementation.

use std::fmt;
use std::marker::PhantomData;
use std::time::Duration;

use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::cache::stats::StatsRecorder;
use crate::cache::{CacheEntry, CacheStats, CacheStore, Clock, ExpiryState, SystemClock};
use crate::config::CacheConfig;
use crate::error::Result;

/// State guarded by the cache lock.
struct Inner<S> {
    store: S,
    has_custom_ttl: bool,
}

// == Cache Map ==
/// Thread-safe cache over a pluggable [`CacheStore`].
///
/// One read/write lock guards the whole store. Writers (`put`, `remove`,
/// `clear`, `eliminate`) take it exclusively. Lookups start under shared
/// access and only switch to exclusive access when they must mutate:
/// promoting a hit or dropping an expired entry. Nothing runs in the
/// background; expiry is checked lazily on access or by a sweep when full.
pub struct CacheMap<K, V, S, C = SystemClock> {
    inner: RwLock<Inner<S>>,
    /// Maximum number of entries, 0 = unlimited
    capacity: usize,
    /// TTL for puts without an explicit one, zero = never expires
    default_ttl: Duration,
    clock: C,
    stats: StatsRecorder,
    _marker: PhantomData<fn() -> (K, V)>,
}

impl<K, V, S, C> CacheMap<K, V, S, C>
where
    S: CacheStore<K, V>,
    C: Clock,
{
    // == Constructor ==
    /// Creates an empty cache using `clock` as its time source.
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of entries, 0 = unlimited
    /// * `default_ttl` - Idle timeout for puts without an explicit TTL, zero = never expires
    /// * `clock` - Time source for access bookkeeping
    pub fn with_clock(capacity: usize, default_ttl: Duration, clock: C) -> Self {
        debug!(
            capacity,
            default_ttl_ms = default_ttl.as_millis() as u64,
            "cache created"
        );
        Self {
            inner: RwLock::new(Inner {
                store: S::with_capacity(capacity),
                has_custom_ttl: false,
            }),
            capacity,
            default_ttl,
            clock,
            stats: StatsRecorder::new(),
            _marker: PhantomData,
        }
    }

    /// Creates an empty cache from validated configuration.
    pub fn with_config(config: &CacheConfig, clock: C) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_clock(config.capacity, config.default_ttl(), clock))
    }

    // == Put ==
    /// Stores a value under the default TTL.
    pub fn put(&self, key: K, value: V) {
        self.put_with_ttl(key, value, self.default_ttl);
    }

    /// Stores a value with an explicit TTL, overwriting any existing entry.
    ///
    /// When the cache is full, a sweep runs first so expired entries are
    /// reclaimed before the store has to evict a live one. The insert itself
    /// may then push the store one over capacity, in which case the store
    /// drops its eviction candidate inside the same exclusive section.
    pub fn put_with_ttl(&self, key: K, value: V, ttl: Duration) {
        let mut inner = self.inner.write();
        let entry = CacheEntry::new(key, value, ttl, self.clock.now());

        if !ttl.is_zero() {
            inner.has_custom_ttl = true;
        }
        if self.is_full_locked(&inner) {
            self.eliminate_locked(&mut inner);
        }

        if inner.store.insert(entry).is_some() {
            self.stats.record_eviction();
            debug!(capacity = self.capacity, "evicted least recently used entry");
        }
        self.stats.record_insert();
    }

    // == Get ==
    /// Retrieves a value, refreshing its last-access time.
    ///
    /// Expired entries are removed and reported as absent. A miss is
    /// answered under shared access; a hit or an expired entry takes the
    /// write lock, since both mutate the store.
    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        if self.inner.read().store.peek(key).is_none() {
            self.stats.record_miss();
            trace!("cache miss");
            return None;
        }

        // The entry may have been replaced or removed between the two locks.
        let mut inner = self.inner.write();
        let now = self.clock.now();
        let expired = match inner.store.peek(key) {
            Some(entry) => entry.is_expired_at(now),
            None => {
                self.stats.record_miss();
                trace!("cache miss after taking write lock");
                return None;
            }
        };

        if expired {
            inner.store.remove(key);
            self.stats.record_miss();
            self.stats.record_expirations(1);
            trace!("removed expired entry on read");
            return None;
        }

        let value = inner
            .store
            .get_mut(key)
            .map(|entry| entry.touch(now).clone());
        if value.is_some() {
            self.stats.record_hit();
        }
        value
    }

    // == Peek ==
    /// Reads a live value without touching it.
    ///
    /// Neither recency nor last-access time change, and an expired entry is
    /// reported absent but left in place.
    pub fn peek(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        let now = self.clock.now();
        let inner = self.inner.read();
        inner
            .store
            .peek(key)
            .filter(|entry| !entry.is_expired_at(now))
            .map(|entry| entry.value().clone())
    }

    /// Whether a live entry exists for `key`. Never mutates.
    pub fn contains_key(&self, key: &K) -> bool {
        let now = self.clock.now();
        let inner = self.inner.read();
        inner
            .store
            .peek(key)
            .is_some_and(|entry| !entry.is_expired_at(now))
    }

    /// Number of successful reads recorded on the entry for `key`.
    pub fn access_count(&self, key: &K) -> Option<u64> {
        let inner = self.inner.read();
        inner.store.peek(key).map(CacheEntry::access_count)
    }

    // == Remove ==
    /// Removes an entry, returning its value. Absent keys are a no-op.
    pub fn remove(&self, key: &K) -> Option<V> {
        let mut inner = self.inner.write();
        inner.store.remove(key).map(CacheEntry::into_value)
    }

    // == Clear ==
    pub fn clear(&self) {
        let mut inner = self.inner.write();
        let dropped = inner.store.len();
        inner.store.clear();
        debug!(dropped, "cache cleared");
    }

    // == Size ==
    pub fn size(&self) -> usize {
        self.inner.read().store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().store.is_empty()
    }

    // == Is Full ==
    /// `capacity > 0 && size >= capacity`; an unlimited cache is never full.
    pub fn is_full(&self) -> bool {
        let inner = self.inner.read();
        self.is_full_locked(&inner)
    }

    // == Eliminate ==
    /// Runs the store's sweep under exclusive access.
    ///
    /// Returns the number of entries removed; safe to call at any time.
    pub fn eliminate(&self) -> usize {
        let mut inner = self.inner.write();
        self.eliminate_locked(&mut inner)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Whether any put so far supplied a non-zero TTL.
    pub fn has_custom_ttl(&self) -> bool {
        self.inner.read().has_custom_ttl
    }

    /// Whether a sweep could ever remove anything.
    pub fn needs_expiry_sweep(&self) -> bool {
        let inner = self.inner.read();
        self.expiry_state(&inner).is_active()
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        let size = self.size();
        self.stats.snapshot(size, self.capacity)
    }

    /// Runs `f` against the store under shared access.
    pub(crate) fn read_store<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        let inner = self.inner.read();
        f(&inner.store)
    }

    fn is_full_locked(&self, inner: &Inner<S>) -> bool {
        self.capacity > 0 && inner.store.len() >= self.capacity
    }

    fn expiry_state(&self, inner: &Inner<S>) -> ExpiryState {
        ExpiryState {
            default_ttl: self.default_ttl,
            has_custom_ttl: inner.has_custom_ttl,
        }
    }

    fn eliminate_locked(&self, inner: &mut Inner<S>) -> usize {
        let expiry = self.expiry_state(inner);
        let removed = inner.store.eliminate_cache(expiry, self.clock.now());
        if removed > 0 {
            self.stats.record_expirations(removed);
            debug!(removed, remaining = inner.store.len(), "swept expired entries");
        }
        removed
    }
}

impl<K, V, S, C> fmt::Debug for CacheMap<K, V, S, C>
where
    S: CacheStore<K, V>,
    C: Clock,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheMap")
            .field("capacity", &self.capacity)
            .field("default_ttl", &self.default_ttl)
            .field("size", &self.size())
            .finish_non_exhaustive()
    }
}
