//! Hot-Spot Cache Module
//!
//! Recency-eviction policy: an access-ordered store that drops its least
//! recently used entry when an insert overflows capacity, plus an
//! expired-entry sweep for when the cache is full and TTLs are in use.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

use crate::cache::lru::{LruTracker, NodeId};
use crate::cache::{CacheEntry, CacheMap, CacheStore, Clock, ExpiryState, SystemClock};
use crate::config::CacheConfig;
use crate::error::Result;

/// Upper bound on slots reserved up front, whatever the capacity.
const MAX_PREALLOCATED: usize = 4096;

/// Cache map using least-recently-used eviction.
pub type HotSpotCache<K, V, C = SystemClock> = CacheMap<K, V, LruStore<K, V>, C>;

#[derive(Debug)]
struct Slot<K, V> {
    entry: CacheEntry<K, V>,
    node: NodeId,
}

// == LRU Store ==
/// Access-ordered backing store.
///
/// Every `get_mut` and every insert moves the key to the most recently used
/// end. With a non-zero capacity, an insert that grows the store past
/// capacity evicts the least recently used entry.
#[derive(Debug)]
pub struct LruStore<K, V> {
    entries: HashMap<K, Slot<K, V>>,
    order: LruTracker<K>,
    capacity: usize,
}

impl<K, V> LruStore<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Keys from most to least recently used.
    pub fn keys_by_recency(&self) -> impl Iterator<Item = &K> + '_ {
        self.order.iter()
    }

    fn evict_overflow(&mut self) -> Option<CacheEntry<K, V>> {
        if self.capacity == 0 || self.entries.len() <= self.capacity {
            return None;
        }
        let key = self.order.evict_oldest()?;
        self.entries.remove(&key).map(|slot| slot.entry)
    }
}

impl<K, V> CacheStore<K, V> for LruStore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn with_capacity(capacity: usize) -> Self {
        let reserved = capacity.saturating_add(1).min(MAX_PREALLOCATED);
        Self {
            entries: HashMap::with_capacity(reserved),
            order: LruTracker::with_capacity(reserved),
            capacity,
        }
    }

    fn peek(&self, key: &K) -> Option<&CacheEntry<K, V>> {
        self.entries.get(key).map(|slot| &slot.entry)
    }

    fn get_mut(&mut self, key: &K) -> Option<&mut CacheEntry<K, V>> {
        let slot = self.entries.get_mut(key)?;
        self.order.touch(slot.node);
        Some(&mut slot.entry)
    }

    fn insert(&mut self, entry: CacheEntry<K, V>) -> Option<CacheEntry<K, V>> {
        if let Some(slot) = self.entries.get_mut(entry.key()) {
            slot.entry = entry;
            self.order.touch(slot.node);
            return None;
        }

        let key = entry.key().clone();
        let node = self.order.push_front(key.clone());
        self.entries.insert(key, Slot { entry, node });
        self.evict_overflow()
    }

    fn remove(&mut self, key: &K) -> Option<CacheEntry<K, V>> {
        let slot = self.entries.remove(key)?;
        self.order.remove(slot.node);
        Some(slot.entry)
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    /// Removes every expired entry.
    ///
    /// Does nothing when no entry can ever expire. Runs before the insert
    /// that would otherwise evict, so expired entries go before live ones.
    fn eliminate_cache(&mut self, expiry: ExpiryState, now: Instant) -> usize {
        if !expiry.is_active() {
            return 0;
        }

        let before = self.entries.len();
        let order = &mut self.order;
        self.entries.retain(|_, slot| {
            if slot.entry.is_expired_at(now) {
                order.remove(slot.node);
                false
            } else {
                true
            }
        });
        before - self.entries.len()
    }
}

impl<K, V> HotSpotCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an LRU cache on the system clock.
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of entries, 0 = unlimited
    /// * `default_ttl` - Idle timeout for puts without an explicit TTL, zero = never expires
    pub fn new(capacity: usize, default_ttl: Duration) -> Self {
        Self::with_clock(capacity, default_ttl, SystemClock)
    }

    /// Creates an LRU cache from validated configuration.
    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        Self::with_config(config, SystemClock)
    }
}

impl<K, V, C> HotSpotCache<K, V, C>
where
    K: Eq + Hash + Clone,
    C: Clock,
{
    /// Snapshot of keys from most to least recently used.
    pub fn keys_by_recency(&self) -> Vec<K> {
        self.read_store(|store| store.keys_by_recency().cloned().collect())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockClock;

    const NO_EXPIRY: ExpiryState = ExpiryState {
        default_ttl: Duration::ZERO,
        has_custom_ttl: false,
    };

    fn entry(
        key: &'static str,
        value: u32,
        ttl: Duration,
        now: Instant,
    ) -> CacheEntry<&'static str, u32> {
        CacheEntry::new(key, value, ttl, now)
    }

    fn recency(store: &LruStore<&'static str, u32>) -> Vec<&'static str> {
        store.keys_by_recency().copied().collect()
    }

    #[test]
    fn test_store_auto_evicts_least_recent() {
        let now = Instant::now();
        let mut store = LruStore::with_capacity(2);

        assert!(store.insert(entry("a", 1, Duration::ZERO, now)).is_none());
        assert!(store.insert(entry("b", 2, Duration::ZERO, now)).is_none());
        store.get_mut(&"a");

        let evicted = store.insert(entry("c", 3, Duration::ZERO, now)).unwrap();
        assert_eq!(evicted.key(), &"b");
        assert_eq!(store.len(), 2);
        assert_eq!(recency(&store), vec!["c", "a"]);
    }

    #[test]
    fn test_store_overwrite_never_evicts() {
        let now = Instant::now();
        let mut store = LruStore::with_capacity(2);

        store.insert(entry("a", 1, Duration::ZERO, now));
        store.insert(entry("b", 2, Duration::ZERO, now));

        assert!(store.insert(entry("a", 10, Duration::ZERO, now)).is_none());
        assert_eq!(store.len(), 2);
        assert_eq!(store.peek(&"a").map(|e| *e.value()), Some(10));
        assert_eq!(recency(&store), vec!["a", "b"]);
    }

    #[test]
    fn test_store_peek_keeps_order() {
        let now = Instant::now();
        let mut store = LruStore::with_capacity(0);

        store.insert(entry("a", 1, Duration::ZERO, now));
        store.insert(entry("b", 2, Duration::ZERO, now));
        store.peek(&"a");

        assert_eq!(recency(&store), vec!["b", "a"]);
    }

    #[test]
    fn test_store_unlimited_never_auto_evicts() {
        let now = Instant::now();
        let mut store = LruStore::with_capacity(0);

        for (i, key) in ["a", "b", "c", "d", "e"].into_iter().enumerate() {
            assert!(store.insert(entry(key, i as u32, Duration::ZERO, now)).is_none());
        }
        assert_eq!(store.len(), 5);
    }

    #[test]
    fn test_store_sweep_skipped_without_ttls() {
        let now = Instant::now();
        let mut store = LruStore::with_capacity(4);
        store.insert(entry("a", 1, Duration::from_millis(1), now));

        // Inactive expiry state means no scan at all
        let later = now + Duration::from_secs(1);
        assert_eq!(store.eliminate_cache(NO_EXPIRY, later), 0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_sweep_removes_only_expired() {
        let now = Instant::now();
        let mut store = LruStore::with_capacity(4);
        store.insert(entry("a", 1, Duration::from_millis(10), now));
        store.insert(entry("b", 2, Duration::ZERO, now));
        store.insert(entry("c", 3, Duration::from_millis(10), now));
        store.insert(entry("d", 4, Duration::from_secs(10), now));

        let expiry = ExpiryState {
            default_ttl: Duration::ZERO,
            has_custom_ttl: true,
        };
        let removed = store.eliminate_cache(expiry, now + Duration::from_millis(20));

        assert_eq!(removed, 2);
        assert_eq!(recency(&store), vec!["d", "b"]);
    }

    #[test]
    fn test_store_remove_and_clear() {
        let now = Instant::now();
        let mut store = LruStore::with_capacity(3);
        store.insert(entry("a", 1, Duration::ZERO, now));
        store.insert(entry("b", 2, Duration::ZERO, now));

        assert_eq!(store.remove(&"a").map(CacheEntry::into_value), Some(1));
        assert!(store.remove(&"a").is_none());
        assert_eq!(recency(&store), vec!["b"]);

        store.clear();
        assert!(store.is_empty());
        assert_eq!(recency(&store), Vec::<&str>::new());
    }

    #[test]
    fn test_hot_spot_lru_scenario() {
        let cache: HotSpotCache<&str, i32, MockClock> =
            HotSpotCache::with_clock(2, Duration::ZERO, MockClock::new());

        cache.put("A", 1);
        cache.put("B", 2);
        assert_eq!(cache.get(&"A"), Some(1));
        cache.put("C", 3);

        assert_eq!(cache.get(&"B"), None);
        assert_eq!(cache.get(&"A"), Some(1));
        assert_eq!(cache.get(&"C"), Some(3));
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn test_hot_spot_prefers_expired_over_live() {
        let clock = MockClock::new();
        let cache: HotSpotCache<&str, i32, MockClock> =
            HotSpotCache::with_clock(2, Duration::ZERO, clock.clone());

        cache.put("live", 1);
        cache.put_with_ttl("stale", 2, Duration::from_millis(10));
        // "live" is now the least recently used entry
        clock.advance(Duration::from_millis(20));

        cache.put("new", 3);

        assert_eq!(cache.size(), 2);
        assert_eq!(cache.get(&"live"), Some(1));
        assert_eq!(cache.get(&"new"), Some(3));
        let stats = cache.stats();
        assert_eq!(stats.expirations, 1);
        assert_eq!(stats.evictions, 0);
    }

    #[test]
    fn test_hot_spot_evicts_when_nothing_expired() {
        let clock = MockClock::new();
        let cache: HotSpotCache<&str, i32, MockClock> =
            HotSpotCache::with_clock(2, Duration::from_secs(60), clock.clone());

        cache.put("a", 1);
        cache.put("b", 2);
        clock.advance(Duration::from_secs(1));
        cache.put("c", 3);

        assert_eq!(cache.keys_by_recency(), vec!["c", "b"]);
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn test_hot_spot_get_promotes_and_counts() {
        let cache: HotSpotCache<&str, i32, MockClock> =
            HotSpotCache::with_clock(3, Duration::ZERO, MockClock::new());

        cache.put("a", 1);
        cache.put("b", 2);
        cache.put("c", 3);
        cache.get(&"a");
        cache.get(&"a");

        assert_eq!(cache.keys_by_recency(), vec!["a", "c", "b"]);
        assert_eq!(cache.access_count(&"a"), Some(2));
        assert_eq!(cache.access_count(&"b"), Some(0));
        assert_eq!(cache.access_count(&"z"), None);
    }

    #[test]
    fn test_hot_spot_from_config() {
        let config = CacheConfig {
            capacity: 16,
            default_ttl_ms: 250,
        };
        let cache: HotSpotCache<String, String> = HotSpotCache::from_config(&config).unwrap();

        assert_eq!(cache.capacity(), 16);
        assert_eq!(cache.default_ttl(), Duration::from_millis(250));
        assert!(cache.needs_expiry_sweep());
    }
}
