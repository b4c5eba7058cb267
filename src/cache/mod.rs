//! Cache Module
//!
//! Generic in-process cache with sliding TTL expiry and pluggable eviction.
//! [`CacheMap`] is the engine; [`HotSpotCache`] is the LRU policy on top of it.

mod clock;
mod entry;
mod hot_spot;
mod lru;
mod map;
mod stats;
mod store;


// Re-export public types
pub use clock::{Clock, SystemClock};
pub use entry::CacheEntry;
pub use hot_spot::{HotSpotCache, LruStore};
pub use lru::{LruTracker, NodeId};
pub use map::CacheMap;
pub use stats::CacheStats;
pub use store::{CacheStore, ExpiryState};
