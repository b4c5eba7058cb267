//! Hotspot Cache - A generic in-process key/value cache
//!
//! Bounded by entry count, with sliding time-to-live expiry checked lazily on
//! access and least-recently-used eviction under capacity pressure.
//!
//! ```
//! use std::time::Duration;
//!
//! use hotspot_cache::HotSpotCache;
//!
//! let cache: HotSpotCache<&str, i32> = HotSpotCache::new(2, Duration::ZERO);
//! cache.put("a", 1);
//! cache.put("b", 2);
//! assert_eq!(cache.get(&"a"), Some(1));
//!
//! cache.put("c", 3); // evicts "b", the least recently used
//! assert_eq!(cache.get(&"b"), None);
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod testing;

pub use cache::{CacheMap, CacheStats, CacheStore, Clock, HotSpotCache, SystemClock};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
