//! Testing Utilities
//!
//! Deterministic time for tests that exercise expiry.
//!
//! ```
//! use std::time::Duration;
//!
//! use hotspot_cache::testing::MockClock;
//! use hotspot_cache::HotSpotCache;
//!
//! let clock = MockClock::new();
//! let cache: HotSpotCache<&str, i32, MockClock> =
//!     HotSpotCache::with_clock(0, Duration::from_secs(1), clock.clone());
//! cache.put("a", 1);
//!
//! clock.advance(Duration::from_secs(1));
//! assert_eq!(cache.get(&"a"), None);
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::cache::Clock;

/// Manually advanced clock.
///
/// Clones share the same elapsed time, so a test can keep one handle and
/// hand another to the cache.
#[derive(Debug, Clone)]
pub struct MockClock {
    start: Instant,
    elapsed: Arc<Mutex<Duration>>,
}

impl MockClock {
    /// Creates a mock clock frozen at the current instant.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            elapsed: Arc::new(Mutex::new(Duration::ZERO)),
        }
    }

    /// Moves the clock forward without real time passing.
    pub fn advance(&self, duration: Duration) {
        *self.elapsed.lock() += duration;
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MockClock {
    fn now(&self) -> Instant {
        self.start + *self.elapsed.lock()
    }
}
