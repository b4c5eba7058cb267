//! Time Source Module
//!
//! Abstracts "now" so expiry can be driven by a mock clock in tests.

use std::sync::Arc;
use std::time::Instant;

/// Source of monotonic time for entry bookkeeping.
pub trait Clock: Send + Sync + 'static {
    /// Current instant (monotonic time)
    fn now(&self) -> Instant;
}

/// Real system clock used in production.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

impl<T: Clock> Clock for Arc<T> {
    fn now(&self) -> Instant {
        (**self).now()
    }
}
