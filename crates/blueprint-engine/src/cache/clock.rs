//! Monotonic access timestamps for LRU eviction.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Source of access timestamps for LRU ordering.
pub trait Clock: Send + Sync + fmt::Debug {
    /// A value strictly greater than any returned before.
    fn tick(&self) -> u64;
}

/// Logical counter clock; successive ticks never tie.
#[derive(Debug, Default)]
pub struct TickClock {
    counter: AtomicU64,
}

impl TickClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for TickClock {
    fn tick(&self) -> u64 {
        self.counter.fetch_add(1, Ordering::Relaxed) + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strictly_increasing() {
        let clock = TickClock::new();
        let a = clock.tick();
        let b = clock.tick();
        let c = clock.tick();
        assert!(a < b && b < c);
    }
}
