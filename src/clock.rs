//! # Clock Module
//!
//! Monotonic time source used by the cache store. Production code reads
//! `Instant::now()`; tests drive a manual clock to simulate expiry without
//! sleeping.

use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Source of the current monotonic instant
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Monotonic system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to
///
/// Time is a fixed base instant plus an offset, so it never goes backwards
/// below the base.
#[derive(Debug)]
pub struct ManualClock {
    base: Instant,
    offset: Mutex<Duration>,
}

impl ManualClock {
    /// Start the clock at the current instant
    pub fn new() -> Self {
        Self {
            base: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        }
    }

    /// Move the clock forward
    pub fn advance(&self, by: Duration) {
        let mut offset = self.offset.lock().unwrap_or_else(PoisonError::into_inner);
        *offset = offset.saturating_add(by);
    }

    /// Jump to `elapsed` after the starting instant
    pub fn set_elapsed(&self, elapsed: Duration) {
        *self.offset.lock().unwrap_or_else(PoisonError::into_inner) = elapsed;
    }

    /// Time advanced since the clock was created
    pub fn elapsed(&self) -> Duration {
        *self.offset.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.base + self.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advances() {
        let clock = ManualClock::new();
        let start = clock.now();

        clock.advance(Duration::from_millis(1500));
        assert_eq!(clock.now(), start + Duration::from_millis(1500));
        assert_eq!(clock.elapsed(), Duration::from_millis(1500));

        clock.set_elapsed(Duration::ZERO);
        assert_eq!(clock.now(), start);
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock;
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }
}
