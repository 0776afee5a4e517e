//! Injectable wall clock.

use std::cell::Cell;

use chrono::{DateTime, Duration, Utc};

/// Source of the current time, so tests can control it.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// The real system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct TestingClock {
    now: Cell<DateTime<Utc>>,
}

impl TestingClock {
    pub const fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Cell::new(now),
        }
    }

    pub fn set(&self, to: DateTime<Utc>) {
        self.now.set(to);
    }

    /// Moves the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for TestingClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}
