//! # Clock Module - Time Sources
//!
//! Sessions read time through the [Clock] trait so that timing can be driven
//! deterministically (e.g. in tests or replays) with a [ManualClock].

use std::{cell::Cell, rc::Rc};

use web_time::{Duration, Instant};

/// A source of the current instant
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Wall clock backed by [Instant::now]
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same time, so a test can keep one handle and give another to a
/// session.
///
/// ```rust
/// use keystrike::{Clock, Duration, ManualClock};
///
/// let clock = ManualClock::new();
/// let handle = clock.clone();
/// let before = handle.now();
///
/// clock.advance(Duration::from_secs(6));
/// assert_eq!(handle.now() - before, Duration::from_secs(6));
/// ```
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<Instant>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Rc::new(Cell::new(Instant::now())),
        }
    }

    /// Move the clock forward
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}
