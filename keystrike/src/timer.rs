use web_time::{Duration, Instant};

use crate::Clock;

/// Tracks the timing window of a session
#[derive(Debug, Clone)]
pub struct SessionTimer<C: Clock> {
    clock: C,
    started_at: Option<Instant>,
    completed_at: Option<Instant>,
}

impl<C: Clock> SessionTimer<C> {
    pub const fn new(clock: C) -> Self {
        Self {
            clock,
            started_at: None,
            completed_at: None,
        }
    }

    /// Start timing. Does nothing if already started.
    pub fn start(&mut self) {
        if self.started_at.is_none() {
            self.started_at = Some(self.clock.now());
        }
    }

    /// Check if timing has started
    pub const fn has_started(&self) -> bool {
        self.started_at.is_some()
    }

    /// Stop timing. Does nothing if never started or already stopped.
    pub fn mark_completed(&mut self) {
        if self.started_at.is_some() && self.completed_at.is_none() {
            self.completed_at = Some(self.clock.now());
        }
    }

    /// Check if the session has been completed
    pub const fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Time since start, frozen once completed. Zero before start.
    pub fn elapsed(&self) -> Duration {
        let Some(start) = self.started_at else {
            return Duration::ZERO;
        };

        self.completed_at
            .unwrap_or_else(|| self.clock.now())
            .saturating_duration_since(start)
    }
}
