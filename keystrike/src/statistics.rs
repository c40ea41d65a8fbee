use web_time::Duration;

use crate::math::Performance;

/// Statistics for display while a session is running
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LiveStatistics {
    pub wpm: u32,
    /// Percentage between 0 and 100
    pub accuracy: u32,
    /// Whole seconds since the session started
    pub elapsed_seconds: u64,
}

impl LiveStatistics {
    pub(crate) const fn new(performance: Performance, elapsed: Duration) -> Self {
        Self {
            wpm: performance.wpm,
            accuracy: performance.accuracy,
            elapsed_seconds: elapsed.as_secs(),
        }
    }
}

/// The final outcome of a session.
///
/// Created once, when the session finishes. The session hands out copies; persisting the
/// result is up to the caller, and a failed write can simply be retried with the same
/// value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionResult {
    pub wpm: u32,
    /// Percentage between 0 and 100
    pub accuracy: u32,
    /// Lesson score between 0 and 60
    pub score: u32,
    pub time_spent_seconds: u64,
    /// True if the learner had never completed this lesson before the session
    pub is_first_completion: bool,
}

impl SessionResult {
    pub(crate) fn new(
        performance: Performance,
        elapsed: Duration,
        is_first_completion: bool,
    ) -> Self {
        Self {
            wpm: performance.wpm,
            accuracy: performance.accuracy,
            score: performance.score(),
            time_spent_seconds: elapsed.as_secs(),
            is_first_completion,
        }
    }
}
