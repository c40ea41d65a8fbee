//! # Keystrike
//!
//! Real-time typing performance measurement for typing trainers.
//!
//! A [TypingSession] is fed the *whole* input buffer after every edit. It keeps a running
//! [KeystrokeTally], recomputes the number of unfixed errors against the [LessonText] and
//! derives words per minute, accuracy and a bounded lesson score from those counters.
//!
//! ```rust
//! use keystrike::{ScoringMode, SessionConfig, TypingSession};
//!
//! let mut session = TypingSession::new("cat", SessionConfig::new(ScoringMode::Net)).unwrap();
//! session.start();
//! session.apply_edit("c");
//! session.apply_edit("ca");
//! let result = session.apply_edit("cat").expect("typing the whole lesson finishes it");
//! assert_eq!(result.accuracy, 100);
//! ```

pub mod assessment;
pub mod clock;
pub mod config;
pub mod math;
pub mod rank;
pub mod session;
pub mod statistics;
pub mod tally;
pub mod text;
mod timer;

pub use assessment::{Placement, PlacementLevel};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ScoringMode, SessionConfig};
pub use rank::{RankProgress, RankTier};
pub use session::{Phase, SessionError, TypingSession};
pub use statistics::{LiveStatistics, SessionResult};
pub use tally::{Edit, KeystrokeTally};
pub use text::LessonText;

pub use web_time::{Duration, Instant};

const AVERAGE_WORD_LENGTH: usize = 5;

// Types for more general type-safety
type Seconds = f64;
type Minutes = f64;

// Get the minutes elapsed from a duration in seconds
pub(crate) fn minutes(seconds: Seconds) -> Minutes {
    seconds / 60.0
}
