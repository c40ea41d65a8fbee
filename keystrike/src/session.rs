//! # Session Module - Typing Session State Machine
//!
//! This module provides the high-level interface for measuring a typing session. It
//! coordinates the lesson text, keystroke tally, unfixed-error tracking and timing, and
//! produces live statistics and a final [SessionResult].
//!
//! ## Session Lifecycle
//!
#![doc = simple_mermaid::mermaid!("../diagrams/session_lifecycle.mmd")]
//!
//! - `NotStarted → Running` on [TypingSession::start], which starts the clock.
//! - `Running → Finished` as soon as the input is at least as long as the lesson text, or
//!   on [TypingSession::finish_early].
//! - `Finished` is terminal. Edits are ignored from then on.
//!
//! ## Usage Examples
//!
//! ### Feeding edits
//!
//! The session is given the *complete* input buffer after every change, the way a text
//! field reports its value:
//!
//! ```rust
//! use keystrike::{Phase, ScoringMode, SessionConfig, TypingSession};
//!
//! let mut session = TypingSession::new("hello", SessionConfig::new(ScoringMode::Net)).unwrap();
//! session.start();
//!
//! session.apply_edit("h");
//! session.apply_edit("hx"); // Typo
//! session.apply_edit("h"); // Backspace
//! session.apply_edit("he");
//!
//! assert_eq!(session.tally().correct, 2);
//! assert_eq!(session.unfixed_errors(), 0);
//! assert_eq!(session.phase(), Phase::Running);
//! ```
//!
//! ### Deterministic timing
//!
//! ```rust
//! use keystrike::{Duration, ManualClock, ScoringMode, SessionConfig, TypingSession};
//!
//! let clock = ManualClock::new();
//! let config = SessionConfig::new(ScoringMode::Net);
//! let mut session = TypingSession::with_clock("cat", config, clock.clone()).unwrap();
//!
//! session.start();
//! clock.advance(Duration::from_secs(6)); // 0.1 minutes
//! session.apply_edit("c");
//! session.apply_edit("ca");
//! let result = session.apply_edit("cat").unwrap();
//!
//! assert_eq!(result.wpm, 6); // (3 / 5) / 0.1
//! assert_eq!(result.accuracy, 100);
//! ```

use thiserror::Error;
use web_time::Duration;

use crate::math::Performance;
use crate::timer::SessionTimer;
use crate::{
    Clock, Edit, KeystrokeTally, LessonText, LiveStatistics, Placement, SessionConfig,
    SessionResult, SystemClock, minutes,
};

/// Errors raised while configuring a session
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Lesson text is empty")]
    EmptyLesson,

    #[error("Unknown scoring mode '{0}', expected 'gross' or 'net'")]
    UnknownScoringMode(String),
}

/// Where a session is in its lifecycle
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    #[default]
    NotStarted,
    Running,
    Finished,
}

/// A single measured typing session
///
/// Owns everything that lives for the duration of one attempt at a lesson: the input
/// buffer, the keystroke tally, the unfixed-error count and the timing window. All of it is
/// dropped with the session once the result has been taken.
///
/// # Thread Safety
///
/// Input events from one text field are inherently serialized, so the session does no
/// synchronization. Use one session per thread.
#[derive(Debug, Clone)]
pub struct TypingSession<C: Clock = SystemClock> {
    /// The reference text
    text: LessonText,
    /// Scoring mode and backspace policy
    config: SessionConfig,
    /// The learner's current input
    input: Vec<char>,
    /// Correct/incorrect keystroke counters
    tally: KeystrokeTally,
    /// Characters in `input` that currently don't match `text`
    unfixed_errors: usize,
    /// Start and completion instants
    timer: SessionTimer<C>,
    phase: Phase,
    is_first_completion: bool,
    result: Option<SessionResult>,
}

impl TypingSession<SystemClock> {
    /// Create a new typing session timed by the wall clock
    ///
    /// # Errors
    ///
    /// [SessionError::EmptyLesson] if `text` is empty. A session is never created for an
    /// empty lesson.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use keystrike::{SessionConfig, SessionError, TypingSession};
    ///
    /// let session = TypingSession::new("Hello, world!", SessionConfig::default()).unwrap();
    /// assert_eq!(session.text_len(), 13);
    ///
    /// let error = TypingSession::new("", SessionConfig::default()).unwrap_err();
    /// assert_eq!(error, SessionError::EmptyLesson);
    /// ```
    pub fn new(text: &str, config: SessionConfig) -> Result<Self, SessionError> {
        Self::with_clock(text, config, SystemClock)
    }
}

impl<C: Clock> TypingSession<C> {
    /// Create a new typing session timed by `clock`
    pub fn with_clock(text: &str, config: SessionConfig, clock: C) -> Result<Self, SessionError> {
        let text = LessonText::new(text).ok_or(SessionError::EmptyLesson)?;

        Ok(Self {
            input: Vec::with_capacity(text.len()),
            text,
            config,
            tally: KeystrokeTally::default(),
            unfixed_errors: 0,
            timer: SessionTimer::new(clock),
            phase: Phase::NotStarted,
            is_first_completion: true,
            result: None,
        })
    }

    /// Record whether this will be the learner's first completion of the lesson
    /// (builder pattern).
    ///
    /// Look this up in the completion history before starting. Defaults to `true`.
    pub fn with_first_completion(mut self, is_first_completion: bool) -> Self {
        self.is_first_completion = is_first_completion;
        self
    }

    /// Start the session and its clock.
    ///
    /// Only has an effect while the session hasn't started yet.
    pub fn start(&mut self) {
        if self.phase != Phase::NotStarted {
            return;
        }

        self.timer.start();
        self.phase = Phase::Running;
        log::debug!("Session started ({} characters)", self.text.len());
    }

    /// Process an input-change event.
    ///
    /// `input` is the complete new content of the input field, not a delta. The edit is
    /// classified by comparing its length to the previous input, the tally is updated, and
    /// unfixed errors are recounted from scratch.
    ///
    /// Returns the final [SessionResult] if this edit completed the lesson.
    ///
    /// Edits are ignored when the session isn't running, and shrinking edits are ignored
    /// when backspace is disabled.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use keystrike::{Phase, SessionConfig, TypingSession};
    ///
    /// let mut session = TypingSession::new("ok", SessionConfig::default()).unwrap();
    ///
    /// // Not started yet: ignored
    /// assert!(session.apply_edit("o").is_none());
    /// assert_eq!(session.input_len(), 0);
    ///
    /// session.start();
    /// assert!(session.apply_edit("o").is_none());
    /// assert!(session.apply_edit("ok").is_some());
    /// assert_eq!(session.phase(), Phase::Finished);
    /// ```
    pub fn apply_edit(&mut self, input: &str) -> Option<SessionResult> {
        if self.phase != Phase::Running {
            return None;
        }

        let new_input: Vec<char> = input.chars().collect();
        let edit = Edit::classify(&self.input, &new_input, &self.text);

        if edit.is_deletion() && !self.config.backspace_enabled {
            log::warn!("Ignored a deletion while backspace is disabled");
            return None;
        }

        self.tally.apply(edit);
        self.unfixed_errors = self.text.unfixed_errors(&new_input);
        self.input = new_input;

        if self.is_fully_typed() {
            return Some(self.finish());
        }

        None
    }

    /// End a running session before the whole text is typed.
    ///
    /// Returns the result computed from the current input, or `None` if the session isn't
    /// running.
    pub fn finish_early(&mut self) -> Option<SessionResult> {
        if self.phase != Phase::Running {
            return None;
        }

        log::debug!(
            "Session finished early at {}/{} characters",
            self.input.len(),
            self.text.len()
        );
        Some(self.finish())
    }

    /// Transition to `Finished` and compute the result
    fn finish(&mut self) -> SessionResult {
        self.timer.mark_completed();
        self.phase = Phase::Finished;

        let result = SessionResult::new(
            self.performance(),
            self.elapsed(),
            self.is_first_completion,
        );
        log::debug!(
            "Session finished: {} WPM, {}% accuracy, score {}",
            result.wpm,
            result.accuracy,
            result.score
        );

        self.result = Some(result);
        result
    }

    fn performance(&self) -> Performance {
        Performance::measure(
            &self.tally,
            self.unfixed_errors,
            minutes(self.elapsed().as_secs_f64()),
            self.config.scoring_mode,
        )
    }

    /// Current speed, accuracy and elapsed time.
    ///
    /// Uses the same formulas as the final result. Once finished, the values are frozen at
    /// the completion time.
    pub fn live(&self) -> LiveStatistics {
        LiveStatistics::new(self.performance(), self.elapsed())
    }

    /// The final result, available once the session is finished
    pub const fn result(&self) -> Option<&SessionResult> {
        self.result.as_ref()
    }

    /// Evaluate the current input with the placement assessment formulas
    pub fn placement(&self) -> Placement {
        let input: String = self.input.iter().collect();
        Placement::assess(&input, &self.text, self.elapsed())
    }

    pub const fn phase(&self) -> Phase {
        self.phase
    }

    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub const fn text(&self) -> &LessonText {
        &self.text
    }

    /// Get the total number of characters in the text
    pub fn text_len(&self) -> usize {
        self.text.len()
    }

    /// The learner's current input
    pub fn input(&self) -> &[char] {
        &self.input
    }

    /// Get the number of characters currently typed
    pub fn input_len(&self) -> usize {
        self.input.len()
    }

    pub const fn tally(&self) -> &KeystrokeTally {
        &self.tally
    }

    /// Characters in the current input that don't match the text
    pub const fn unfixed_errors(&self) -> usize {
        self.unfixed_errors
    }

    /// Check if the input covers the whole text
    pub fn is_fully_typed(&self) -> bool {
        self.input.len() >= self.text.len()
    }

    /// Time since start, frozen once finished
    pub fn elapsed(&self) -> Duration {
        self.timer.elapsed()
    }

    /// Get the typing completion percentage
    ///
    /// Returns a value between 0.0 and 100.0.
    pub fn completion_percentage(&self) -> f64 {
        let typed = self.input.len().min(self.text.len());
        (typed as f64 / self.text.len() as f64) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ManualClock, PlacementLevel, ScoringMode};

    fn session(text: &str, config: SessionConfig) -> (TypingSession<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        let session = TypingSession::with_clock(text, config, clock.clone()).unwrap();
        (session, clock)
    }

    /// Feed each prefix of `text` as its own edit
    fn type_out(session: &mut TypingSession<ManualClock>, text: &str) -> Option<SessionResult> {
        let mut result = None;
        for (index, _) in text.char_indices().skip(1) {
            result = session.apply_edit(&text[..index]);
        }
        result.or_else(|| session.apply_edit(text))
    }

    #[test]
    fn test_empty_lesson_is_rejected() {
        let error = TypingSession::with_clock("", SessionConfig::default(), ManualClock::new())
            .unwrap_err();
        assert_eq!(error, SessionError::EmptyLesson);
    }

    #[test]
    fn test_lifecycle() {
        let (mut session, _) = session("ab", SessionConfig::default());
        assert_eq!(session.phase(), Phase::NotStarted);

        session.start();
        assert_eq!(session.phase(), Phase::Running);

        session.apply_edit("a");
        assert_eq!(session.phase(), Phase::Running);
        assert!(session.result().is_none());

        let result = session.apply_edit("ab");
        assert!(result.is_some());
        assert_eq!(session.phase(), Phase::Finished);
        assert_eq!(session.result(), result.as_ref());

        // Terminal: no more edits, no restart
        assert!(session.apply_edit("a").is_none());
        assert_eq!(session.input_len(), 2);
        session.start();
        assert_eq!(session.phase(), Phase::Finished);
        assert!(session.finish_early().is_none());
    }

    #[test]
    fn test_edits_before_start_are_ignored() {
        let (mut session, _) = session("cat", SessionConfig::default());

        assert!(session.apply_edit("c").is_none());
        assert_eq!(session.tally(), &KeystrokeTally::default());
        assert_eq!(session.input_len(), 0);
        assert!(session.finish_early().is_none());
    }

    #[test]
    fn test_exact_typing() {
        let text = "the quick brown fox";
        let (mut session, clock) = session(text, SessionConfig::default());

        session.start();
        clock.advance(Duration::from_secs(12));
        let result = type_out(&mut session, text).unwrap();

        assert_eq!(session.tally().correct, text.len());
        assert_eq!(session.tally().incorrect, 0);
        assert_eq!(session.unfixed_errors(), 0);
        assert_eq!(result.accuracy, 100);
    }

    #[test]
    fn test_cat_net_scenario() {
        let (mut session, clock) = session("cat", SessionConfig::new(ScoringMode::Net));

        session.start();
        clock.advance(Duration::from_secs(6));
        assert!(session.apply_edit("c").is_none());
        assert!(session.apply_edit("ca").is_none());
        let result = session.apply_edit("cat").unwrap();

        assert_eq!(session.tally().total(), 3);
        assert_eq!(result.wpm, 6);
        assert_eq!(result.accuracy, 100);
        // 1.5 + 25 = 26.5
        assert_eq!(result.score, 27);
        assert_eq!(result.time_spent_seconds, 6);
        assert!(result.is_first_completion);
    }

    #[test]
    fn test_finish_early_with_error() {
        let (mut session, clock) = session("cat", SessionConfig::new(ScoringMode::Net));

        session.start();
        clock.advance(Duration::from_secs(6));
        assert!(session.apply_edit("x").is_none());
        assert_eq!(session.tally().correct, 0);
        assert_eq!(session.tally().incorrect, 1);

        let result = session.finish_early().unwrap();
        assert_eq!(result.accuracy, 0);
        assert_eq!(result.wpm, 0);
        assert_eq!(result.score, 0);
        assert_eq!(session.phase(), Phase::Finished);
    }

    #[test]
    fn test_finish_without_keystrokes() {
        let (mut session, clock) = session("cat", SessionConfig::default());

        session.start();
        clock.advance(Duration::from_secs(30));
        let result = session.finish_early().unwrap();

        assert_eq!(result.wpm, 0);
        assert_eq!(result.accuracy, 0);
        assert_eq!(result.score, 0);
        assert_eq!(result.time_spent_seconds, 30);
    }

    #[test]
    fn test_zero_elapsed_time() {
        let (mut session, _) = session("ab", SessionConfig::default());

        session.start();
        let result = type_out(&mut session, "ab").unwrap();
        assert_eq!(result.wpm, 0);
        assert_eq!(result.accuracy, 0);
    }

    #[test]
    fn test_delete_and_retype_clears_error() {
        let (mut session, _) = session("cat", SessionConfig::default());
        session.start();

        session.apply_edit("c");
        session.apply_edit("cx");
        assert_eq!(session.unfixed_errors(), 1);
        assert_eq!(session.tally().incorrect, 1);

        // Overwrite through delete + retype
        session.apply_edit("c");
        assert_eq!(session.unfixed_errors(), 0);
        assert_eq!(session.tally().incorrect, 0);

        session.apply_edit("cx");
        session.apply_edit("cxy");
        session.apply_edit("cx");
        session.apply_edit("c");
        session.apply_edit("ca");
        assert_eq!(session.unfixed_errors(), 0);
        assert_eq!(session.tally().correct, 2);
        assert_eq!(session.tally().incorrect, 0);
    }

    #[test]
    fn test_unfixed_errors_follow_current_input() {
        let (mut session, _) = session("cat", SessionConfig::default());
        session.start();

        // An equal-length replacement changes no tally, but the buffer is rescanned
        session.apply_edit("x");
        assert_eq!(session.unfixed_errors(), 1);
        session.apply_edit("c");
        assert_eq!(session.unfixed_errors(), 0);
        assert_eq!(session.tally().incorrect, 1);
        assert_eq!(session.tally().correct, 0);
    }

    #[test]
    fn test_insert_then_delete_restores_state() {
        let (mut session, _) = session("hello", SessionConfig::default());
        session.start();
        session.apply_edit("he");

        let tally = *session.tally();
        let errors = session.unfixed_errors();

        for typed in ["hel", "hex"] {
            session.apply_edit(typed);
            session.apply_edit("he");
            assert_eq!(session.tally(), &tally);
            assert_eq!(session.unfixed_errors(), errors);
        }
    }

    #[test]
    fn test_same_buffer_twice_is_idempotent() {
        let (mut session, _) = session("hello", SessionConfig::default());
        session.start();

        session.apply_edit("hx");
        let tally = *session.tally();
        let errors = session.unfixed_errors();

        session.apply_edit("hx");
        assert_eq!(session.tally(), &tally);
        assert_eq!(session.unfixed_errors(), errors);
    }

    #[test]
    fn test_backspace_disabled_ignores_deletions() {
        let config = SessionConfig::new(ScoringMode::Gross).with_backspace(false);
        let (mut session, _) = session("cat", config);
        session.start();

        session.apply_edit("c");
        session.apply_edit("cx");
        assert!(session.apply_edit("c").is_none());

        assert_eq!(session.input(), &['c', 'x']);
        assert_eq!(session.tally().incorrect, 1);
        assert_eq!(session.unfixed_errors(), 1);
    }

    #[test]
    fn test_gross_is_never_below_net() {
        let edits = ["t", "tx", "txs", "tx", "t", "te", "tes", "tesx", "tesxx"];
        let text = "testing";

        let results = [ScoringMode::Gross, ScoringMode::Net].map(|mode| {
            let (mut session, clock) = session(text, SessionConfig::new(mode));
            session.start();
            for edit in edits {
                clock.advance(Duration::from_millis(700));
                session.apply_edit(edit);
            }
            session.finish_early().unwrap()
        });

        let [gross, net] = results;
        assert!(gross.wpm >= net.wpm);
        assert_eq!(gross.accuracy, net.accuracy);
    }

    #[test]
    fn test_live_statistics() {
        let (mut session, clock) = session("hello world", SessionConfig::default());
        assert_eq!(session.live(), LiveStatistics::default());

        session.start();
        clock.advance(Duration::from_secs(3));
        session.apply_edit("h");
        session.apply_edit("he");
        session.apply_edit("hex");
        clock.advance(Duration::from_millis(1500));

        let live = session.live();
        assert_eq!(live.elapsed_seconds, 4);
        assert_eq!(live.accuracy, 67);

        // Frozen once finished
        let result = session.finish_early().unwrap();
        clock.advance(Duration::from_secs(60));
        assert_eq!(session.live().elapsed_seconds, result.time_spent_seconds);
        assert_eq!(session.live().wpm, result.wpm);
    }

    #[test]
    fn test_overflowing_input_finishes() {
        let (mut session, _) = session("ab", SessionConfig::default());
        session.start();

        // Pasted past the end of the text
        let result = session.apply_edit("abc");
        assert!(result.is_some());
        assert_eq!(session.unfixed_errors(), 1);
        assert_eq!(session.tally().incorrect, 1);
    }

    #[test]
    fn test_first_completion_flag() {
        let clock = ManualClock::new();
        let mut session = TypingSession::with_clock("a", SessionConfig::default(), clock)
            .unwrap()
            .with_first_completion(false);

        session.start();
        assert!(!session.apply_edit("a").unwrap().is_first_completion);
    }

    #[test]
    fn test_completion_percentage() {
        let (mut session, _) = session("hello", SessionConfig::default());
        assert_eq!(session.completion_percentage(), 0.0);

        session.start();
        session.apply_edit("h");
        assert_eq!(session.completion_percentage(), 20.0);
    }

    #[test]
    fn test_placement_from_session() {
        let text = "one two three four";
        let (mut session, clock) = session(text, SessionConfig::new(ScoringMode::Gross));

        session.start();
        clock.advance(Duration::from_secs(6));
        type_out(&mut session, text).unwrap();

        let placement = session.placement();
        // 4 words in 0.1 minutes
        assert_eq!(placement.wpm, 40);
        assert_eq!(placement.accuracy, 100);
        assert_eq!(placement.level, PlacementLevel::Intermediate);
    }
}
