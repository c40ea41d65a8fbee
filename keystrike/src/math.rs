//! # Math Module - Speed, Accuracy and Score Formulas
//!
//! Pure functions shared by live display, final lesson results and the placement
//! assessment. Every value shown to the learner is rounded half away from zero.
//!
//! ## Formulas
//!
//! - `gross = (keystrokes / 5) / minutes`
//! - `net = max(0, gross - unfixed_errors / minutes)`
//! - `accuracy = 100 * correct / keystrokes`
//! - `score = round((min(wpm / 4, 25) + accuracy / 4) * bonus)`, where `bonus` is 1.2 for
//!   at least 60 WPM at 95% accuracy and 1.0 otherwise.
//!
//! No keystrokes or no elapsed time yields 0 WPM and 0% accuracy.

use crate::{AVERAGE_WORD_LENGTH, KeystrokeTally, Minutes, ScoringMode};

/// WPM points per word per minute
const WPM_WEIGHT: f64 = 0.25;
/// Maximum points awarded for speed
const WPM_SCORE_CAP: f64 = 25.0;
/// Points per accuracy percent
const ACCURACY_WEIGHT: f64 = 0.25;
/// Speed needed for the bonus multiplier
const BONUS_WPM: u32 = 60;
/// Accuracy needed for the bonus multiplier
const BONUS_ACCURACY: u32 = 95;
const BONUS_MULTIPLIER: f64 = 1.2;

/// Round a non-negative measurement for display
pub fn round(value: f64) -> u32 {
    if value.is_finite() && value > 0.0 {
        value.round() as u32
    } else {
        0
    }
}

/// `count` per minute, or 0.0 when no time has passed
pub fn per_minute(count: f64, minutes: Minutes) -> f64 {
    if minutes <= 0.0 {
        return 0.0;
    }
    count / minutes
}

/// `part` as a percentage of `whole`, or 0.0 for an empty whole
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    (part as f64 / whole as f64) * 100.0
}

/// Words Per Minute
#[derive(Debug, Default, Clone, Copy, PartialEq, PartialOrd)]
pub struct Wpm {
    /// Raw speed: keystrokes in words per minute, no penalty
    pub gross: f64,
    /// Speed with the unfixed-error penalty applied, clamped at 0
    pub net: f64,
}

impl Wpm {
    /// Calculate Words Per Minute
    ///
    /// * `keystrokes` - How many keystrokes are currently counted
    /// * `unfixed_errors` - How many characters in the input are currently wrong
    /// * `minutes` - How many minutes have gone by
    ///
    pub fn calculate(keystrokes: usize, unfixed_errors: usize, minutes: Minutes) -> Self {
        if keystrokes == 0 || minutes <= 0.0 {
            return Self::default();
        }

        let gross = per_minute(keystrokes as f64 / AVERAGE_WORD_LENGTH as f64, minutes);
        // Errors Per Minute
        let epm = per_minute(unfixed_errors as f64, minutes);

        Self {
            gross,
            net: (gross - epm).max(0.0),
        }
    }

    /// The rounded value used by `mode`
    pub fn rounded(&self, mode: ScoringMode) -> u32 {
        match mode {
            ScoringMode::Gross => round(self.gross),
            ScoringMode::Net => round(self.net),
        }
    }
}

/// Share of counted keystrokes that were correct, as a rounded percentage.
pub fn accuracy(tally: &KeystrokeTally) -> u32 {
    round(percentage(tally.correct, tally.total()))
}

/// Rounded speed and accuracy at a point in time
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Performance {
    pub wpm: u32,
    pub accuracy: u32,
}

impl Performance {
    /// Measure performance from the current counters.
    ///
    /// This is the single formula behind both live display and final results.
    pub fn measure(
        tally: &KeystrokeTally,
        unfixed_errors: usize,
        minutes: Minutes,
        mode: ScoringMode,
    ) -> Self {
        if tally.total() == 0 || minutes <= 0.0 {
            return Self::default();
        }

        Self {
            wpm: Wpm::calculate(tally.total(), unfixed_errors, minutes).rounded(mode),
            accuracy: accuracy(tally),
        }
    }

    /// The lesson score for this performance
    pub fn score(&self) -> u32 {
        score(self.wpm, self.accuracy)
    }
}

/// Lesson score between 0 and 60.
///
/// Speed contributes up to 25 points (reached at 100 WPM), accuracy up to 25 points.
/// The sum is multiplied by 1.2 when both speed and accuracy are excellent.
pub fn score(wpm: u32, accuracy: u32) -> u32 {
    let wpm_score = (f64::from(wpm) * WPM_WEIGHT).min(WPM_SCORE_CAP);
    let accuracy_score = f64::from(accuracy) * ACCURACY_WEIGHT;
    let bonus = if wpm >= BONUS_WPM && accuracy >= BONUS_ACCURACY {
        BONUS_MULTIPLIER
    } else {
        1.0
    };

    round((wpm_score + accuracy_score) * bonus)
}
