//! # Assessment Module - Placement Test Scoring
//!
//! The one-off placement assessment uses simpler formulas than lesson scoring: speed is
//! counted in whole typed words and accuracy is measured against the full length of the
//! text, so stopping early is penalized.

use std::str::FromStr;

use web_time::Duration;

use crate::{
    LessonText,
    math::{per_minute, percentage, round},
    minutes,
};

/// Speed needed for [PlacementLevel::Intermediate]
const INTERMEDIATE_WPM: u32 = 40;
/// Speed needed for [PlacementLevel::Advanced]
const ADVANCED_WPM: u32 = 60;

/// The level a learner is placed at
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PlacementLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl PlacementLevel {
    /// Pick the level for a measured speed
    pub const fn from_wpm(wpm: u32) -> Self {
        if wpm >= ADVANCED_WPM {
            Self::Advanced
        } else if wpm >= INTERMEDIATE_WPM {
            Self::Intermediate
        } else {
            Self::Beginner
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }
}

impl std::fmt::Display for PlacementLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlacementLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            other => Err(format!("Unknown level '{other}'")),
        }
    }
}

/// Outcome of a placement assessment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub wpm: u32,
    /// Percentage between 0 and 100
    pub accuracy: u32,
    pub level: PlacementLevel,
}

impl Placement {
    /// Score a placement attempt.
    ///
    /// * `input` - What the learner typed
    /// * `text` - The assessment passage
    /// * `elapsed` - Time from start to completion
    ///
    /// ```rust
    /// use keystrike::{Duration, LessonText, Placement, PlacementLevel};
    ///
    /// let text = LessonText::new("a b c d e").unwrap();
    /// let placement = Placement::assess("a b c d e", &text, Duration::from_secs(6));
    ///
    /// assert_eq!(placement.wpm, 50);
    /// assert_eq!(placement.accuracy, 100);
    /// assert_eq!(placement.level, PlacementLevel::Intermediate);
    /// ```
    pub fn assess(input: &str, text: &LessonText, elapsed: Duration) -> Self {
        let words = input.split_whitespace().count();
        let wpm = round(per_minute(words as f64, minutes(elapsed.as_secs_f64())));

        let typed: Vec<char> = input.chars().collect();
        let accuracy = round(percentage(text.correct_characters(&typed), text.len()));

        Self {
            wpm,
            accuracy,
            level: PlacementLevel::from_wpm(wpm),
        }
    }
}
