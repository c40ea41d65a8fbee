//! # Configuration Module - Session Behavior Settings
//!
//! Settings that are fixed when a [TypingSession](crate::TypingSession) is created.
//!
//! ## Usage
//!
//! ```rust
//! use keystrike::config::{ScoringMode, SessionConfig};
//!
//! // Visible-text lesson, backspace allowed
//! let config = SessionConfig::new(ScoringMode::Net);
//!
//! // Dictation lesson without corrections
//! let config = SessionConfig::new(ScoringMode::Gross).with_backspace(false);
//! assert!(!config.backspace_enabled);
//! ```

use std::str::FromStr;

use crate::session::SessionError;

/// How words per minute are derived from the keystroke tally
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoringMode {
    /// Raw speed without error penalty. Used for listen-and-type lessons, where the learner
    /// can't see the text.
    Gross,
    /// Speed minus a penalty for every character that is still wrong. Used for
    /// read-and-type lessons.
    #[default]
    Net,
}

impl ScoringMode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Gross => "gross",
            Self::Net => "net",
        }
    }
}

impl FromStr for ScoringMode {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gross" => Ok(Self::Gross),
            "net" => Ok(Self::Net),
            _ => Err(SessionError::UnknownScoringMode(s.to_string())),
        }
    }
}

impl std::fmt::Display for ScoringMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-session configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Formula used for words per minute
    pub scoring_mode: ScoringMode,
    /// Whether the learner may delete characters.
    ///
    /// When disabled, callers must swallow Backspace/Delete before the buffer changes.
    /// Shrinking edits that still reach the session are ignored.
    pub backspace_enabled: bool,
}

impl SessionConfig {
    pub const fn new(scoring_mode: ScoringMode) -> Self {
        Self {
            scoring_mode,
            backspace_enabled: true,
        }
    }

    pub const fn with_backspace(mut self, enabled: bool) -> Self {
        self.backspace_enabled = enabled;
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new(ScoringMode::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scoring_mode() {
        assert_eq!("gross".parse::<ScoringMode>().unwrap(), ScoringMode::Gross);
        assert_eq!(" Net ".parse::<ScoringMode>().unwrap(), ScoringMode::Net);

        let error = "fast".parse::<ScoringMode>().unwrap_err();
        assert!(matches!(error, SessionError::UnknownScoringMode(mode) if mode == "fast"));
    }

    #[test]
    fn test_default_allows_backspace() {
        let config = SessionConfig::default();
        assert!(config.backspace_enabled);
        assert_eq!(config.scoring_mode, ScoringMode::Net);
    }
}
