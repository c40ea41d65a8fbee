use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// General theme
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Theme {
    pub text: TextTheme,
    /// Rank card accents
    pub rank: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            text: TextTheme::default(),
            rank: Color::Yellow,
        }
    }
}

/// Text color theme
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct TextTheme {
    /// Correctly typed characters
    pub success: Color,
    /// Mismatched characters
    pub error: Color,
    /// Selected entries and headings
    pub highlight: Color,
    /// Characters not typed yet
    pub pending: Color,
}

impl Default for TextTheme {
    fn default() -> Self {
        Self {
            success: Color::Green,
            error: Color::Red,
            highlight: Color::Blue,
            pending: Color::DarkGray,
        }
    }
}
