use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block, BorderType, Padding},
};
use web_time::Duration;

/// A block with a rounded border
pub const ROUNDED_BLOCK: Block = Block::bordered().border_type(BorderType::Rounded);

pub fn center(area: Rect, horizontal: Constraint, vertical: Constraint) -> Rect {
    let [area_horizontal] = Layout::horizontal([horizontal])
        .flex(Flex::Center)
        .areas(area);
    let [area] = Layout::vertical([vertical])
        .flex(Flex::Center)
        .areas(area_horizontal);
    area
}

/// Padding that vertically centers `height` lines inside `area`
pub const fn centered_padding(area: Rect, height: u16) -> Padding {
    Padding::top(area.height.saturating_sub(height) / 2)
}

/// A trait defining helper methods for keyevents
pub trait KeyEventHelper {
    /// Returns true if the keyevent contains the given modifiers
    fn has_mods(&self, mods: KeyModifiers) -> bool;

    /// Returns true if the keyevent contains a character that matches the input
    fn is_char(&self, character: char) -> bool;

    /// Returns true if the keyevent matches the given character, and is being pressed with CTRL as
    /// a modifier.
    fn is_ctrl_press_char(&self, character: char) -> bool;
}

impl KeyEventHelper for KeyEvent {
    fn has_mods(&self, mods: KeyModifiers) -> bool {
        self.modifiers.contains(mods)
    }

    fn is_char(&self, character: char) -> bool {
        self.code == KeyCode::Char(character)
    }

    fn is_ctrl_press_char(&self, character: char) -> bool {
        self.is_press() && self.has_mods(KeyModifiers::CONTROL) && self.is_char(character)
    }
}

/// Format as `m:ss`
pub fn format_duration(duration: Duration) -> String {
    format_seconds(duration.as_secs())
}

pub fn format_seconds(seconds: u64) -> String {
    format!("{}:{:0>2}", seconds / 60, seconds % 60)
}
