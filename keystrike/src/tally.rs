//! # Tally Module - Keystroke Classification and Counting
//!
//! Every input-change event hands the engine the complete new buffer. The edit is
//! classified by comparing buffer lengths before and after, and the result is applied
//! to a [KeystrokeTally].
//!
//! - **Insertion**: only the last character of the new buffer is checked. Multi-character
//!   pastes are therefore counted as a single keystroke.
//! - **Deletion**: the removed character is the one at `new.len()` in the old buffer. The
//!   counter it was attributed to is decremented, never below zero.
//! - **Same length**: nothing is counted.

use crate::LessonText;

/// The classification of a single buffer edit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edit {
    /// A character was added. `correct` is true if it matched the lesson text.
    Insert { correct: bool },
    /// A character was removed. `was_correct` is true if it matched the lesson text.
    Delete { was_correct: bool },
    /// The buffer length did not change
    Unchanged,
}

impl Edit {
    /// Classify the edit going from `old` to `new`.
    pub fn classify(old: &[char], new: &[char], text: &LessonText) -> Self {
        match new.len().cmp(&old.len()) {
            std::cmp::Ordering::Greater => {
                let index = new.len() - 1;
                Self::Insert {
                    correct: text.matches(index, new[index]),
                }
            }
            std::cmp::Ordering::Less => {
                let index = new.len();
                Self::Delete {
                    was_correct: text.matches(index, old[index]),
                }
            }
            std::cmp::Ordering::Equal => Self::Unchanged,
        }
    }

    /// Returns true if this edit shrinks the buffer
    pub const fn is_deletion(&self) -> bool {
        matches!(self, Self::Delete { .. })
    }
}

/// Running counters of correct and incorrect keystrokes.
///
/// `correct + incorrect` always equals the net number of committed characters: an
/// insertion adds one, a deletion takes one back from the counter the character was
/// attributed to.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct KeystrokeTally {
    pub correct: usize,
    pub incorrect: usize,
}

impl KeystrokeTally {
    /// Apply an edit to the counters
    pub fn apply(&mut self, edit: Edit) {
        match edit {
            Edit::Insert { correct: true } => self.correct += 1,
            Edit::Insert { correct: false } => self.incorrect += 1,
            Edit::Delete { was_correct: true } => self.correct = self.correct.saturating_sub(1),
            Edit::Delete { was_correct: false } => {
                self.incorrect = self.incorrect.saturating_sub(1)
            }
            Edit::Unchanged => (),
        }
    }

    /// Total amount of keystrokes currently counted
    pub const fn total(&self) -> usize {
        self.correct + self.incorrect
    }
}
