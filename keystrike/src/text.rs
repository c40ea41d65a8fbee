//! # Text Module - Lesson Text and Buffer Comparison
//!
//! Holds the reference text a learner has to type and the position-wise comparisons
//! the engine makes between it and the learner's input buffer.
//!
//! All comparisons are made per `char`, so multi-byte characters count as one position.

/// The immutable reference text of a lesson.
///
/// A `LessonText` is never empty: [LessonText::new] refuses empty input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonText {
    characters: Vec<char>,
}

impl LessonText {
    /// Create a lesson text, returning `None` if `string` is empty.
    ///
    /// ```rust
    /// use keystrike::LessonText;
    ///
    /// assert_eq!(LessonText::new("café").unwrap().len(), 4);
    /// assert!(LessonText::new("").is_none());
    /// ```
    pub fn new(string: &str) -> Option<Self> {
        if string.is_empty() {
            return None;
        }

        Some(Self {
            characters: string.chars().collect(),
        })
    }

    /// Amount of characters in the text
    pub fn len(&self) -> usize {
        self.characters.len()
    }

    /// Always false, kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    /// Get the character expected at `index`, if the text is that long.
    pub fn get(&self, index: usize) -> Option<char> {
        self.characters.get(index).copied()
    }

    /// Returns true if `character` is what the text expects at `index`.
    ///
    /// Positions past the end of the text never match.
    pub fn matches(&self, index: usize, character: char) -> bool {
        self.get(index) == Some(character)
    }

    /// Count the positions in `input` that don't match the text.
    ///
    /// This is a full rescan of the current input, so it only reflects errors that are
    /// still present. Characters typed past the end of the text count as errors.
    pub fn unfixed_errors(&self, input: &[char]) -> usize {
        input
            .iter()
            .enumerate()
            .filter(|(index, character)| !self.matches(*index, **character))
            .count()
    }

    /// Count the positions in `input` that match the text.
    ///
    /// Only the overlapping range `[0, min(input, text))` is considered.
    pub fn correct_characters(&self, input: &[char]) -> usize {
        input
            .iter()
            .zip(self.characters.iter())
            .filter(|(typed, expected)| typed == expected)
            .count()
    }

    /// Iterate over the characters of the text
    pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
        self.characters.iter().copied()
    }
}

impl std::fmt::Display for LessonText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.characters.iter().try_for_each(|c| write!(f, "{c}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(string: &str) -> Vec<char> {
        string.chars().collect()
    }

    #[test]
    fn test_empty_text_is_rejected() {
        assert!(LessonText::new("").is_none());
        assert!(LessonText::new(" ").is_some());
    }

    #[test]
    fn test_unicode_length() {
        let text = LessonText::new("café 🚀").unwrap();
        assert_eq!(text.len(), 6);
        assert_eq!(text.get(5), Some('🚀'));
        assert_eq!(text.to_string(), "café 🚀");
    }

    #[test]
    fn test_unfixed_errors() {
        let text = LessonText::new("cat").unwrap();

        assert_eq!(text.unfixed_errors(&chars("")), 0);
        assert_eq!(text.unfixed_errors(&chars("cat")), 0);
        assert_eq!(text.unfixed_errors(&chars("cxt")), 1);
        assert_eq!(text.unfixed_errors(&chars("xyz")), 3);

        // Overflowing characters have nothing to match against
        assert_eq!(text.unfixed_errors(&chars("cats")), 1);
    }

    #[test]
    fn test_correct_characters() {
        let text = LessonText::new("hello").unwrap();

        assert_eq!(text.correct_characters(&chars("")), 0);
        assert_eq!(text.correct_characters(&chars("hxllo")), 4);
        assert_eq!(text.correct_characters(&chars("hello world")), 5);
    }
}
