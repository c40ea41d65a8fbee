use std::{collections::HashSet, path::PathBuf};

use keystrike::{PlacementLevel, ScoringMode};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LessonError {
    #[error("Failed to read lessons directory '{directory}': {error}")]
    ReadDirectory {
        directory: PathBuf,
        error: std::io::Error,
    },

    #[error("Failed to read lesson '{file}': {error}")]
    ReadFile {
        file: PathBuf,
        error: std::io::Error,
    },

    #[error("Failed to parse lesson '{file}': {error}")]
    ParseFile {
        file: PathBuf,
        error: toml::de::Error,
    },

    #[error("Lesson '{0}' has no content to type")]
    EmptyContent(String),

    #[error("Lesson id '{0}' is used more than once")]
    DuplicateId(String),
}

/// Load every `*.toml` lesson in `from_dir`, sorted by level and title
pub fn get_lessons(from_dir: &PathBuf) -> Result<Vec<LessonConfig>, LessonError> {
    let directory_error = |error| LessonError::ReadDirectory {
        directory: from_dir.clone(),
        error,
    };

    if !from_dir.exists() {
        std::fs::create_dir_all(from_dir).map_err(directory_error)?;
    }

    let files = from_dir.read_dir().map_err(directory_error)?;

    let mut lessons = Vec::new();
    let mut ids = HashSet::new();

    for entry in files.into_iter() {
        let path = entry.map_err(directory_error)?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "toml") {
            let content = match std::fs::read_to_string(&path) {
                Ok(content) => content,
                Err(error) => return Err(LessonError::ReadFile { file: path, error }),
            };
            let lesson = LessonConfig::parse(&content)
                .map_err(|error| LessonError::ParseFile { file: path, error })?;
            lesson.validate()?;

            if !ids.insert(lesson.meta.id.clone()) {
                return Err(LessonError::DuplicateId(lesson.meta.id));
            }
            lessons.push(lesson);
        }
    }

    lessons.sort_by(|a, b| {
        a.meta
            .level
            .cmp(&b.meta.level)
            .then_with(|| a.meta.title.cmp(&b.meta.title))
    });

    log::info!("Loaded {} lessons from {}", lessons.len(), from_dir.display());
    Ok(lessons)
}

/// How a lesson is presented
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum LessonKind {
    /// The text is shown while typing
    #[default]
    #[strum(to_string = "Text")]
    Text,
    /// A single dictated sentence, text hidden
    #[strum(to_string = "Audio sentence")]
    AudioSentence,
    /// A dictated paragraph, text hidden
    #[strum(to_string = "Audio paragraph")]
    AudioParagraph,
}

impl LessonKind {
    pub const fn is_audio(&self) -> bool {
        matches!(self, Self::AudioSentence | Self::AudioParagraph)
    }

    /// Dictation is scored on raw speed, visible text with the error penalty
    pub const fn scoring_mode(&self) -> ScoringMode {
        if self.is_audio() {
            ScoringMode::Gross
        } else {
            ScoringMode::Net
        }
    }
}

/// The audience of a lesson
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
    #[default]
    All,
}

impl Level {
    /// Returns true if a learner placed at `placement` should see this lesson.
    ///
    /// Learners without a placement only see lessons for all levels.
    pub fn is_available_to(&self, placement: Option<PlacementLevel>) -> bool {
        match (self, placement) {
            (Self::All, _) => true,
            (Self::Beginner, Some(PlacementLevel::Beginner))
            | (Self::Intermediate, Some(PlacementLevel::Intermediate))
            | (Self::Advanced, Some(PlacementLevel::Advanced)) => true,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonConfig {
    pub meta: LessonMeta,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonMeta {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub level: Level,
    #[serde(default)]
    pub kind: LessonKind,
    #[serde(default = "default_backspace_enabled")]
    pub backspace_enabled: bool,
    /// Multiplier for the speech rate of audio lessons
    #[serde(default)]
    pub playback_speed: Option<f32>,
}

impl LessonConfig {
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Lessons must have something to type
    pub fn validate(&self) -> Result<(), LessonError> {
        if self.content.trim().is_empty() {
            return Err(LessonError::EmptyContent(self.meta.id.clone()));
        }
        Ok(())
    }

    /// The text to type, without the trailing newline TOML multi-line strings tend to carry
    pub fn text(&self) -> &str {
        self.content.trim_end_matches(['\n', '\r'])
    }
}

pub const fn default_backspace_enabled() -> bool {
    true
}
