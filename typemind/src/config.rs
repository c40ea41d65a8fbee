use std::path::{Path, PathBuf};

use derive_more::From;
use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use lesson::{LessonConfig, LessonKind};

use crate::speech::SpeechConfig;

pub mod lesson;
pub mod theme;

/// Prefix for environment overrides, e.g. `TYPEMIND_USER=ada`
const ENV_PREFIX: &str = "TYPEMIND_";

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Name progress is recorded under. Falls back to `$USER`.
    pub user: Option<String>,
    pub lessons_dir: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    /// Show lessons of every level, not just the learner's placement
    pub show_all_levels: bool,
    pub speech: SpeechConfig,
    pub theme: theme::Theme,
}

#[derive(Debug, From, Error)]
pub enum ConfigError {
    #[error(
        "Failed to get configuration directory. Please specify the location using the `--config <path>` flag"
    )]
    NoDirectory,

    #[error("Failed to create config directory: {0}")]
    CreateDirectory(std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(Box<figment::Error>),

    #[error("Failed to load lessons: {0}")]
    Lessons(lesson::LessonError),
}

#[derive(Debug, Default)]
pub struct Config {
    pub settings: Settings,
    pub lessons: Vec<LessonConfig>,
    /// Where progress and logs are kept
    pub data_dir: PathBuf,
}

impl Config {
    pub fn get(override_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let dirs = ProjectDirs::from("com", "TypeMind", "TypeMind");

        // Check for toml file location
        let config_dir = override_path
            .clone()
            .or_else(|| dirs.as_ref().map(|dirs| dirs.config_dir().to_path_buf()))
            .ok_or(ConfigError::NoDirectory)?;

        // Keep data next to the config when the location is overridden
        let default_data_dir = override_path
            .map(|path| path.join("data"))
            .or_else(|| dirs.as_ref().map(|dirs| dirs.data_dir().to_path_buf()))
            .ok_or(ConfigError::NoDirectory)?;

        Self::load(&config_dir, default_data_dir)
    }

    /// Load settings and lessons from `config_dir`
    pub fn load(config_dir: &Path, default_data_dir: PathBuf) -> Result<Self, ConfigError> {
        // Ensure path exists
        if !config_dir.exists() {
            std::fs::create_dir_all(config_dir)?;
        }

        // Grab default configuration
        let mut figment = Figment::from(Serialized::defaults(Settings::default()));

        let settings_toml = config_dir.join("settings.toml");
        if settings_toml.exists() {
            figment = figment.merge(Toml::file(settings_toml));
        }

        let mut settings: Settings = figment
            .merge(Env::prefixed(ENV_PREFIX).ignore(&["log"]))
            .extract()
            .map_err(Box::new)?;

        let lessons_dir = settings
            .lessons_dir
            .clone()
            .unwrap_or_else(|| config_dir.join("lessons"));
        let lessons = lesson::get_lessons(&lessons_dir)?;
        settings.lessons_dir = Some(lessons_dir);

        let data_dir = settings.data_dir.clone().unwrap_or(default_data_dir);
        settings.data_dir = Some(data_dir.clone());

        Ok(Self {
            settings,
            lessons,
            data_dir,
        })
    }
}
