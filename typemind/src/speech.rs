//! Text-to-speech for dictation lessons.
//!
//! Speech is delegated to an external program configured in `settings.toml`:
//!
//! ```toml
//! [speech]
//! command = ["espeak", "-s", "{speed}", "{text}"]
//! speed = 175
//! ```
//!
//! `{text}` is replaced by the lesson text and `{speed}` by `speed` scaled with the
//! lesson's playback speed.

use std::process::{Child, Command, Stdio};

use serde::{Deserialize, Serialize};
use thiserror::Error;

const TEXT_PLACEHOLDER: &str = "{text}";
const SPEED_PLACEHOLDER: &str = "{speed}";

#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Program and arguments. Empty disables speech.
    pub command: Vec<String>,
    /// Base speaking rate, passed through `{speed}`
    pub speed: u32,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            command: Vec::new(),
            speed: 175,
        }
    }
}

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("No speech command configured. Set `speech.command` in settings.toml")]
    NotConfigured,

    #[error("Speech program '{program}' not found: {error}")]
    MissingProgram { program: String, error: which::Error },

    #[error("Failed to start speech program: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Something that can read a text out loud
pub trait SpeechProvider {
    /// Start speaking `text`. `playback_speed` scales the speaking rate, 1.0 being normal.
    fn speak(&self, text: &str, playback_speed: f32) -> Result<Playback, SpeechError>;
}

/// A running speech process.
///
/// The process is killed when the playback is dropped, so it never outlives the session
/// that started it.
#[derive(Debug)]
pub struct Playback {
    child: Child,
}

impl Playback {
    pub fn is_playing(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }
}

impl Drop for Playback {
    fn drop(&mut self) {
        if self.is_playing() {
            let _ = self.child.kill();
        }
        let _ = self.child.wait();
    }
}

/// Speech through an external command
#[derive(Debug, Clone)]
pub struct CommandSpeech {
    command: Vec<String>,
    speed: u32,
}

impl CommandSpeech {
    pub fn new(config: &SpeechConfig) -> Self {
        Self {
            command: config.command.clone(),
            speed: config.speed,
        }
    }

    /// Build the program and arguments for `text`
    fn build(&self, text: &str, playback_speed: f32) -> Result<(String, Vec<String>), SpeechError> {
        let (program, args) = self.command.split_first().ok_or(SpeechError::NotConfigured)?;

        let speed = (self.speed as f32 * playback_speed).round().max(1.0) as u32;
        let args = args
            .iter()
            .map(|arg| {
                arg.replace(SPEED_PLACEHOLDER, &speed.to_string())
                    .replace(TEXT_PLACEHOLDER, text)
            })
            .collect();

        Ok((program.clone(), args))
    }
}

impl SpeechProvider for CommandSpeech {
    fn speak(&self, text: &str, playback_speed: f32) -> Result<Playback, SpeechError> {
        let (program, args) = self.build(text, playback_speed)?;

        let path = which::which(&program).map_err(|error| SpeechError::MissingProgram {
            program: program.clone(),
            error,
        })?;

        log::debug!("Speaking with {}", path.display());
        let child = Command::new(path)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        Ok(Playback { child })
    }
}
