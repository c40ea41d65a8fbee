//! Log output goes to a file in the data directory, since the terminal belongs to the UI.
//!
//! The filter is read from `TYPEMIND_LOG` using the usual `env_logger` syntax, e.g.
//! `TYPEMIND_LOG=keystrike=debug,info`.

use std::{
    fs::{self, OpenOptions},
    path::{Path, PathBuf},
};

use env_logger::{Env, Target};
use thiserror::Error;

pub const LOG_FILE: &str = "typemind.log";
const FILTER_ENV: &str = "TYPEMIND_LOG";
const DEFAULT_FILTER: &str = "info";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Failed to open log file '{path}': {error}")]
    Open { path: PathBuf, error: std::io::Error },

    #[error("Failed to initialize logger: {0}")]
    Init(#[from] log::SetLoggerError),
}

/// Start logging to `typemind.log` inside `data_dir`. Returns the log file path.
pub fn init(data_dir: &Path) -> Result<PathBuf, LoggingError> {
    let path = data_dir.join(LOG_FILE);
    let file = fs::create_dir_all(data_dir)
        .and_then(|_| OpenOptions::new().create(true).append(true).open(&path))
        .map_err(|error| LoggingError::Open {
            path: path.clone(),
            error,
        })?;

    env_logger::Builder::from_env(Env::new().filter_or(FILTER_ENV, DEFAULT_FILTER))
        .target(Target::Pipe(Box::new(file)))
        .format_timestamp_secs()
        .try_init()?;

    log::info!("Logging to {}", path.display());
    Ok(path)
}
