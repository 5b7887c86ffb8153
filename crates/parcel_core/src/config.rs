//! Environment-driven settings for the parcel tracker.
//!
//! | Variable | Default |
//! |---|---|
//! | `PARCEL_DB_PATH` | `tracker.db` |
//! | `PARCEL_LOG_LEVEL` | [`default_log_level`] |
//! | `PARCEL_LOG_DIR` | unset (file logging disabled) |

use crate::db::{open_db, DbResult};
use crate::logging::{default_log_level, init_logging, normalize_level, LoggingError};
use rusqlite::Connection;
use std::env;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DB_PATH_VAR: &str = "PARCEL_DB_PATH";
pub const LOG_LEVEL_VAR: &str = "PARCEL_LOG_LEVEL";
pub const LOG_DIR_VAR: &str = "PARCEL_LOG_DIR";

const DEFAULT_DB_PATH: &str = "tracker.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    pub db_path: PathBuf,
    pub log_level: &'static str,
    pub log_dir: Option<PathBuf>,
}

#[derive(Debug)]
pub enum ConfigError {
    EmptyDbPath,
    InvalidLogLevel(LoggingError),
    RelativeLogDir(PathBuf),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyDbPath => write!(f, "{DB_PATH_VAR} must not be empty"),
            Self::InvalidLogLevel(err) => write!(f, "{LOG_LEVEL_VAR}: {err}"),
            Self::RelativeLogDir(path) => write!(
                f,
                "{LOG_DIR_VAR} must be an absolute path, got `{}`",
                path.display()
            ),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidLogLevel(err) => Some(err),
            _ => None,
        }
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            log_level: default_log_level(),
            log_dir: None,
        }
    }
}

impl TrackerConfig {
    /// Reads settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads settings through `lookup`.
    ///
    /// Unset variables fall back to defaults, as do blank log settings.
    /// A set but blank `PARCEL_DB_PATH` is rejected with `EmptyDbPath`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        let db_path = match lookup(DB_PATH_VAR) {
            Some(value) if value.trim().is_empty() => return Err(ConfigError::EmptyDbPath),
            Some(value) => PathBuf::from(value.trim()),
            None => defaults.db_path,
        };

        let log_level = match read(LOG_LEVEL_VAR) {
            Some(value) => normalize_level(&value).map_err(ConfigError::InvalidLogLevel)?,
            None => defaults.log_level,
        };

        let log_dir = match read(LOG_DIR_VAR).map(PathBuf::from) {
            Some(path) if !path.is_absolute() => return Err(ConfigError::RelativeLogDir(path)),
            other => other,
        };

        Ok(Self {
            db_path,
            log_level,
            log_dir,
        })
    }

    /// Starts file logging when a log directory is configured.
    pub fn init_logging(&self) -> Result<(), LoggingError> {
        let Some(dir) = &self.log_dir else {
            return Ok(());
        };
        let dir = dir.to_str().ok_or_else(|| {
            LoggingError::InvalidDirectory(format!("`{}` is not valid UTF-8", dir.display()))
        })?;
        init_logging(self.log_level, dir)
    }

    /// Opens and migrates the configured database.
    pub fn open_db(&self) -> DbResult<Connection> {
        open_db(&self.db_path)
    }
}
