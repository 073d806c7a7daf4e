//! Runtime configuration resolved from the environment.
//!
//! | Variable | Meaning | Default |
//! |----------|---------|---------|
//! | `MEDLEDGER_DB_PATH` | SQLite ledger file | `<tmp>/medledger.sqlite3` |
//! | `MEDLEDGER_LOG_LEVEL` | `trace|debug|info|warn|error` | build-mode default |
//! | `MEDLEDGER_LOG_DIR` | absolute log directory | unset: file logging off |
//!
//! Blank values are treated as unset.

use medledger_core::{default_log_level, normalize_log_level};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "MEDLEDGER_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "MEDLEDGER_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "MEDLEDGER_LOG_DIR";
const DEFAULT_DB_FILE_NAME: &str = "medledger.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Carries the logging layer's rejection message.
    UnsupportedLogLevel(String),
    RelativeLogDir(PathBuf),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedLogLevel(message) => write!(f, "{message}"),
            Self::RelativeLogDir(path) => write!(
                f,
                "log directory must be an absolute path, got `{}`",
                path.display()
            ),
        }
    }
}

impl Error for ConfigError {}

impl SkillConfig {
    /// Reads configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let db_path = read(DB_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(default_db_path);
        let log_level = read(LOG_LEVEL_ENV).unwrap_or_else(|| default_log_level().to_string());
        let log_dir = read(LOG_DIR_ENV).map(PathBuf::from);

        Self {
            db_path,
            log_level,
            log_dir,
        }
        .validated()
    }

    /// Applies explicit overrides, typically from command-line flags.
    pub fn with_overrides(
        mut self,
        db_path: Option<PathBuf>,
        log_level: Option<String>,
        log_dir: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        if let Some(db_path) = db_path {
            self.db_path = db_path;
        }
        if let Some(log_level) = log_level {
            self.log_level = log_level;
        }
        if let Some(log_dir) = log_dir {
            self.log_dir = Some(log_dir);
        }
        self.validated()
    }

    fn validated(self) -> Result<Self, ConfigError> {
        normalize_log_level(&self.log_level).map_err(ConfigError::UnsupportedLogLevel)?;
        if let Some(log_dir) = &self.log_dir {
            if !log_dir.is_absolute() {
                return Err(ConfigError::RelativeLogDir(log_dir.clone()));
            }
        }
        Ok(self)
    }
}

fn default_db_path() -> PathBuf {
    std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)
}
