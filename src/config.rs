//! Runtime configuration for sprintboard.
//!
//! Settings come from an optional TOML file and are then overridden by
//! environment variables. The file is the one named on the command line, or
//! `sprintboard.toml` in the working directory when none is named:
//!
//! ```toml
//! [database]
//! url = "postgres://localhost/sprintboard"
//! max_connections = 8
//!
//! [logging]
//! filter = "sprintboard=debug,info"
//! json = false
//! ```
//!
//! | Variable                         | Overrides                   |
//! |----------------------------------|-----------------------------|
//! | `SPRINTBOARD_DATABASE_URL`       | `database.url`              |
//! | `SPRINTBOARD_DB_MAX_CONNECTIONS` | `database.max_connections`  |
//! | `SPRINTBOARD_LOG`                | `logging.filter`            |
//! | `SPRINTBOARD_LOG_JSON`           | `logging.json`              |

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File read when no configuration path is given.
pub const DEFAULT_CONFIG_FILE: &str = "sprintboard.toml";

/// Environment variable overriding the database URL.
pub const DATABASE_URL_ENV: &str = "SPRINTBOARD_DATABASE_URL";
/// Environment variable overriding the connection pool size.
pub const DB_MAX_CONNECTIONS_ENV: &str = "SPRINTBOARD_DB_MAX_CONNECTIONS";
/// Environment variable overriding the log filter directive.
pub const LOG_FILTER_ENV: &str = "SPRINTBOARD_LOG";
/// Environment variable switching JSON log output on or off.
pub const LOG_JSON_ENV: &str = "SPRINTBOARD_LOG_JSON";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        /// File that was requested.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`TrackerConfig`].
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// An environment override holds a value of the wrong shape.
    #[error("invalid value '{value}' for {variable}")]
    InvalidEnv {
        /// Variable name.
        variable: &'static str,
        /// Rejected value.
        value: String,
    },
}

/// Database connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL. Required by commands that touch storage.
    #[serde(default)]
    pub url: Option<String>,
    /// Upper bound on pooled connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

const fn default_max_connections() -> u32 {
    4
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: default_max_connections(),
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing` filter directive, e.g. `sprintboard=debug,info`.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Emit newline-delimited JSON instead of human-readable lines.
    #[serde(default)]
    pub json: bool,
}

fn default_log_filter() -> String {
    "info".to_owned()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Database settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl TrackerConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when the file cannot be read or
    /// [`ConfigError::Parse`] when it is not valid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the content is not valid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Loads an explicitly requested file, or [`DEFAULT_CONFIG_FILE`] when
    /// it exists, otherwise returns defaults.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Self::load`]. An explicit `path` that does
    /// not exist is a [`ConfigError::Read`].
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_fallback(path, Path::new(DEFAULT_CONFIG_FILE))
    }

    fn load_with_fallback(explicit: Option<&Path>, fallback: &Path) -> Result<Self, ConfigError> {
        match explicit {
            Some(file) => Self::load(file),
            None if fallback.is_file() => Self::load(fallback),
            None => Ok(Self::default()),
        }
    }

    /// Applies overrides from the process environment.
    ///
    /// # Errors
    ///
    /// See [`Self::with_env_overrides`].
    pub fn with_process_env(self) -> Result<Self, ConfigError> {
        self.with_env_overrides(|name| std::env::var(name).ok())
    }

    /// Applies overrides resolved through `lookup`.
    ///
    /// Empty values are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnv`] when the pool size is not a
    /// positive integer or the JSON switch is not a boolean.
    pub fn with_env_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if let Some(url) = read(DATABASE_URL_ENV) {
            self.database.url = Some(url);
        }
        if let Some(raw) = read(DB_MAX_CONNECTIONS_ENV) {
            self.database.max_connections = raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|size| *size > 0)
                .ok_or_else(|| ConfigError::InvalidEnv {
                    variable: DB_MAX_CONNECTIONS_ENV,
                    value: raw.clone(),
                })?;
        }
        if let Some(filter) = read(LOG_FILTER_ENV) {
            self.logging.filter = filter;
        }
        if let Some(raw) = read(LOG_JSON_ENV) {
            self.logging.json = parse_bool(&raw).ok_or_else(|| ConfigError::InvalidEnv {
                variable: LOG_JSON_ENV,
                value: raw.clone(),
            })?;
        }
        Ok(self)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
