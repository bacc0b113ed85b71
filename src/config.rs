//! Scheduler configuration.
//!
//! Configuration is read from a JSON file inside a configuration directory
//! and then overridden from the environment. Every field has a default, so
//! a missing file yields a usable configuration.

use crate::job::domain::{CategoryKeywords, JobDomainError};
use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use thiserror::Error;

/// File name looked up in the configuration directory.
pub const DEFAULT_CONFIG_FILE: &str = "hatchery.json";

/// Environment variable overriding the database URL.
pub const DATABASE_URL_ENV: &str = "HATCHERY_DATABASE_URL";

/// Environment variable overriding the log filter directive.
pub const LOG_FILTER_ENV: &str = "HATCHERY_LOG";

/// Environment variable overriding the log output format.
pub const LOG_FORMAT_ENV: &str = "HATCHERY_LOG_FORMAT";

/// Errors returned while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration directory or file could not be read.
    #[error("failed to read configuration from {path}: {source}")]
    Read {
        /// Path that failed.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The configuration file is not valid JSON for this schema.
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
    /// The log format name is unknown.
    #[error("unknown log format: {0}")]
    UnknownLogFormat(String),
    /// The connection pool must hold at least one connection.
    #[error("pool size must be greater than zero")]
    EmptyPool,
    /// The category keyword table is invalid.
    #[error(transparent)]
    Categories(#[from] JobDomainError),
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable multi-line output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl TryFrom<&str> for LogFormat {
    type Error = ConfigError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::UnknownLogFormat(value.to_owned())),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `tracing` filter directive, e.g. `hatchery=debug`.
    pub filter: String,
    /// Output format.
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_owned(),
            format: LogFormat::Pretty,
        }
    }
}

/// Top-level scheduler configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchedulerConfig {
    /// `PostgreSQL` connection URL.
    pub database_url: String,
    /// Maximum connections held by the pool.
    pub pool_size: u32,
    /// Keyword table used to infer job categories from names.
    pub categories: CategoryKeywords,
    /// Logging settings.
    pub logging: LoggingConfig,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            database_url: "postgres://localhost/hatchery".to_owned(),
            pool_size: 4,
            categories: CategoryKeywords::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl SchedulerConfig {
    /// Loads `file_name` from `dir` and applies process environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the directory cannot be opened, the file
    /// cannot be read or parsed, or validation fails.
    pub fn load(dir: &Utf8Path, file_name: &str) -> Result<Self, ConfigError> {
        Self::load_with(dir, file_name, |key| std::env::var(key).ok())
    }

    /// Loads `file_name` from `dir`, resolving overrides through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the directory cannot be opened, the file
    /// cannot be read or parsed, or validation fails.
    pub fn load_with(
        dir: &Utf8Path,
        file_name: &str,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let read_error = |source| ConfigError::Read {
            path: dir.join(file_name).into_string(),
            source,
        };
        let config_dir = Dir::open_ambient_dir(dir, ambient_authority()).map_err(read_error)?;
        let config = match config_dir.read_to_string(file_name) {
            Ok(contents) => Self::from_json(&contents)?,
            Err(err) if err.kind() == ErrorKind::NotFound => Self::default(),
            Err(err) => return Err(read_error(err)),
        };
        config.apply_overrides(lookup)?.validated()
    }

    /// Parses configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the text does not match the
    /// schema.
    pub fn from_json(contents: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Replaces settings with the environment values returned by `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownLogFormat`] when the format override
    /// is not recognised.
    pub fn apply_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(url) = lookup(DATABASE_URL_ENV) {
            self.database_url = url;
        }
        if let Some(filter) = lookup(LOG_FILTER_ENV) {
            self.logging.filter = filter;
        }
        if let Some(format) = lookup(LOG_FORMAT_ENV) {
            self.logging.format = LogFormat::try_from(format.as_str())?;
        }
        Ok(self)
    }

    /// Validates the configuration and normalises category keywords.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyPool`] for a zero pool size, or
    /// [`ConfigError::Categories`] when a category has no keyword.
    pub fn validated(self) -> Result<Self, ConfigError> {
        if self.pool_size == 0 {
            return Err(ConfigError::EmptyPool);
        }
        Ok(Self {
            categories: self.categories.normalized()?,
            ..self
        })
    }
}
