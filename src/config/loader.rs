//! Configuration loading from disk and from the environment.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::LogConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading and manager construction.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("invalid log level '{0}' (expected DEBUG, INFO, WARNING, ERROR or CRITICAL)")]
    InvalidLevel(String),

    #[error("invalid value '{value}' for {key}")]
    InvalidValue { key: &'static str, value: String },

    #[error("validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),

    #[error("failed to create log directory {}: {source}", path.display())]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("log directory path {} exists and is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("failed to open log file {}: {source}", path.display())]
    OpenLogFile { path: PathBuf, source: io::Error },

    #[error("failed to read config file {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<LogConfig, ConfigurationError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigurationError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: LogConfig = toml::from_str(&content)?;

    validate_config(&config).map_err(ConfigurationError::Validation)?;

    Ok(config)
}

/// Environment variables consulted by [`LogConfig::from_env`].
pub mod env_keys {
    pub const APP_NAME: &str = "APP_NAME";
    pub const LOG_LEVEL: &str = "LOG_LEVEL";
    pub const LOG_DIR: &str = "LOG_DIR";
    pub const LOG_MAX_BYTES: &str = "LOG_MAX_BYTES";
    pub const LOG_BACKUP_COUNT: &str = "LOG_BACKUP_COUNT";
    pub const LOG_JSON: &str = "LOG_JSON";
}

impl LogConfig {
    /// Build a configuration from process environment variables over defaults.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup over defaults.
    ///
    /// Unset keys keep their default; set but unparsable keys are an error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigurationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = LogConfig::default();

        if let Some(name) = lookup(env_keys::APP_NAME) {
            config.app_name = name;
        }
        if let Some(level) = lookup(env_keys::LOG_LEVEL) {
            config.log_level = level.parse()?;
        }
        if let Some(dir) = lookup(env_keys::LOG_DIR) {
            config.log_dir = PathBuf::from(dir);
        }
        if let Some(raw) = lookup(env_keys::LOG_MAX_BYTES) {
            config.max_bytes = parse_number(env_keys::LOG_MAX_BYTES, &raw)?;
        }
        if let Some(raw) = lookup(env_keys::LOG_BACKUP_COUNT) {
            config.backup_count = parse_number(env_keys::LOG_BACKUP_COUNT, &raw)?;
        }
        if let Some(raw) = lookup(env_keys::LOG_JSON) {
            config.json_output = parse_bool(env_keys::LOG_JSON, &raw)?;
        }

        validate_config(&config).map_err(ConfigurationError::Validation)?;
        Ok(config)
    }
}

fn parse_number<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigurationError> {
    raw.trim().parse().map_err(|_| ConfigurationError::InvalidValue {
        key,
        value: raw.to_string(),
    })
}

fn parse_bool(key: &'static str, raw: &str) -> Result<bool, ConfigurationError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigurationError::InvalidValue {
            key,
            value: raw.to_string(),
        }),
    }
}
