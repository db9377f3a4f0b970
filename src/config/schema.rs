//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::logging::Level;

/// Application name used when none is configured.
pub const DEFAULT_APP_NAME: &str = "applog";

/// Directory used when none is configured.
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Rotation threshold used when none is configured (10 MiB).
pub const DEFAULT_MAX_BYTES: u64 = 10 * 1024 * 1024;

/// Number of rotated files kept when none is configured.
pub const DEFAULT_BACKUP_COUNT: usize = 5;

/// Root configuration for a [`LogManager`](crate::LogManager).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LogConfig {
    /// Logger name; also the stem of the log file (`<app_name>.log`).
    pub app_name: String,

    /// Minimum level a record needs to be emitted.
    pub log_level: Level,

    /// Directory holding the active log file and its backups.
    pub log_dir: PathBuf,

    /// Size in bytes at which the active file is rotated (0 disables rotation).
    pub max_bytes: u64,

    /// Number of rotated files to keep.
    pub backup_count: usize,

    /// Render file records as JSON objects instead of plain text.
    pub json_output: bool,

    /// Also write records to standard output.
    pub terminal_output: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            app_name: DEFAULT_APP_NAME.to_string(),
            log_level: Level::Info,
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            max_bytes: DEFAULT_MAX_BYTES,
            backup_count: DEFAULT_BACKUP_COUNT,
            json_output: true,
            terminal_output: true,
        }
    }
}

impl LogConfig {
    /// Default configuration for the given application name.
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            ..Self::default()
        }
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.log_level = level;
        self
    }

    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = dir.into();
        self
    }

    pub fn with_rotation(mut self, max_bytes: u64, backup_count: usize) -> Self {
        self.max_bytes = max_bytes;
        self.backup_count = backup_count;
        self
    }

    pub fn with_json_output(mut self, enabled: bool) -> Self {
        self.json_output = enabled;
        self
    }

    pub fn with_terminal_output(mut self, enabled: bool) -> Self {
        self.terminal_output = enabled;
        self
    }

    /// Path of the active log file.
    pub fn log_file(&self) -> PathBuf {
        self.log_dir.join(format!("{}.log", self.app_name))
    }
}
