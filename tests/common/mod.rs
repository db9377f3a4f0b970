//! Shared utilities for integration testing.
//!
//! Loggers are process-wide and keyed by name, and tests run in parallel, so
//! every test builds its manager under its own application name.

use std::fs;
use std::path::{Path, PathBuf};

use applog::{Level, LogConfig, LogManager};
use serde_json::Value;
use tempfile::TempDir;

/// A manager writing into a private temporary directory.
pub struct TestLogs {
    pub dir: TempDir,
    pub manager: LogManager,
}

impl TestLogs {
    /// JSON output at DEBUG, no console echo.
    pub fn json(app_name: &str) -> Self {
        Self::with(app_name, |config| config)
    }

    /// Start from the quiet DEBUG config and adjust it.
    pub fn with(app_name: &str, adjust: impl FnOnce(LogConfig) -> LogConfig) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = LogConfig::new(app_name)
            .with_level(Level::Debug)
            .with_log_dir(dir.path())
            .with_terminal_output(false);
        let manager = LogManager::new(adjust(config)).unwrap();
        Self { dir, manager }
    }

    pub fn log_file(&self) -> PathBuf {
        self.manager.config().log_file()
    }

    pub fn lines(&self) -> Vec<String> {
        read_lines(&self.log_file())
    }

    pub fn records(&self) -> Vec<Value> {
        self.lines()
            .iter()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }
}

pub fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

/// Rotated files next to `log_file`, i.e. `<log_file>.<n>`.
#[allow(dead_code)]
pub fn backup_files(log_file: &Path) -> Vec<PathBuf> {
    let prefix = format!("{}.", log_file.file_name().unwrap().to_string_lossy());
    let mut backups: Vec<PathBuf> = fs::read_dir(log_file.parent().unwrap())
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|path| {
            path.file_name()
                .map(|name| name.to_string_lossy().starts_with(&prefix))
                .unwrap_or(false)
        })
        .collect();
    backups.sort();
    backups
}
