//! Logger configuration and ownership.
//!
//! # Responsibilities
//! - Validate the configuration and create the log directory
//! - Build the rotating file sink and, optionally, the console sink
//! - Install both on the logger named after the application
//!
//! # Design Decisions
//! - Fail fast: every configuration problem surfaces from `LogManager::new`
//! - Constructing a second manager for the same name replaces the sinks of
//!   the first; nothing is ever attached twice
//! - The file sink is created in plain mode too, rendering text lines

use std::fs;
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::fmt::MakeWriter;

use crate::config::{validate_config, ConfigurationError, LogConfig};
use crate::logging::bridge::LoggerLayer;
use crate::logging::{Format, Logger};
use crate::sinks::{ConsoleSink, RotatingFileSink, Sink};

/// Owns a logging configuration and the named logger it configured.
#[derive(Debug, Clone)]
pub struct LogManager {
    config: LogConfig,
    logger: Logger,
}

impl LogManager {
    /// Configure the logger named `config.app_name`.
    pub fn new(config: LogConfig) -> Result<Self, ConfigurationError> {
        Self::build(config, ConsoleSink::new(Format::Plain))
    }

    /// Like [`new`](Self::new), but the console sink writes to `make_writer`
    /// instead of stdout.
    pub fn with_console_writer<W>(
        config: LogConfig,
        make_writer: W,
    ) -> Result<Self, ConfigurationError>
    where
        W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
    {
        Self::build(config, ConsoleSink::new(Format::Plain).with_writer(make_writer))
    }

    fn build<W>(config: LogConfig, console: ConsoleSink<W>) -> Result<Self, ConfigurationError>
    where
        W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
    {
        validate_config(&config).map_err(ConfigurationError::Validation)?;
        ensure_dir(&config.log_dir)?;

        let log_file = config.log_file();
        let file_format = if config.json_output {
            Format::Json
        } else {
            Format::Plain
        };
        let file_sink = RotatingFileSink::open(
            &log_file,
            file_format,
            config.max_bytes,
            config.backup_count,
        )
        .map_err(|source| ConfigurationError::OpenLogFile {
            path: log_file.clone(),
            source,
        })?;

        let mut sinks: Vec<Arc<dyn Sink>> = vec![Arc::new(file_sink)];
        if config.terminal_output {
            sinks.push(Arc::new(console));
        }

        let logger = Logger::named(&config.app_name);
        logger.install(config.log_level, sinks);

        tracing::debug!(
            app_name = %config.app_name,
            level = %config.log_level,
            file = %log_file.display(),
            json = config.json_output,
            terminal = config.terminal_output,
            "Logger configured"
        );

        Ok(Self { config, logger })
    }

    /// Configure from `APP_NAME`, `LOG_LEVEL`, `LOG_DIR` and friends.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::new(LogConfig::from_env()?)
    }

    pub fn config(&self) -> &LogConfig {
        &self.config
    }

    pub fn app_name(&self) -> &str {
        &self.config.app_name
    }

    /// Handle to the logger bound to the application name.
    pub fn get_logger(&self) -> Logger {
        self.logger.clone()
    }

    /// A `tracing_subscriber` layer that forwards events into this logger.
    pub fn tracing_layer(&self) -> LoggerLayer {
        LoggerLayer::new(self.get_logger())
    }
}

fn ensure_dir(dir: &Path) -> Result<(), ConfigurationError> {
    if dir.exists() && !dir.is_dir() {
        return Err(ConfigurationError::NotADirectory(dir.to_path_buf()));
    }
    fs::create_dir_all(dir).map_err(|source| ConfigurationError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::Level;
    use crate::sinks::console::TestWriter;

    fn quiet(name: &str, dir: &Path) -> LogConfig {
        LogConfig::new(name)
            .with_log_dir(dir)
            .with_terminal_output(false)
    }

    #[test]
    fn test_creates_nested_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");

        let manager = LogManager::new(quiet("manager-nested", &nested)).unwrap();
        assert!(nested.is_dir());
        assert!(manager.config().log_file().exists());
    }

    #[test]
    fn test_existing_directory_is_fine() {
        let dir = tempfile::tempdir().unwrap();
        LogManager::new(quiet("manager-existing", dir.path())).unwrap();
        LogManager::new(quiet("manager-existing", dir.path())).unwrap();
    }

    #[test]
    fn test_file_in_the_way_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a dir").unwrap();

        let err = LogManager::new(quiet("manager-blocked", &blocker)).unwrap_err();
        assert!(matches!(err, ConfigurationError::NotADirectory(_)));

        let err = LogManager::new(quiet("manager-blocked", &blocker.join("sub"))).unwrap_err();
        assert!(matches!(err, ConfigurationError::CreateDir { .. }));
    }

    #[test]
    fn test_invalid_name_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = LogManager::new(quiet("", dir.path())).unwrap_err();
        assert!(matches!(err, ConfigurationError::Validation(_)));
    }

    #[test]
    fn test_sinks_follow_terminal_flag() {
        let dir = tempfile::tempdir().unwrap();

        let manager = LogManager::new(quiet("manager-sinks", dir.path())).unwrap();
        assert_eq!(manager.get_logger().sink_count(), 1);

        let manager = LogManager::new(
            LogConfig::new("manager-sinks").with_log_dir(dir.path()),
        )
        .unwrap();
        assert_eq!(manager.get_logger().sink_count(), 2);
    }

    #[test]
    fn test_console_gets_plain_lines_in_json_mode() {
        let dir = tempfile::tempdir().unwrap();
        let console = TestWriter::default();
        let manager = LogManager::with_console_writer(
            LogConfig::new("manager-console").with_log_dir(dir.path()),
            console.clone(),
        )
        .unwrap();

        manager.get_logger().info("Test message").unwrap();

        let output = console.output();
        assert!(output.contains(" - manager-console - INFO - Test message"));
        assert!(serde_json::from_str::<serde_json::Value>(output.trim_end()).is_err());

        let file = fs::read_to_string(manager.config().log_file()).unwrap();
        let record: serde_json::Value = serde_json::from_str(file.trim_end()).unwrap();
        assert_eq!(record["message"], "Test message");
    }

    #[test]
    fn test_get_logger_is_bound_to_name() {
        let dir = tempfile::tempdir().unwrap();
        let manager = LogManager::new(
            quiet("manager-bound", dir.path()).with_level(Level::Debug),
        )
        .unwrap();

        let logger = manager.get_logger();
        assert_eq!(logger.name(), "manager-bound");
        assert_eq!(logger.level(), Level::Debug);
        assert!(logger.ptr_eq(&manager.get_logger()));
        assert!(logger.ptr_eq(&Logger::named("manager-bound")));
    }
}
