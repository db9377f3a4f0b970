//! Named loggers.
//!
//! # Responsibilities
//! - Keep one process-wide logger per name
//! - Hold each logger's minimum level and sinks
//! - Fan records out to every sink
//!
//! # Design Decisions
//! - Identity is by name: `Logger::named("x")` always yields handles to the
//!   same logger, no matter which manager configured it
//! - Level and sinks live together in an `ArcSwap`, so reconfiguring swaps
//!   both atomically while other threads keep emitting
//! - Every sink is attempted; the first failure is returned

use std::fmt;
use std::sync::{Arc, LazyLock};

use arc_swap::ArcSwap;
use dashmap::DashMap;

use crate::logging::error::LogResult;
use crate::logging::record::{Fields, LogRecord};
use crate::logging::Level;
use crate::observability::metrics;
use crate::sinks::Sink;

static REGISTRY: LazyLock<DashMap<String, Logger>> = LazyLock::new(DashMap::new);

#[derive(Debug, Clone)]
struct LoggerState {
    level: Level,
    sinks: Vec<Arc<dyn Sink>>,
}

struct LoggerInner {
    name: String,
    state: ArcSwap<LoggerState>,
}

/// Cheap-to-clone handle to a named logger.
#[derive(Clone)]
pub struct Logger {
    inner: Arc<LoggerInner>,
}

impl Logger {
    /// Get the logger registered under `name`, creating it on first use.
    ///
    /// A fresh logger has level INFO and no sinks, so it drops everything
    /// until a manager installs sinks on it.
    pub fn named(name: &str) -> Logger {
        if let Some(existing) = REGISTRY.get(name) {
            return existing.clone();
        }
        REGISTRY
            .entry(name.to_string())
            .or_insert_with(|| Logger {
                inner: Arc::new(LoggerInner {
                    name: name.to_string(),
                    state: ArcSwap::from_pointee(LoggerState {
                        level: Level::Info,
                        sinks: Vec::new(),
                    }),
                }),
            })
            .clone()
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Current minimum level.
    pub fn level(&self) -> Level {
        self.inner.state.load().level
    }

    /// Change the minimum level, keeping the installed sinks.
    pub fn set_level(&self, level: Level) {
        self.inner.state.rcu(|state| LoggerState {
            level,
            sinks: state.sinks.clone(),
        });
    }

    /// Whether a record at `level` would reach the sinks.
    pub fn is_enabled(&self, level: Level) -> bool {
        level >= self.level()
    }

    /// Number of installed sinks.
    pub fn sink_count(&self) -> usize {
        self.inner.state.load().sinks.len()
    }

    /// Replace the level and every installed sink in one step.
    pub fn install(&self, level: Level, sinks: Vec<Arc<dyn Sink>>) {
        self.inner.state.store(Arc::new(LoggerState { level, sinks }));
    }

    /// Whether two handles point at the same logger.
    pub fn ptr_eq(&self, other: &Logger) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Emit a record with structured fields.
    pub fn log(&self, level: Level, message: impl Into<String>, fields: Fields) -> LogResult<()> {
        let state = self.inner.state.load();
        if level < state.level || state.sinks.is_empty() {
            return Ok(());
        }

        let record = LogRecord::new(level, self.name(), message, fields);
        metrics::record_emitted(level);

        let mut first_error = None;
        for sink in &state.sinks {
            if let Err(e) = sink.write(&record) {
                metrics::record_sink_error(sink.name());
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Emit a record whose failure cannot be handed back to the caller.
    ///
    /// Used by scopes and call wrappers, which must return the wrapped
    /// result unchanged; sink failures are reported as a tracing warning.
    pub(crate) fn log_or_report(&self, level: Level, message: impl Into<String>, fields: Fields) {
        if let Err(e) = self.log(level, message, fields) {
            tracing::warn!(logger = %self.name(), error = %e, "Failed to emit log record");
        }
    }

    pub fn debug(&self, message: impl Into<String>) -> LogResult<()> {
        self.log(Level::Debug, message, Fields::new())
    }

    pub fn info(&self, message: impl Into<String>) -> LogResult<()> {
        self.log(Level::Info, message, Fields::new())
    }

    pub fn warning(&self, message: impl Into<String>) -> LogResult<()> {
        self.log(Level::Warning, message, Fields::new())
    }

    pub fn error(&self, message: impl Into<String>) -> LogResult<()> {
        self.log(Level::Error, message, Fields::new())
    }

    pub fn critical(&self, message: impl Into<String>) -> LogResult<()> {
        self.log(Level::Critical, message, Fields::new())
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.load();
        f.debug_struct("Logger")
            .field("name", &self.inner.name)
            .field("level", &state.level)
            .field("sinks", &state.sinks)
            .finish()
    }
}
