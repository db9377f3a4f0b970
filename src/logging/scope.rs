//! Scoped operation logging.
//!
//! An [`OperationScope`] is a guard: creating it starts the clock, dropping
//! it emits the completion record. Because the record is written from `Drop`
//! it is emitted on every exit path, including `?` early returns and panics.
//! [`LogManager::with_context`] additionally catches a panic from its body so
//! the failure record carries the panic message before it is resumed.
//!
//! ```text
//! Operation <name> completed
//!     context: { <caller context>, operation, timestamp, duration }
//! ```

use std::fmt::Display;
use std::panic::{self, AssertUnwindSafe};
use std::thread;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use serde_json::Value;

use crate::logging::wrap::panic_message;
use crate::logging::{Fields, Level, LogManager, Logger};

/// Guard that logs the completion of an operation when dropped.
#[derive(Debug)]
pub struct OperationScope {
    logger: Logger,
    operation: String,
    context: Fields,
    started: Instant,
    started_unix: f64,
}

impl OperationScope {
    /// Start timing `operation` on `logger`.
    pub fn enter(logger: Logger, operation: impl Into<String>, context: Fields) -> Self {
        Self {
            logger,
            operation: operation.into(),
            context,
            started: Instant::now(),
            started_unix: unix_now(),
        }
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Add a key to the context carried by the completion record.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.context.insert(key.into(), value.into());
    }

    /// Emit an ERROR record for a failure observed inside the scope.
    pub fn record_failure(&self, error: &dyn Display) {
        let mut fields = Fields::new();
        fields.insert("exception".into(), Value::from(error.to_string()));
        fields.insert("context".into(), Value::Object(self.snapshot()));
        self.logger.log_or_report(
            Level::Error,
            format!("Operation {} failed", self.operation),
            fields,
        );
    }

    fn snapshot(&self) -> Fields {
        let mut context = self.context.clone();
        context.insert("operation".into(), Value::from(self.operation.as_str()));
        context.insert("timestamp".into(), Value::from(self.started_unix));
        context.insert(
            "duration".into(),
            Value::from(self.started.elapsed().as_secs_f64()),
        );
        context
    }
}

impl Drop for OperationScope {
    fn drop(&mut self) {
        // A bare guard only learns about a panic while unwinding through it.
        if thread::panicking() {
            self.record_failure(&"operation panicked");
        }

        let mut fields = Fields::new();
        fields.insert("context".into(), Value::Object(self.snapshot()));
        self.logger.log_or_report(
            Level::Info,
            format!("Operation {} completed", self.operation),
            fields,
        );
    }
}

impl LogManager {
    /// Open a scope on this manager's logger; see [`OperationScope`].
    pub fn scope(&self, operation: impl Into<String>, context: Fields) -> OperationScope {
        OperationScope::enter(self.get_logger(), operation, context)
    }

    /// Run `body` inside an operation scope, returning its result unchanged.
    pub fn with_context<R, F>(&self, operation: impl Into<String>, context: Fields, body: F) -> R
    where
        F: FnOnce(&Logger) -> R,
    {
        run_scoped(self.scope(operation, context), |scope| body(scope.logger()))
    }

    /// Like [`with_context`](Self::with_context), but an `Err` from `body` is
    /// also logged at ERROR before being returned unchanged.
    pub fn try_with_context<T, E, F>(
        &self,
        operation: impl Into<String>,
        context: Fields,
        body: F,
    ) -> Result<T, E>
    where
        E: Display,
        F: FnOnce(&Logger) -> Result<T, E>,
    {
        run_scoped(self.scope(operation, context), |scope| {
            let result = body(scope.logger());
            if let Err(e) = &result {
                scope.record_failure(e);
            }
            result
        })
    }
}

/// Run `body` under `scope`, logging a panic with its message before
/// resuming it. The scope is dropped before unwinding continues, so the
/// completion record follows the failure record exactly once.
fn run_scoped<R>(scope: OperationScope, body: impl FnOnce(&OperationScope) -> R) -> R {
    match panic::catch_unwind(AssertUnwindSafe(|| body(&scope))) {
        Ok(value) => value,
        Err(payload) => {
            scope.record_failure(&panic_message(payload.as_ref()));
            drop(scope);
            panic::resume_unwind(payload)
        }
    }
}

fn unix_now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::logging::Format;
    use crate::sinks::MemorySink;

    fn capture(name: &str) -> (Logger, MemorySink) {
        let logger = Logger::named(name);
        let sink = MemorySink::new(Format::Json);
        logger.install(Level::Debug, vec![Arc::new(sink.clone())]);
        (logger, sink)
    }

    #[test]
    fn test_completion_record_on_drop() {
        let (logger, sink) = capture("scope-drop");
        {
            let mut scope = OperationScope::enter(logger, "load", crate::fields! { "batch" => 7 });
            scope.insert("rows", 120);
            scope.logger().info("inside").unwrap();
        }

        let records = sink.records();
        assert_eq!(records.len(), 2);
        let done = &records[1];
        assert_eq!(done.message, "Operation load completed");
        assert_eq!(done.level, Level::Info);
        let context = &done.fields["context"];
        assert_eq!(context["operation"], "load");
        assert_eq!(context["batch"], 7);
        assert_eq!(context["rows"], 120);
        assert!(context["duration"].as_f64().unwrap() >= 0.0);
        assert!(context["timestamp"].as_f64().unwrap() > 0.0);
    }

    #[test]
    fn test_completion_record_on_panic() {
        let (logger, sink) = capture("scope-panic");

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            let _scope = OperationScope::enter(logger, "explode", Fields::new());
            panic!("boom");
        }));

        assert!(result.is_err());
        let records = sink.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].level, Level::Error);
        assert_eq!(records[0].message, "Operation explode failed");
        assert_eq!(records[0].fields["exception"], "operation panicked");
        assert_eq!(records[1].message, "Operation explode completed");
    }

    #[test]
    fn test_with_context_logs_panic_message() {
        let dir = tempfile::tempdir().unwrap();
        let manager = LogManager::new(
            crate::LogConfig::new("scope-with-context-panic")
                .with_log_dir(dir.path())
                .with_terminal_output(false),
        )
        .unwrap();
        let (_, sink) = capture("scope-with-context-panic");

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            manager.with_context("upload", crate::fields! { "bucket" => "b1" }, |_| {
                panic!("disk quota exceeded")
            })
        }));

        let payload = result.unwrap_err();
        assert_eq!(payload.downcast_ref::<&str>(), Some(&"disk quota exceeded"));
        let records = sink.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].level, Level::Error);
        assert_eq!(records[0].fields["exception"], "disk quota exceeded");
        assert_eq!(records[0].fields["context"]["bucket"], "b1");
        assert_eq!(records[1].message, "Operation upload completed");
    }
}
