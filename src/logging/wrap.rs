//! Call wrappers that log timing and failures.
//!
//! Each wrapper takes a callable and returns a callable of the same shape.
//! Multi-argument functions take their arguments as a tuple, which is also
//! what ends up Debug-rendered into `func_args`.

use std::any::Any;
use std::error::Error;
use std::fmt::{Debug, Display};
use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};

use serde_json::Value;

use crate::logging::{Fields, Level, LogManager, Logger};
use crate::observability::metrics;

impl LogManager {
    /// Log an INFO record with the call's duration after every return.
    ///
    /// A panic inside `f` unwinds straight through and emits no record.
    pub fn with_timing<A, R, F>(&self, name: impl Into<String>, f: F) -> impl Fn(A) -> R
    where
        A: Debug,
        F: Fn(A) -> R,
    {
        let logger = self.get_logger();
        let name = name.into();
        move |args: A| {
            let rendered = format!("{:?}", args);
            let started = Instant::now();
            let result = f(args);
            log_timing(&logger, &name, started.elapsed(), rendered);
            result
        }
    }

    /// Like [`with_timing`](Self::with_timing) for fallible calls: the record
    /// is only emitted for `Ok`, and an `Err` is returned untouched.
    pub fn try_with_timing<A, T, E, F>(
        &self,
        name: impl Into<String>,
        f: F,
    ) -> impl Fn(A) -> Result<T, E>
    where
        A: Debug,
        F: Fn(A) -> Result<T, E>,
    {
        let logger = self.get_logger();
        let name = name.into();
        move |args: A| {
            let rendered = format!("{:?}", args);
            let started = Instant::now();
            let result = f(args);
            if result.is_ok() {
                log_timing(&logger, &name, started.elapsed(), rendered);
            }
            result
        }
    }

    /// Log every failure of `f` at ERROR, then hand it back unchanged.
    ///
    /// `Err` values are returned as-is; panics are logged and resumed.
    pub fn with_exception_logging<A, T, E, F>(
        &self,
        name: impl Into<String>,
        f: F,
    ) -> impl Fn(A) -> Result<T, E>
    where
        A: Debug,
        E: Display,
        F: Fn(A) -> Result<T, E>,
    {
        guard_failures(self.get_logger(), name.into(), f, |_: &E| Fields::new())
    }

    /// Like [`with_exception_logging`](Self::with_exception_logging), but the
    /// ERROR record also carries the error's `source()` chain as `causes`,
    /// nearest cause first.
    pub fn with_exception_chain_logging<A, T, E, F>(
        &self,
        name: impl Into<String>,
        f: F,
    ) -> impl Fn(A) -> Result<T, E>
    where
        A: Debug,
        E: Error,
        F: Fn(A) -> Result<T, E>,
    {
        guard_failures(self.get_logger(), name.into(), f, |e: &E| {
            let mut fields = Fields::new();
            fields.insert("causes".into(), Value::from(source_chain(e)));
            fields
        })
    }
}

fn guard_failures<A, T, E, F, D>(
    logger: Logger,
    name: String,
    f: F,
    describe: D,
) -> impl Fn(A) -> Result<T, E>
where
    A: Debug,
    E: Display,
    F: Fn(A) -> Result<T, E>,
    D: Fn(&E) -> Fields,
{
    move |args: A| {
        let rendered = format!("{:?}", args);
        match panic::catch_unwind(AssertUnwindSafe(|| f(args))) {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                let fields = describe(&e);
                log_exception(&logger, &name, e.to_string(), rendered, fields);
                Err(e)
            }
            Err(payload) => {
                log_exception(
                    &logger,
                    &name,
                    panic_message(payload.as_ref()),
                    rendered,
                    Fields::new(),
                );
                panic::resume_unwind(payload)
            }
        }
    }
}

/// Display text of every error below `error`, nearest cause first.
fn source_chain(error: &dyn Error) -> Vec<String> {
    let mut causes = Vec::new();
    let mut next = error.source();
    while let Some(cause) = next {
        causes.push(cause.to_string());
        next = cause.source();
    }
    causes
}

fn log_timing(logger: &Logger, name: &str, elapsed: Duration, args: String) {
    metrics::record_call_duration(name, elapsed);

    let mut fields = Fields::new();
    fields.insert("function".into(), Value::from(name));
    fields.insert("duration".into(), Value::from(elapsed.as_secs_f64()));
    fields.insert("func_args".into(), Value::from(args));
    logger.log_or_report(Level::Info, format!("Function {} executed", name), fields);
}

fn log_exception(
    logger: &Logger,
    name: &str,
    exception: String,
    args: String,
    mut fields: Fields,
) {
    fields.insert("function".into(), Value::from(name));
    fields.insert("exception".into(), Value::from(exception));
    fields.insert("func_args".into(), Value::from(args));
    logger.log_or_report(Level::Error, format!("Exception in {}", name), fields);
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    #[derive(Debug, thiserror::Error)]
    enum UploadError {
        #[error("upload of {0} failed")]
        Failed(String, #[source] io::Error),
    }

    #[test]
    fn test_source_chain_lists_causes() {
        let inner = io::Error::other("connection reset");
        let error = UploadError::Failed("report.csv".into(), inner);
        assert_eq!(source_chain(&error), vec!["connection reset".to_string()]);

        let bare = io::Error::other("no cause");
        assert!(source_chain(&bare).is_empty());
    }

    #[test]
    fn test_panic_message_variants() {
        let payload: Box<dyn Any + Send> = Box::new("static");
        assert_eq!(panic_message(payload.as_ref()), "static");

        let payload: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(payload.as_ref()), "owned");

        let payload: Box<dyn Any + Send> = Box::new(42_u8);
        assert_eq!(panic_message(payload.as_ref()), "panic with non-string payload");
    }
}
