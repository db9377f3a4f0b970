//! Bridge from `tracing` events into a [`Logger`].
//!
//! Lets code that already uses `tracing::info!` and friends land in the
//! same console and rotating file sinks as direct `Logger` calls:
//!
//! ```no_run
//! use tracing_subscriber::layer::SubscriberExt;
//! use tracing_subscriber::util::SubscriberInitExt;
//!
//! let manager = applog::LogManager::new(applog::LogConfig::new("svc")).unwrap();
//! tracing_subscriber::registry()
//!     .with(manager.tracing_layer())
//!     .init();
//!
//! tracing::info!(user = "alice", "Signed in");
//! ```

use std::fmt;

use serde_json::Value;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::Layer;

use crate::logging::{Fields, Level, Logger};

/// Tracing layer that re-emits events as records on a named logger.
#[derive(Debug, Clone)]
pub struct LoggerLayer {
    logger: Logger,
}

impl LoggerLayer {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }
}

/// Events this crate emits about itself; forwarding them could recurse.
fn is_internal(target: &str) -> bool {
    target == "applog" || target.starts_with("applog::")
}

impl<S> Layer<S> for LoggerLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if is_internal(metadata.target()) {
            return;
        }

        let level = Level::from(*metadata.level());
        if !self.logger.is_enabled(level) {
            return;
        }

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);
        visitor
            .fields
            .insert("target".into(), Value::from(metadata.target()));

        // A subscriber has nowhere to return a sink failure to.
        self.logger.log_or_report(level, visitor.message, visitor.fields);
    }
}

/// Collects the `message` field and every other field as JSON values.
#[derive(Default)]
struct FieldVisitor {
    message: String,
    fields: Fields,
}

impl FieldVisitor {
    fn insert(&mut self, field: &Field, value: Value) {
        self.fields.insert(field.name().to_string(), value);
    }
}

impl Visit for FieldVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        } else {
            self.insert(field, Value::from(format!("{:?}", value)));
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.insert(field, Value::from(value));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, Value::from(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.insert(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, Value::from(value));
    }
}
