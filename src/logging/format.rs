//! Record rendering.
//!
//! # Formats
//! - `Json`: one flat object per line. Record fields sit at the top level
//!   next to `timestamp`, `level`, `logger` and `message`.
//! - `Plain`: `timestamp - logger - LEVEL - message`, then ` | key=value`
//!   pairs when the record carries fields.

use std::fmt::Write as _;

use chrono::{Local, SecondsFormat};
use serde_json::Value;

use crate::logging::error::LogResult;
use crate::logging::record::{LogRecord, RESERVED_KEYS};

/// How a sink renders records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Plain,
}

impl Format {
    /// Render a record as a single line, without the trailing newline.
    pub fn render(&self, record: &LogRecord) -> LogResult<String> {
        match self {
            Format::Json => render_json(record),
            Format::Plain => Ok(render_plain(record)),
        }
    }
}

fn render_json(record: &LogRecord) -> LogResult<String> {
    let mut object = record.fields.clone();
    for key in RESERVED_KEYS {
        object.remove(key);
    }
    object.insert(
        "timestamp".into(),
        Value::from(record.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)),
    );
    object.insert("level".into(), Value::from(record.level.as_str()));
    object.insert("logger".into(), Value::from(record.logger.as_str()));
    object.insert("message".into(), Value::from(record.message.as_str()));

    Ok(serde_json::to_string(&object)?)
}

fn render_plain(record: &LogRecord) -> String {
    let timestamp = record.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S,%3f");
    let mut line = format!(
        "{} - {} - {} - {}",
        timestamp, record.logger, record.level, record.message
    );

    if !record.fields.is_empty() {
        line.push_str(" |");
        for (key, value) in &record.fields {
            // Infallible for String.
            let _ = match value {
                Value::String(s) => write!(line, " {}={}", key, s),
                other => write!(line, " {}={}", key, other),
            };
        }
    }

    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::Level;

    fn record() -> LogRecord {
        LogRecord::new(
            Level::Info,
            "test",
            "test message",
            crate::fields! { "user" => "alice", "attempt" => 2 },
        )
    }

    #[test]
    fn test_json_has_core_keys() {
        let line = Format::Json.render(&record()).unwrap();
        let value: Value = serde_json::from_str(&line).unwrap();

        assert_eq!(value["level"], "INFO");
        assert_eq!(value["logger"], "test");
        assert_eq!(value["message"], "test message");
        assert!(value["timestamp"].is_string());
        assert_eq!(value["user"], "alice");
        assert_eq!(value["attempt"], 2);
        assert!(!line.contains('\n'));
    }

    #[test]
    fn test_json_fields_cannot_shadow_core_keys() {
        let mut record = record();
        record.fields.insert("level".into(), Value::from("FAKE"));
        record.fields.insert("message".into(), Value::from("spoofed"));

        let value: Value = serde_json::from_str(&Format::Json.render(&record).unwrap()).unwrap();
        assert_eq!(value["level"], "INFO");
        assert_eq!(value["message"], "test message");
    }

    #[test]
    fn test_json_escapes_newlines() {
        let record = LogRecord::new(Level::Error, "test", "line one\nline two", crate::fields! {});
        let line = Format::Json.render(&record).unwrap();
        assert!(!line.contains('\n'));
        let value: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["message"], "line one\nline two");
    }

    #[test]
    fn test_plain_layout() {
        let line = Format::Plain.render(&record()).unwrap();

        assert!(line.contains(" - test - INFO - test message"));
        assert!(line.contains("attempt=2"));
        assert!(line.contains("user=alice"));
        assert!(serde_json::from_str::<Value>(&line).is_err());
    }

    #[test]
    fn test_plain_without_fields() {
        let record = LogRecord::new(Level::Warning, "svc", "careful", crate::fields! {});
        let line = Format::Plain.render(&record).unwrap();
        assert!(line.ends_with(" - svc - WARNING - careful"));
    }
}
