//! Log records and their structured fields.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::logging::Level;

/// Structured key/value data attached to a record.
pub type Fields = Map<String, Value>;

/// Keys every rendered JSON record carries. Record fields never override them.
pub const RESERVED_KEYS: [&str; 4] = ["timestamp", "level", "logger", "message"];

/// A single log event on its way to the sinks.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    /// When the record was stamped, immediately before dispatch to the sinks.
    pub timestamp: DateTime<Utc>,
    pub level: Level,
    /// Name of the logger that produced the record.
    pub logger: String,
    pub message: String,
    pub fields: Fields,
}

impl LogRecord {
    /// Create a record stamped with the current time.
    pub fn new(level: Level, logger: impl Into<String>, message: impl Into<String>, fields: Fields) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            logger: logger.into(),
            message: message.into(),
            fields,
        }
    }

    /// Look up a structured field by name.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

/// Build a [`Fields`] map from `key => value` pairs.
///
/// Values go through `serde_json::json!`, so anything serializable works.
///
/// ```
/// let fields = applog::fields! { "item_count" => 3, "source" => "queue" };
/// assert_eq!(fields["item_count"], 3);
/// ```
#[macro_export]
macro_rules! fields {
    () => {
        $crate::Fields::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::Fields::new();
        $(
            map.insert(::std::string::ToString::to_string(&$key), $crate::__serde_json::json!($value));
        )+
        map
    }};
}
