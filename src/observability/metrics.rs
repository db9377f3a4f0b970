//! Metrics collection.
//!
//! # Metrics
//! - `applog_records_total` (counter): records emitted, by level
//! - `applog_rotations_total` (counter): file rotations, by file name
//! - `applog_sink_errors_total` (counter): failed sink writes, by sink
//! - `applog_call_duration_seconds` (histogram): durations seen by timing wrappers
//!
//! # Design Decisions
//! - Uses the `metrics` facade only; no recorder is installed here, so the
//!   calls are no-ops until the host application installs an exporter
//! - Labels stay low-cardinality (level, sink, file name)

use std::path::Path;
use std::time::Duration;

use crate::logging::Level;

/// Count one emitted record.
pub fn record_emitted(level: Level) {
    ::metrics::counter!("applog_records_total", "level" => level.as_str()).increment(1);
}

/// Count one file rotation.
pub fn record_rotation(path: &Path) {
    let file = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    ::metrics::counter!("applog_rotations_total", "file" => file).increment(1);
}

/// Count one failed sink write.
pub fn record_sink_error(sink: &'static str) {
    ::metrics::counter!("applog_sink_errors_total", "sink" => sink).increment(1);
}

/// Observe the duration of a wrapped call.
pub fn record_call_duration(function: &str, elapsed: Duration) {
    ::metrics::histogram!("applog_call_duration_seconds", "function" => function.to_string())
        .record(elapsed.as_secs_f64());
}
