//! Errors raised while emitting records.

use std::io;

use thiserror::Error;

/// Errors that can occur while formatting or writing a record.
#[derive(Debug, Error)]
pub enum LogError {
    /// A sink failed to write (disk full, permission revoked, closed stdout).
    #[error("failed to write to {sink} sink: {source}")]
    Io {
        sink: &'static str,
        #[source]
        source: io::Error,
    },

    /// A record could not be rendered as JSON.
    #[error("failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl LogError {
    pub(crate) fn io(sink: &'static str, source: io::Error) -> Self {
        LogError::Io { sink, source }
    }
}

/// Result type for record emission.
pub type LogResult<T> = Result<T, LogError>;
