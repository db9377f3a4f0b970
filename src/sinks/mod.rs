//! Output sinks.
//!
//! # Data Flow
//! ```text
//! Logger::log(record)
//!     → every installed sink, in install order
//!         → console.rs  (stdout, plain text)
//!         → rotating.rs (<dir>/<app>.log, JSON or plain, size-rotated)
//!         → memory.rs   (in-process capture, for tests and tooling)
//! ```
//!
//! # Design Decisions
//! - A sink renders with its own `Format`, so console and file may differ
//! - Sinks serialize their own physical writes; callers never lock
//! - Write failures are returned to the caller, never swallowed

use std::fmt;

use crate::logging::{LogRecord, LogResult};

pub mod console;
pub mod memory;
pub mod rotating;

pub use console::ConsoleSink;
pub use memory::MemorySink;
pub use rotating::RotatingFileSink;

/// A destination for formatted records.
pub trait Sink: Send + Sync + fmt::Debug {
    /// Short name used in errors and metrics.
    fn name(&self) -> &'static str;

    /// Render and write one record.
    fn write(&self, record: &LogRecord) -> LogResult<()>;
}
