//! Logging subsystem.
//!
//! # Data Flow
//! ```text
//! LogConfig
//!     → manager.rs (create dir, build sinks, install on named logger)
//!     → logger.rs  (process-wide registry, level filter, fan-out)
//!     → record.rs  (timestamp, level, logger, message, fields)
//!     → format.rs  (JSON or plain line)
//!     → sinks      (console, rotating file)
//!
//! Helpers feeding the same logger:
//!     scope.rs  (completion record on scope exit)
//!     wrap.rs   (timing and failure logging around calls)
//!     bridge.rs (tracing events → records)
//!     global.rs (lazily built default manager)
//! ```

pub mod bridge;
pub mod error;
pub mod format;
pub mod global;
pub mod level;
pub mod logger;
pub mod manager;
pub mod record;
pub mod scope;
pub mod wrap;

pub use bridge::LoggerLayer;
pub use error::{LogError, LogResult};
pub use format::Format;
pub use level::Level;
pub use logger::Logger;
pub use manager::LogManager;
pub use record::{Fields, LogRecord};
pub use scope::OperationScope;
