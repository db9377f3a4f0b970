//! Structured application logging.
//!
//! A [`LogManager`] configures a named [`Logger`] with a console sink and a
//! size-rotated file sink, rendering file records as JSON or plain text. On
//! top of that it offers operation scopes and call wrappers that log timing
//! and failures without changing what the wrapped code returns.
//!
//! ```no_run
//! use applog::{fields, LogConfig, LogManager};
//!
//! let manager = LogManager::new(LogConfig::new("billing")).unwrap();
//! let logger = manager.get_logger();
//! logger.info("Service started").unwrap();
//!
//! manager.with_context("process_items", fields! { "item_count" => 3 }, |log| {
//!     log.debug("processing").unwrap();
//! });
//!
//! let add = manager.with_timing("add", |(x, y): (i32, i32)| x + y);
//! assert_eq!(add((1, 2)), 3);
//! ```

pub mod config;
pub mod logging;
pub mod observability;
pub mod sinks;

pub use config::{load_config, ConfigurationError, LogConfig};
pub use logging::global::{default_manager, logger, reset_default_manager, set_default_manager};
pub use logging::{
    Fields, Format, Level, LogError, LogManager, LogRecord, LogResult, Logger, LoggerLayer,
    OperationScope,
};

#[doc(hidden)]
pub use serde_json as __serde_json;
