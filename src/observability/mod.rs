//! Observability of the logging layer itself.
//!
//! # Data Flow
//! ```text
//! Logger, sinks and wrappers produce:
//!     → metrics.rs (counters and histograms via the `metrics` facade)
//!     → tracing::{debug, warn} events with target `applog::*`
//!
//! Consumers:
//!     → whatever metrics recorder the host installs
//!     → whatever tracing subscriber the host installs
//! ```
//!
//! # Design Decisions
//! - Internal diagnostics never go through a `Logger`, so they cannot recurse
//!   into the sinks they describe
//! - The tracing bridge drops `applog::*` events for the same reason

pub mod metrics;
