//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults
//!     → environment (APP_NAME, LOG_LEVEL, LOG_DIR, ...) or TOML file
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → LogConfig (validated, immutable)
//!     → LogManager::new
//! ```
//!
//! # Design Decisions
//! - Config is immutable once handed to a manager; reconfiguring means
//!   building a new manager for the same name
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigurationError};
pub use schema::LogConfig;
pub use validation::{validate_config, ValidationError};
