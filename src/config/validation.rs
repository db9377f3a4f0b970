//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Reject application names that cannot form a file name
//! - Collect every problem instead of stopping at the first

use std::fmt;

use crate::config::schema::LogConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

/// Validate a configuration, returning every problem found.
pub fn validate_config(config: &LogConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let name = config.app_name.as_str();
    if name.trim().is_empty() {
        errors.push(ValidationError::new("app_name", "must not be empty"));
    } else if name == "." || name == ".." {
        errors.push(ValidationError::new("app_name", "must not be a relative path component"));
    } else if name.contains(['/', '\\', '\0']) {
        errors.push(ValidationError::new(
            "app_name",
            format!("'{}' contains a path separator", name),
        ));
    }

    if config.log_dir.as_os_str().is_empty() {
        errors.push(ValidationError::new("log_dir", "must not be empty"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
