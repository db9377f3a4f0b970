//! Process-wide default manager.
//!
//! The default is built lazily from the environment on first access and kept
//! for the rest of the process. Tests (or an application with its own
//! configuration) replace it with [`set_default_manager`] and drop it with
//! [`reset_default_manager`]; nothing rebuilds it implicitly otherwise.

use std::sync::{Arc, Mutex, PoisonError};

use arc_swap::ArcSwapOption;

use crate::config::ConfigurationError;
use crate::logging::{LogManager, Logger};

static DEFAULT: ArcSwapOption<LogManager> = ArcSwapOption::const_empty();

/// Serializes lazy construction so the environment is read once.
static INIT: Mutex<()> = Mutex::new(());

/// The default manager, built from the environment on first use.
pub fn default_manager() -> Result<Arc<LogManager>, ConfigurationError> {
    if let Some(manager) = DEFAULT.load_full() {
        return Ok(manager);
    }

    let _guard = INIT.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(manager) = DEFAULT.load_full() {
        return Ok(manager);
    }

    let manager = Arc::new(LogManager::from_env()?);
    DEFAULT.store(Some(manager.clone()));
    tracing::debug!(app_name = %manager.app_name(), "Default log manager initialized");
    Ok(manager)
}

/// Logger of the default manager.
pub fn logger() -> Result<Logger, ConfigurationError> {
    Ok(default_manager()?.get_logger())
}

/// Replace the default manager, returning the previous one.
pub fn set_default_manager(manager: LogManager) -> Option<Arc<LogManager>> {
    let _guard = INIT.lock().unwrap_or_else(PoisonError::into_inner);
    DEFAULT.swap(Some(Arc::new(manager)))
}

/// Drop the default manager; the next access rebuilds it from the environment.
pub fn reset_default_manager() -> Option<Arc<LogManager>> {
    let _guard = INIT.lock().unwrap_or_else(PoisonError::into_inner);
    DEFAULT.swap(None)
}
