//! The process-wide default manager.
//!
//! These tests share one global and the process environment, so they run
//! one at a time under `SERIAL`.

use std::sync::{Mutex, PoisonError};

use applog::{default_manager, logger, reset_default_manager, set_default_manager, Level};

mod common;

use common::TestLogs;

static SERIAL: Mutex<()> = Mutex::new(());

#[test]
fn test_override_and_reset() {
    let _serial = SERIAL.lock().unwrap_or_else(PoisonError::into_inner);

    let logs = TestLogs::json("default-override");
    set_default_manager(logs.manager.clone());

    let first = default_manager().unwrap();
    let second = default_manager().unwrap();
    assert!(std::sync::Arc::ptr_eq(&first, &second));
    assert_eq!(first.app_name(), "default-override");

    logger().unwrap().info("through the default").unwrap();
    assert_eq!(logs.records()[0]["message"], "through the default");

    let previous = reset_default_manager().unwrap();
    assert_eq!(previous.app_name(), "default-override");
}

#[test]
fn test_lazy_construction_from_environment() {
    let _serial = SERIAL.lock().unwrap_or_else(PoisonError::into_inner);
    let dir = tempfile::tempdir().unwrap();

    std::env::set_var("APP_NAME", "default-from-env");
    std::env::set_var("LOG_LEVEL", "DEBUG");
    std::env::set_var("LOG_DIR", dir.path());
    reset_default_manager();

    let manager = default_manager().unwrap();
    assert_eq!(manager.app_name(), "default-from-env");
    assert_eq!(manager.get_logger().level(), Level::Debug);
    assert!(dir.path().join("default-from-env.log").exists());

    // Changing the environment afterwards does not rebuild the instance.
    std::env::set_var("APP_NAME", "default-changed");
    assert_eq!(default_manager().unwrap().app_name(), "default-from-env");

    std::env::set_var("LOG_LEVEL", "LOUD");
    reset_default_manager();
    assert!(default_manager().is_err());

    for key in ["APP_NAME", "LOG_LEVEL", "LOG_DIR"] {
        std::env::remove_var(key);
    }
    reset_default_manager();
}
