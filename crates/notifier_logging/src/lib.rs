#![deny(missing_docs)]
//! Shared logging utilities for the notifier workspace.
//!
//! This crate provides the `notify_*` logging macros used across the codebase
//! and a minimal test initializer for the global logger.

use std::cell::Cell;

thread_local! {
    /// Thread-local storage for the current polling run number.
    static RUN_SEQ: Cell<u64> = const { Cell::new(0) };
}

/// Sets the polling run number for the current thread.
/// This should be called by the scheduler loop once per run.
pub fn set_run_seq(run: u64) {
    RUN_SEQ.with(|v| v.set(run));
}

/// Retrieves the polling run number for the current thread.
/// Returns 0 if no run has been started.
pub fn get_run_seq() -> u64 {
    RUN_SEQ.with(|v| v.get())
}

/// Logs a trace-level message, prefixed with the current run number.
#[macro_export]
macro_rules! notify_trace {
    ($($arg:tt)*) => {{
        log::trace!("run {}: {}", $crate::get_run_seq(), format_args!($($arg)*));
    }};
}

/// Logs an info-level message, prefixed with the current run number.
#[macro_export]
macro_rules! notify_info {
    ($($arg:tt)*) => {{
        log::info!("run {}: {}", $crate::get_run_seq(), format_args!($($arg)*));
    }};
}

/// Logs a debug-level message, prefixed with the current run number.
#[macro_export]
macro_rules! notify_debug {
    ($($arg:tt)*) => {{
        log::debug!("run {}: {}", $crate::get_run_seq(), format_args!($($arg)*));
    }};
}

/// Logs a warn-level message, prefixed with the current run number.
#[macro_export]
macro_rules! notify_warn {
    ($($arg:tt)*) => {{
        log::warn!("run {}: {}", $crate::get_run_seq(), format_args!($($arg)*));
    }};
}

/// Logs an error-level message, prefixed with the current run number.
#[macro_export]
macro_rules! notify_error {
    ($($arg:tt)*) => {{
        log::error!("run {}: {}", $crate::get_run_seq(), format_args!($($arg)*));
    }};
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
