#![deny(missing_docs)]
//! Shared logging utilities for the verifier workspace.
//!
//! This crate provides the `verifier_*` logging macros used across the
//! codebase and a minimal test initializer for the global logger. Every line
//! is tagged with the session that was active on the logging thread.

use std::cell::Cell;

#[doc(hidden)]
pub use log;

thread_local! {
    /// Thread-local storage for the current verification session id.
    static SESSION: Cell<u64> = const { Cell::new(0) };
}

/// Sets the session id for the current thread.
/// The controller calls this once when a new run starts.
pub fn set_session(session: u64) {
    SESSION.with(|v| v.set(session));
}

/// Retrieves the session id for the current thread.
/// Returns 0 if no session has been started on this thread.
pub fn current_session() -> u64 {
    SESSION.with(|v| v.get())
}

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! verifier_trace {
    ($($arg:tt)*) => {{
        $crate::log::trace!("[session {}] {}", $crate::current_session(), format_args!($($arg)*));
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! verifier_debug {
    ($($arg:tt)*) => {{
        $crate::log::debug!("[session {}] {}", $crate::current_session(), format_args!($($arg)*));
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! verifier_info {
    ($($arg:tt)*) => {{
        $crate::log::info!("[session {}] {}", $crate::current_session(), format_args!($($arg)*));
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! verifier_warn {
    ($($arg:tt)*) => {{
        $crate::log::warn!("[session {}] {}", $crate::current_session(), format_args!($($arg)*));
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! verifier_error {
    ($($arg:tt)*) => {{
        $crate::log::error!("[session {}] {}", $crate::current_session(), format_args!($($arg)*));
    }};
}

/// Initializes a simple terminal logger for use in tests.
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
