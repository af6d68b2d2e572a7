#![deny(missing_docs)]
//! Shared logging utilities for the unload workspace.
//!
//! This crate provides the `unload_*` logging macros used across the codebase
//! and a minimal test initializer for the global logger. Every message is
//! prefixed with the sequence number of the scan currently being processed,
//! so a log file can be read side by side with the operator's scan history.

use std::cell::Cell;

thread_local! {
    /// Thread-local storage for the sequence number of the scan being processed.
    static SCAN_SEQ: Cell<u64> = const { Cell::new(0) };
}

/// Sets the scan sequence number for the current thread.
/// The dispatch loop calls this before applying each scan.
pub fn set_scan_seq(seq: u64) {
    SCAN_SEQ.with(|v| v.set(seq));
}

/// Retrieves the scan sequence number for the current thread.
/// Returns 0 before the first scan.
pub fn scan_seq() -> u64 {
    SCAN_SEQ.with(|v| v.get())
}

/// Logs a trace-level message tagged with the current scan sequence.
#[macro_export]
macro_rules! unload_trace {
    ($($arg:tt)*) => {{
        log::trace!("[scan {}] {}", $crate::scan_seq(), format_args!($($arg)*));
    }};
}

/// Logs a debug-level message tagged with the current scan sequence.
#[macro_export]
macro_rules! unload_debug {
    ($($arg:tt)*) => {{
        log::debug!("[scan {}] {}", $crate::scan_seq(), format_args!($($arg)*));
    }};
}

/// Logs an info-level message tagged with the current scan sequence.
#[macro_export]
macro_rules! unload_info {
    ($($arg:tt)*) => {{
        log::info!("[scan {}] {}", $crate::scan_seq(), format_args!($($arg)*));
    }};
}

/// Logs a warn-level message tagged with the current scan sequence.
#[macro_export]
macro_rules! unload_warn {
    ($($arg:tt)*) => {{
        log::warn!("[scan {}] {}", $crate::scan_seq(), format_args!($($arg)*));
    }};
}

/// Logs an error-level message tagged with the current scan sequence.
#[macro_export]
macro_rules! unload_error {
    ($($arg:tt)*) => {{
        log::error!("[scan {}] {}", $crate::scan_seq(), format_args!($($arg)*));
    }};
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Another test may already own the global logger.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
