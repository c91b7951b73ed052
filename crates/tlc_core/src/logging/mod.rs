//! Logging infrastructure for the track language corrector.
//!
//! This module provides:
//! - A per-run log file recording every change and issue
//! - Message prefixes shared by the log file, console and notifier
//! - Integration with the `tracing` ecosystem
//!
//! # Example
//!
//! ```no_run
//! use tlc_core::logging::{init_tracing, LogLevel, RunLog};
//!
//! init_tracing(LogLevel::Info);
//!
//! let mut log = RunLog::create("/path/to/logs", true).unwrap();
//! log.line("Track 2 set to eng");
//! ```

mod run_log;
mod types;

pub use run_log::RunLog;
pub use types::{LogLevel, MessagePrefix};

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize global tracing subscriber for application-wide logging.
///
/// This sets up a subscriber that:
/// - Respects RUST_LOG environment variable
/// - Falls back to the provided default level
/// - Outputs to stderr with timestamps
///
/// Should be called once at application startup.
pub fn init_tracing(default_level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_to_filter_str(default_level)));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false),
        )
        .with(filter)
        .init();
}

/// Initialize tracing for tests (only logs warnings and above).
#[cfg(test)]
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}

/// Convert LogLevel to filter string.
fn level_to_filter_str(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Trace => "trace",
        LogLevel::Debug => "debug",
        LogLevel::Info => "info",
        LogLevel::Warn => "warn",
        LogLevel::Error => "error",
    }
}
