//! Logging setup for the CLI.
//!
//! Library code only emits `tracing` events; the binary decides where they
//! go. Events are written to stderr so stdout carries nothing but responses
//! and reports.
//!
//! | flags | default filter |
//! |-------|----------------|
//! | none  | `warn`         |
//! | `-v`  | `info`         |
//! | `-vv` | `debug`        |
//!
//! `RUST_LOG` takes precedence over the flags when set.

use tracing_subscriber::EnvFilter;

/// Default filter directive for a verbosity count.
pub fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Build the filter, preferring `RUST_LOG`.
pub fn env_filter(verbosity: u8) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_for(verbosity)))
}

/// Install the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init_tracing(verbosity: u8) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbosity))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
