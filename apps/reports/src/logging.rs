//! Structured logging setup.
//!
//! ## Log Levels
//! - `RUST_LOG=debug` - Show debug messages everywhere
//! - `RUST_LOG=downtown_db=trace` - Trace the storage crate only
//! - Otherwise the `[logging] filter` from the config is used
//!
//! Logs go to stderr so stdout carries only report JSON.

use tracing_subscriber::EnvFilter;

/// Builds the filter: `RUST_LOG` first, then the configured directive.
pub fn filter(configured: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(configured))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initializes the global subscriber. Later calls are ignored.
pub fn init(configured: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(configured))
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Subscriber for tests, captured by the test harness.
#[cfg(test)]
pub fn init_for_tests() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
