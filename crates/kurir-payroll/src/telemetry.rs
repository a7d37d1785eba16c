//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Initializes the global tracing subscriber.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - overrides everything
/// - `RUST_LOG=kurir_payroll=trace` - trace for the service crate only
/// - Otherwise `default_directive` (see `ServiceConfig::log_level`)
///
/// Calling it twice is harmless; the second call leaves the first
/// subscriber in place and returns false.
pub fn init_tracing(default_directive: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}
