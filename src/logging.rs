//! Tracing setup.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter (e.g. `info`, `sotp_montecarlo=debug`).
pub const LOG_ENV: &str = "SOTP_LOG";

/// Install the global subscriber. Logs go to stderr so stdout carries only the report.
///
/// Calling this more than once is harmless; later calls are ignored.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
