//! Logging initialization for the client.

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the logging system.
///
/// Sets up tracing with:
/// - Log level from RUST_LOG env var or the provided default
/// - Compact formatted output on stderr
///
/// # Arguments
///
/// * `level` - Default log level (trace, debug, info, warn, error)
///
/// # Example
///
/// ```ignore
/// init_logging("info");
/// tracing::info!("Client started");
/// ```
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    // try_init so tests that each call init_logging don't panic
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}
