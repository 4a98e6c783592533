//! Structured logging initialization.
//!
//! `RUST_LOG` wins over the configured level, so a one-off
//! `RUST_LOG=relay_protocol=trace` session needs no config edit.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LoggingConfig;

/// Initialize the global tracing subscriber from configuration.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .try_init()
        .ok();
}

/// Initialize with defaults, for examples and quick sessions.
pub fn init_default() {
    init(&LoggingConfig::default());
}
