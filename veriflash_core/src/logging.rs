//! Logging infrastructure for VeriFlash.
//!
//! Provides centralized tracing setup for the binaries.

use tracing_subscriber::{fmt, prelude::*, reload, EnvFilter, Registry};

/// Handle for changing the log filter after startup
pub type LogHandle = reload::Handle<EnvFilter, Registry>;

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Initialize logging with a specific default level
///
/// # Arguments
/// * `default_level` - Default log level (debug, info, warn, error)
///
/// Output goes to stderr; stdout belongs to the quiz prompts.
/// This can still be overridden by RUST_LOG environment variable.
pub fn init_with_level(default_level: &str) -> LogHandle {
    let (filter, handle) = reload::Layer::new(env_filter(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();

    handle
}

/// Replace the default level once the config file has been read
///
/// RUST_LOG still takes precedence.
pub fn set_default_level(handle: &LogHandle, default_level: &str) {
    if let Err(e) = handle.reload(env_filter(default_level)) {
        tracing::warn!("Failed to apply log level '{}': {}", default_level, e);
    }
}

/// Initialize logging for testing (captures logs for test output)
#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::new("debug"))
        .try_init();
}
