//! Structured logging with tracing

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Initialize structured logging for the process.
///
/// `default_level` is used when `RUST_LOG` is not set, e.g. `"info"` or
/// `"savvy_core=debug"`.
pub fn init_tracing(default_level: &str) -> Result<(), String> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| format!("Invalid log filter directive: {}", e))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).compact())
        .try_init()
        .map_err(|e| format!("Failed to install tracing subscriber: {}", e))?;

    Ok(())
}
