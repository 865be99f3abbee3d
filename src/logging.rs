// src/logging.rs - Tracing subscriber setup

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{Error, Result};

/// Default filter when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "info,soleline=debug";

/// Installs the global tracing subscriber.
///
/// The filter comes from `RUST_LOG` when set, otherwise
/// [`DEFAULT_LOG_FILTER`]. Fails if a subscriber is already installed.
pub fn init() -> Result<()> {
    init_with_filter(DEFAULT_LOG_FILTER)
}

/// Installs the global tracing subscriber with an explicit fallback filter
pub fn init_with_filter(fallback: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .map_err(|e| Error::config(format!("Invalid log filter: {e}")))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init()
        .map_err(|e| Error::config(format!("Failed to install subscriber: {e}")))?;

    tracing::debug!("Logging initialized");
    Ok(())
}
