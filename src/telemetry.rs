//! Structured logging setup.

use crate::config::{LogFormat, LoggingConfig};
use thiserror::Error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;

/// Errors returned while installing the subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The filter directive could not be parsed.
    #[error("invalid log filter {directive:?}: {source}")]
    InvalidFilter {
        /// Rejected directive.
        directive: String,
        /// Parser failure.
        #[source]
        source: ParseError,
    },
}

/// Builds the event filter, preferring `RUST_LOG` over the configured
/// directive.
///
/// # Errors
///
/// Returns [`TelemetryError::InvalidFilter`] when the configured directive
/// cannot be parsed.
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter, TelemetryError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.filter).map_err(|source| TelemetryError::InvalidFilter {
        directive: config.filter.clone(),
        source,
    })
}

/// Installs the global `tracing` subscriber.
///
/// Returns `false` when a subscriber was already installed; the existing
/// one stays in place.
///
/// # Errors
///
/// Returns [`TelemetryError::InvalidFilter`] when the configured directive
/// cannot be parsed.
pub fn init_tracing(config: &LoggingConfig) -> Result<bool, TelemetryError> {
    let filter = build_filter(config)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    let installed = match config.format {
        LogFormat::Pretty => builder.pretty().try_init().is_ok(),
        LogFormat::Json => builder.json().try_init().is_ok(),
    };
    Ok(installed)
}
