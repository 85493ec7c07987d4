//! Tracing setup for the `speculate` binary
//!
//! Diagnostics go to stderr so stdout carries only progress lines and the
//! report.

use tracing_subscriber::EnvFilter;

/// Filter used when neither `--log-level` nor `RUST_LOG` is set
pub const DEFAULT_FILTER: &str = "warn";

/// Resolve the filter: explicit level, then `RUST_LOG`, then [`DEFAULT_FILTER`]
///
/// # Errors
/// Returns an error if the explicit level is not a valid filter directive.
pub fn filter(level: Option<&str>) -> anyhow::Result<EnvFilter> {
    match level {
        Some(level) => Ok(EnvFilter::try_new(level)?),
        None => Ok(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))),
    }
}

/// Argument parser for `--log-level`: accepts any valid filter directive
///
/// # Errors
/// Returns the directive parse error as text.
pub fn parse_level(level: &str) -> Result<String, String> {
    filter(Some(level))
        .map(|_| level.to_string())
        .map_err(|err| err.to_string())
}

/// Install the global subscriber
///
/// # Errors
/// Returns an error if the filter is invalid or a subscriber is already set.
pub fn init(level: Option<&str>) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(filter(level)?)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init()
        .map_err(|err| anyhow::anyhow!(err))
}
