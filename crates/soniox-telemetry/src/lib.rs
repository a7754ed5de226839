#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

//! Logging setup for soniox-flow
//!
//! Installs a `tracing-subscriber` registry with an `EnvFilter` and a fmt
//! layer. Log lines go to stderr; stdout is reserved for output items.

use soniox_config::{LogFormat, TelemetryConfig};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when neither the caller nor the config provide one
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Initialize logging from configuration
///
/// The filter is taken from `log_filter` when given, then `RUST_LOG`, then
/// the config, falling back to [`DEFAULT_LOG_FILTER`].
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed
pub fn init(config: Option<&TelemetryConfig>, log_filter: Option<&str>) -> anyhow::Result<()> {
    let directive = filter_directive(config, log_filter);
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let format = config.map(|c| c.format).unwrap_or_default();

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    match format {
        LogFormat::Text => tracing_subscriber::registry().with(filter).with(fmt_layer).try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json().flatten_event(true))
            .try_init(),
    }
    .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}

fn filter_directive(config: Option<&TelemetryConfig>, log_filter: Option<&str>) -> String {
    if let Some(filter) = log_filter.map(str::trim).filter(|f| !f.is_empty()) {
        return filter.to_owned();
    }

    if let Ok(filter) = std::env::var(EnvFilter::DEFAULT_ENV)
        && !filter.trim().is_empty()
    {
        return filter;
    }

    config.map_or_else(|| DEFAULT_LOG_FILTER.to_owned(), |c| c.log_filter.clone())
}
