#![allow(clippy::must_use_candidate)]

pub mod credentials;
mod env;
pub mod http;
mod loader;
pub mod telemetry;

use serde::Deserialize;

pub use credentials::*;
pub use http::*;
pub use telemetry::{LogFormat, TelemetryConfig};

/// Top-level soniox-flow configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Soniox API credentials
    pub credentials: CredentialsConfig,
    /// Outbound HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,
    /// Logging configuration
    #[serde(default)]
    pub telemetry: Option<TelemetryConfig>,
}
