use std::time::Duration;

use serde::Deserialize;

/// Settings for the outbound HTTP client
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpConfig {
    /// Per-request timeout, e.g. `"120s"` or `"2m"`
    #[serde(default = "default_timeout")]
    pub timeout: String,
    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl HttpConfig {
    /// Parsed request timeout
    ///
    /// # Errors
    ///
    /// Returns an error if `timeout` is not a valid duration string
    pub fn request_timeout(&self) -> anyhow::Result<Duration> {
        duration_str::parse(&self.timeout).map_err(|e| anyhow::anyhow!("invalid http.timeout '{}': {e}", self.timeout))
    }
}

fn default_timeout() -> String {
    "120s".to_string()
}

fn default_user_agent() -> String {
    format!("soniox-flow/{}", env!("CARGO_PKG_VERSION"))
}
