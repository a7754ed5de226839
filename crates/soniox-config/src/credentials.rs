use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Default Soniox API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.soniox.com";

/// Credentials used to authenticate against the Soniox API
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CredentialsConfig {
    /// API key sent as a bearer token
    pub api_key: SecretString,
    /// Base URL override, e.g. for a regional or mock endpoint
    #[serde(default = "default_base_url")]
    pub base_url: Url,
}

impl CredentialsConfig {
    /// Credentials for the default endpoint
    pub fn new(api_key: SecretString) -> Self {
        Self {
            api_key,
            base_url: default_base_url(),
        }
    }
}

#[allow(clippy::expect_used)]
fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).expect("default base URL must parse")
}
