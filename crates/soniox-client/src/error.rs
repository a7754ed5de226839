/// Client-specific result type
pub type Result<T> = std::result::Result<T, SonioxClientError>;

/// Errors from the Soniox client
#[derive(Debug, thiserror::Error)]
pub enum SonioxClientError {
    /// Transport or application failure reported by the API
    ///
    /// `message` is the best human-readable text that could be extracted,
    /// `hint` a short remediation suggestion for known codes and statuses.
    #[error("{message}")]
    Api {
        /// Primary error text
        message: String,
        /// Actionable suggestion, if the failure is a known one
        hint: Option<String>,
        /// HTTP status code, if a response was received
        status: Option<u16>,
        /// Application error code from the response body
        code: Option<String>,
    },

    /// Upload succeeded at transport level but the response had no id
    #[error("upload did not return a file id")]
    MissingFileId,

    /// Failed to parse a successful response
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// Resource id that cannot be used as a single path segment
    #[error("invalid resource id '{0}'")]
    InvalidId(String),

    /// Invalid client configuration
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl SonioxClientError {
    /// Remediation hint, if any
    pub fn hint(&self) -> Option<&str> {
        match self {
            Self::Api { hint, .. } => hint.as_deref(),
            _ => None,
        }
    }

    /// HTTP status code of the failed call, if known
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => *status,
            _ => None,
        }
    }
}
