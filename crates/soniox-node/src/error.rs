use soniox_client::SonioxClientError;

/// Node result type
pub type Result<T> = std::result::Result<T, NodeError>;

/// Failure of a single item
///
/// Every variant renders a short message through `Display`;
/// [`NodeError::description`] adds the longer actionable text when there
/// is one.
#[derive(Debug, thiserror::Error)]
pub enum NodeError {
    /// Missing or conflicting parameters, raised before any network call
    #[error("{0}")]
    Validation(String),

    /// The upload went through but no file id came back
    #[error("{0}")]
    Upload(String),

    /// Transport or application failure from the Soniox API
    #[error("{message}")]
    Api {
        message: String,
        hint: Option<String>,
        status: Option<u16>,
    },

    /// The job reached the `error` state
    #[error("Transcription {id} failed: {}", .message.as_deref().unwrap_or("no error message provided"))]
    JobFailed { id: String, message: Option<String> },

    /// The job was still running when the wait deadline passed
    #[error("Timed out after {waited_secs}s waiting for transcription {id} (last status: {last_status})")]
    PollTimeout {
        id: String,
        last_status: String,
        waited_secs: u64,
    },
}

impl NodeError {
    /// Shorthand for a validation failure
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Short user-visible message
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Longer actionable description, if any
    pub fn description(&self) -> Option<&str> {
        match self {
            Self::Api { hint, .. } => hint.as_deref(),
            Self::Upload(_) => Some("The file upload response did not include an id. Try the upload again."),
            Self::JobFailed { .. } => {
                Some("Check that the audio is a supported format and that the options match the chosen model.")
            }
            Self::PollTimeout { .. } => Some(
                "Increase the maximum wait time, or fetch the results later with the get results operation.",
            ),
            Self::Validation(_) => None,
        }
    }
}

impl From<SonioxClientError> for NodeError {
    fn from(error: SonioxClientError) -> Self {
        match error {
            SonioxClientError::Api {
                message, hint, status, ..
            } => Self::Api { message, hint, status },
            SonioxClientError::MissingFileId => Self::Upload(error.to_string()),
            SonioxClientError::InvalidId(_) => Self::Validation(error.to_string()),
            SonioxClientError::Parse(_) | SonioxClientError::Config(_) => Self::Api {
                message: error.to_string(),
                hint: None,
                status: None,
            },
        }
    }
}
