use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Job status reported once a transcription has finished successfully
pub const STATUS_COMPLETED: &str = "completed";

/// Job status reported when a transcription failed server-side
pub const STATUS_ERROR: &str = "error";

// -- Transcription request --

/// Body of `POST /v1/transcriptions`
///
/// Optional fields are skipped entirely when unset: the API treats an absent
/// field differently from an explicit default.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriptionRequest {
    /// Model identifier, e.g. `stt-async-preview`
    pub model: String,
    /// Where the audio comes from
    #[serde(flatten)]
    pub audio: AudioSource,
    /// Expected languages, in order of preference
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub language_hints: Vec<String>,
    /// Restrict recognition to the hinted languages
    #[serde(skip_serializing_if = "is_false")]
    pub language_hints_strict: bool,
    /// Tag tokens with their detected language
    #[serde(skip_serializing_if = "is_false")]
    pub enable_language_identification: bool,
    /// Tag tokens with speaker numbers
    #[serde(skip_serializing_if = "is_false")]
    pub enable_speaker_diarization: bool,
    /// Domain context to improve accuracy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Context>,
    /// Caller-supplied correlation id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_reference_id: Option<String>,
    /// URL notified when the job finishes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    /// Header name sent with the webhook call
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_auth_header_name: Option<String>,
    /// Header value sent with the webhook call
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_auth_header_value: Option<String>,
    /// Translation settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translation: Option<Translation>,
}

impl TranscriptionRequest {
    /// Minimal request with only a model and an audio source
    pub fn new(model: impl Into<String>, audio: AudioSource) -> Self {
        Self {
            model: model.into(),
            audio,
            language_hints: Vec::new(),
            language_hints_strict: false,
            enable_language_identification: false,
            enable_speaker_diarization: false,
            context: None,
            client_reference_id: None,
            webhook_url: None,
            webhook_auth_header_name: None,
            webhook_auth_header_value: None,
            translation: None,
        }
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
const fn is_false(value: &bool) -> bool {
    !*value
}

/// Audio source of a transcription, serialized as either `audio_url` or `file_id`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioSource {
    /// Publicly reachable URL the service downloads itself
    AudioUrl(String),
    /// Id of a file previously uploaded through `POST /v1/files`
    FileId(String),
}

/// Transcription context
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Context {
    /// Free text describing the audio
    Text(String),
    /// Structured context object (general key/values, terms, ...)
    Structured(Map<String, Value>),
}

/// Translation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Translation {
    /// Translate everything into one target language
    OneWay { target_language: String },
    /// Translate between two languages in both directions
    TwoWay { language_a: String, language_b: String },
}

// -- Remote entities --

/// Transcription job as returned by create and status calls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptionJob {
    /// Opaque job id
    pub id: String,
    /// Lifecycle status (`queued`, `processing`, `completed`, `error`, ...)
    #[serde(default)]
    pub status: String,
    /// Server error description when `status` is `error`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Uploaded file the job was created from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,
    /// Every other field, kept for output
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TranscriptionJob {
    /// Whether the job finished successfully
    pub fn is_completed(&self) -> bool {
        self.status == STATUS_COMPLETED
    }

    /// Whether the job failed server-side
    pub fn is_error(&self) -> bool {
        self.status == STATUS_ERROR
    }

    /// JSON form of the job with the webhook secret redacted
    pub fn to_redacted_value(&self) -> Value {
        let value = serde_json::to_value(self).unwrap_or(Value::Null);
        crate::redact::redact_webhook_secret(&value).into_owned()
    }
}

/// Transcript of a completed job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    /// Full transcript text
    #[serde(default)]
    pub text: String,
    /// Tokens and any other metadata
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

/// File stored by the service after an upload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadedFile {
    /// Opaque file id
    pub id: String,
    /// Remaining response fields
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

/// Local audio to upload
#[derive(Debug, Clone)]
pub struct FileUpload {
    /// Raw bytes
    pub data: Vec<u8>,
    /// Original file name, if known
    pub file_name: Option<String>,
    /// MIME type, if known
    pub mime_type: Option<String>,
}
