//! Parameter assembler: create parameters to a validated request body

use serde_json::{Map, Value};
use soniox_client::{AudioSource, Context, TranscriptionRequest, Translation};

use crate::error::{NodeError, Result};
use crate::params::{AudioSourceKind, ContextMode, CreateParameters, LanguageHint, TranslationMode};

/// Audio location handed to the assembler; exactly one side must be set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AudioReference {
    pub audio_url: Option<String>,
    pub file_id: Option<String>,
}

impl AudioReference {
    pub fn url(url: impl Into<String>) -> Self {
        Self {
            audio_url: Some(url.into()),
            file_id: None,
        }
    }

    pub fn file(id: impl Into<String>) -> Self {
        Self {
            audio_url: None,
            file_id: Some(id.into()),
        }
    }

    fn into_source(self) -> Result<AudioSource> {
        match (non_blank(self.audio_url), non_blank(self.file_id)) {
            (Some(url), None) => Ok(AudioSource::AudioUrl(url)),
            (None, Some(id)) => Ok(AudioSource::FileId(id)),
            (Some(_), Some(_)) => Err(NodeError::validation(
                "Provide either an audio URL or a file id, not both",
            )),
            (None, None) => Err(NodeError::validation("An audio URL or a file id is required")),
        }
    }
}

/// Request with every option validated, waiting for its audio source
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    request: TranscriptionRequest,
}

impl PreparedRequest {
    /// Attach the audio source and finish the request
    ///
    /// # Errors
    ///
    /// Returns a validation error unless exactly one of URL and file id is set
    pub fn with_audio(self, audio: AudioReference) -> Result<TranscriptionRequest> {
        let mut request = self.request;
        request.audio = audio.into_source()?;
        Ok(request)
    }
}

/// Validate every option except the audio source
///
/// Runs before any upload so bad parameters never cost a network call.
///
/// # Errors
///
/// Returns a validation error for a blank model, incomplete translation
/// settings or unusable structured context
pub fn prepare(params: &CreateParameters) -> Result<PreparedRequest> {
    let model = params.model.trim();
    if model.is_empty() {
        return Err(NodeError::validation("Model is required"));
    }

    // placeholder until `with_audio`
    let mut request = TranscriptionRequest::new(model, AudioSource::FileId(String::new()));

    request.language_hints = language_hints(&params.language_hints);
    request.language_hints_strict = params.language_hints_strict;
    request.enable_language_identification = params.enable_language_identification;
    request.enable_speaker_diarization = params.enable_speaker_diarization;
    request.context = context(params)?;
    request.client_reference_id = optional(&params.client_reference_id);
    request.webhook_url = optional(&params.webhook_url);
    request.webhook_auth_header_name = optional(&params.webhook_auth_header_name);
    request.webhook_auth_header_value = optional(&params.webhook_auth_header_value);
    request.translation = translation(params)?;

    Ok(PreparedRequest { request })
}

/// Validate everything and build the request in one go
///
/// # Errors
///
/// Returns a validation error for any invalid or conflicting parameter
pub fn assemble(params: &CreateParameters, audio: AudioReference) -> Result<TranscriptionRequest> {
    prepare(params)?.with_audio(audio)
}

/// Audio reference for sources that need no upload
///
/// # Errors
///
/// Returns a validation error when the selected source field is blank
pub fn direct_audio(params: &CreateParameters) -> Result<Option<AudioReference>> {
    match params.audio_source {
        AudioSourceKind::Url => non_blank(Some(params.audio_url.clone()))
            .map(|url| Some(AudioReference::url(url)))
            .ok_or_else(|| NodeError::validation("Audio URL is required when the audio source is 'url'")),
        AudioSourceKind::FileId => non_blank(Some(params.file_id.clone()))
            .map(|id| Some(AudioReference::file(id)))
            .ok_or_else(|| NodeError::validation("File ID is required when the audio source is 'file_id'")),
        AudioSourceKind::Binary => Ok(None),
    }
}

/// Codes in entry order, blank ones dropped
pub fn language_hints(entries: &[LanguageHint]) -> Vec<String> {
    entries
        .iter()
        .map(|entry| entry.code.trim())
        .filter(|code| !code.is_empty())
        .map(str::to_owned)
        .collect()
}

fn context(params: &CreateParameters) -> Result<Option<Context>> {
    match params.context_mode {
        ContextMode::None => Ok(None),
        ContextMode::Text => Ok(optional(&params.context_text).map(Context::Text)),
        ContextMode::Structured => structured_context(&params.context_structured).map(|c| c.map(Context::Structured)),
    }
}

/// Structured context from a JSON object or from text holding one
///
/// Blank text and null mean "no context".
///
/// # Errors
///
/// Returns a validation error for invalid JSON or a non-object value
pub fn structured_context(value: &Value) -> Result<Option<Map<String, Value>>> {
    let parsed = match value {
        Value::Null => return Ok(None),
        Value::String(text) if text.trim().is_empty() => return Ok(None),
        Value::String(text) => serde_json::from_str::<Value>(text)
            .map_err(|e| NodeError::validation(format!("Structured context is not valid JSON: {e}")))?,
        other => other.clone(),
    };

    match parsed {
        Value::Object(map) => Ok(Some(map)),
        other => Err(NodeError::validation(format!(
            "Structured context must be a JSON object, not {}",
            kind_of(&other)
        ))),
    }
}

fn translation(params: &CreateParameters) -> Result<Option<Translation>> {
    match params.translation {
        TranslationMode::None => Ok(None),
        TranslationMode::OneWay => {
            let target_language = optional(&params.target_language)
                .ok_or_else(|| NodeError::validation("Target language is required for one-way translation"))?;
            Ok(Some(Translation::OneWay { target_language }))
        }
        TranslationMode::TwoWay => match (optional(&params.language_a), optional(&params.language_b)) {
            (Some(language_a), Some(language_b)) => Ok(Some(Translation::TwoWay { language_a, language_b })),
            _ => Err(NodeError::validation(
                "Both language A and language B are required for two-way translation",
            )),
        },
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Array(_) => "an array",
        Value::String(_) => "a string",
        Value::Number(_) => "a number",
        Value::Bool(_) => "a boolean",
        Value::Null => "null",
        Value::Object(_) => "an object",
    }
}

fn optional(value: &str) -> Option<String> {
    non_blank(Some(value.to_owned()))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}
