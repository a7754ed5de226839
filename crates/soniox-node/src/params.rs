//! Per-item node parameters
//!
//! Parameters are resolved once per item, before any business logic runs:
//! node-level defaults are overlaid with the item's own `parameters` object
//! and deserialized into [`NodeParameters`]. Every optional field has an
//! enumerated default.

use std::time::Duration;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{NodeError, Result};

/// Key under an item's JSON holding per-item parameter overrides
pub const ITEM_PARAMETERS_KEY: &str = "parameters";

/// Fully resolved parameters for one item
#[derive(Debug, Clone, Deserialize)]
pub struct NodeParameters {
    #[serde(default)]
    pub resource: Resource,
    #[serde(flatten)]
    pub operation: Operation,
}

impl NodeParameters {
    /// Overlay item parameters on the node defaults and parse them
    ///
    /// # Errors
    ///
    /// Returns a validation error if the merged parameters do not describe
    /// a known operation with well-typed fields
    pub fn resolve(defaults: &Map<String, Value>, item_json: &Map<String, Value>) -> Result<Self> {
        let mut merged = defaults.clone();

        match item_json.get(ITEM_PARAMETERS_KEY) {
            Some(Value::Object(overrides)) => {
                merged.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
            }
            Some(Value::Null) | None => {}
            Some(_) => {
                return Err(NodeError::validation("Item 'parameters' must be a JSON object"));
            }
        }

        serde_json::from_value(Value::Object(merged))
            .map_err(|e| NodeError::validation(format!("Invalid node parameters: {e}")))
    }
}

/// Resource the operation acts on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    #[default]
    Transcription,
}

/// Operation selector with its parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum Operation {
    /// Create a transcription, optionally waiting and cleaning up
    Create(CreateParameters),
    /// Fetch status and transcript of an existing transcription
    #[serde(alias = "getResults")]
    GetResults(GetResultsParameters),
    /// Delete a transcription and its file
    Delete(DeleteParameters),
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Create(_) => "create",
            Self::GetResults(_) => "get_results",
            Self::Delete(_) => "delete",
        }
    }
}

// -- Create --

#[derive(Debug, Clone, Deserialize)]
pub struct CreateParameters {
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub audio_source: AudioSourceKind,
    #[serde(default)]
    pub audio_url: String,
    #[serde(default = "default_binary_property")]
    pub binary_property: String,
    #[serde(default)]
    pub file_id: String,
    #[serde(default)]
    pub language_hints: Vec<LanguageHint>,
    #[serde(default)]
    pub language_hints_strict: bool,
    #[serde(default)]
    pub enable_language_identification: bool,
    #[serde(default)]
    pub enable_speaker_diarization: bool,
    #[serde(default)]
    pub context_mode: ContextMode,
    #[serde(default)]
    pub context_text: String,
    /// Structured context: a JSON object, or text holding one
    #[serde(default)]
    pub context_structured: Value,
    #[serde(default)]
    pub client_reference_id: String,
    #[serde(default)]
    pub webhook_url: String,
    #[serde(default)]
    pub webhook_auth_header_name: String,
    #[serde(default)]
    pub webhook_auth_header_value: String,
    #[serde(default)]
    pub translation: TranslationMode,
    #[serde(default)]
    pub target_language: String,
    #[serde(default)]
    pub language_a: String,
    #[serde(default)]
    pub language_b: String,
    #[serde(flatten)]
    pub wait: WaitParameters,
    /// Delete the transcription (and uploaded file) once results are in
    #[serde(default)]
    pub delete_after_completion: bool,
}

/// Where the audio of a new transcription comes from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioSourceKind {
    /// Public URL
    #[default]
    Url,
    /// Binary property of the input item, uploaded first
    Binary,
    /// File already uploaded to Soniox
    #[serde(alias = "fileId")]
    FileId,
}

/// One entry of the language hints list
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LanguageHint {
    #[serde(default)]
    pub code: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextMode {
    #[default]
    None,
    Text,
    Structured,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranslationMode {
    #[default]
    None,
    #[serde(alias = "oneWay")]
    OneWay,
    #[serde(alias = "twoWay")]
    TwoWay,
}

// -- Get results --

#[derive(Debug, Clone, Deserialize)]
pub struct GetResultsParameters {
    #[serde(default)]
    pub transcription_id: String,
    #[serde(flatten)]
    pub wait: WaitParameters,
}

// -- Delete --

#[derive(Debug, Clone, Deserialize)]
pub struct DeleteParameters {
    #[serde(default)]
    pub transcription_id: String,
}

// -- Shared --

/// Waiting and output options shared by create and get results
#[derive(Debug, Clone, Deserialize)]
pub struct WaitParameters {
    #[serde(default = "default_wait_for_completion")]
    pub wait_for_completion: bool,
    #[serde(default = "default_poll_interval_seconds")]
    pub poll_interval_seconds: u64,
    #[serde(default = "default_max_wait_seconds")]
    pub max_wait_seconds: u64,
    #[serde(default)]
    pub output: OutputFormat,
}

impl Default for WaitParameters {
    fn default() -> Self {
        Self {
            wait_for_completion: default_wait_for_completion(),
            poll_interval_seconds: default_poll_interval_seconds(),
            max_wait_seconds: default_max_wait_seconds(),
            output: OutputFormat::default(),
        }
    }
}

impl WaitParameters {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_seconds)
    }

    pub fn max_wait(&self) -> Duration {
        Duration::from_secs(self.max_wait_seconds)
    }
}

/// Shape of a finished result
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Job plus full transcript with tokens
    #[default]
    Full,
    /// Job id and transcript text only
    #[serde(alias = "textOnly", alias = "text")]
    TextOnly,
}

fn default_binary_property() -> String {
    "data".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_wait_for_completion() -> bool {
    true
}

#[allow(clippy::missing_const_for_fn)]
fn default_poll_interval_seconds() -> u64 {
    5
}

#[allow(clippy::missing_const_for_fn)]
fn default_max_wait_seconds() -> u64 {
    300
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn create_defaults() {
        let params = NodeParameters::resolve(&object(json!({"operation": "create", "model": "m"})), &Map::new()).unwrap();

        let Operation::Create(create) = params.operation else {
            panic!("expected create");
        };
        assert_eq!(params.resource, Resource::Transcription);
        assert_eq!(create.audio_source, AudioSourceKind::Url);
        assert_eq!(create.binary_property, "data");
        assert_eq!(create.context_mode, ContextMode::None);
        assert_eq!(create.translation, TranslationMode::None);
        assert!(create.wait.wait_for_completion);
        assert_eq!(create.wait.poll_interval(), Duration::from_secs(5));
        assert_eq!(create.wait.max_wait(), Duration::from_secs(300));
        assert_eq!(create.wait.output, OutputFormat::Full);
        assert!(!create.delete_after_completion);
    }

    #[test]
    fn item_parameters_override_node_defaults() {
        let defaults = object(json!({"operation": "create", "model": "a", "audio_url": "https://x/1.mp3"}));
        let item = object(json!({"parameters": {"model": "b", "max_wait_seconds": 20}}));

        let params = NodeParameters::resolve(&defaults, &item).unwrap();

        let Operation::Create(create) = params.operation else {
            panic!("expected create");
        };
        assert_eq!(create.model, "b");
        assert_eq!(create.audio_url, "https://x/1.mp3");
        assert_eq!(create.wait.max_wait_seconds, 20);
    }

    #[test]
    fn camel_case_aliases_are_accepted() {
        let defaults = object(json!({
            "operation": "getResults",
            "transcription_id": "t-1",
            "output": "textOnly"
        }));

        let params = NodeParameters::resolve(&defaults, &Map::new()).unwrap();

        let Operation::GetResults(get) = params.operation else {
            panic!("expected get_results");
        };
        assert_eq!(get.transcription_id, "t-1");
        assert_eq!(get.wait.output, OutputFormat::TextOnly);
    }

    #[test]
    fn unknown_operation_is_a_validation_error() {
        let err = NodeParameters::resolve(&object(json!({"operation": "translate"})), &Map::new()).unwrap_err();
        assert!(matches!(err, NodeError::Validation(_)));
    }

    #[test]
    fn non_object_item_parameters_are_rejected() {
        let defaults = object(json!({"operation": "delete"}));
        let item = object(json!({"parameters": [1, 2]}));

        let err = NodeParameters::resolve(&defaults, &item).unwrap_err();
        assert!(err.message().contains("must be a JSON object"));
    }

    #[test]
    fn language_hint_entries_parse() {
        let defaults = object(json!({
            "operation": "create",
            "language_hints": [{"code": "en"}, {"code": " "}, {}]
        }));

        let Operation::Create(create) = NodeParameters::resolve(&defaults, &Map::new()).unwrap().operation else {
            panic!("expected create");
        };
        assert_eq!(create.language_hints.len(), 3);
        assert_eq!(create.language_hints[0].code, "en");
    }
}
