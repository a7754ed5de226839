use serde_json::{Value, json};
use soniox_client::{Transcript, TranscriptionJob};

use crate::cleanup::DELETE_WARNINGS_KEY;
use crate::params::OutputFormat;

/// Shape a finished transcription for output
pub fn shape(format: OutputFormat, job: &TranscriptionJob, transcript: &Transcript) -> Value {
    match format {
        OutputFormat::Full => json!({
            "transcription": job.to_redacted_value(),
            "transcript": transcript,
        }),
        OutputFormat::TextOnly => json!({
            "id": job.id,
            "text": transcript.text,
        }),
    }
}

/// Attach cleanup warnings to an output object; no-op when there are none
pub fn attach_warnings(output: &mut Value, warnings: Vec<String>) {
    if warnings.is_empty() {
        return;
    }
    if let Value::Object(map) = output {
        map.insert(DELETE_WARNINGS_KEY.to_owned(), json!(warnings));
    }
}
