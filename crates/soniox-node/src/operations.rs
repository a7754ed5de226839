//! The three transcription operations
//!
//! Each operation returns the JSON of its output item, or
//! [`Outcome::Aborted`] when the execution was cancelled mid-wait.

use std::collections::BTreeMap;

use serde_json::{Value, json};
use soniox_client::TranscriptionJob;
use tokio_util::sync::CancellationToken;

use crate::api::TranscriptionApi;
use crate::assemble::{AudioReference, direct_audio, prepare};
use crate::binary::{BinaryData, binary_upload};
use crate::cleanup::{CleanupTargets, delete_resources, settle};
use crate::error::{NodeError, Result};
use crate::output::{attach_warnings, shape};
use crate::params::{CreateParameters, DeleteParameters, GetResultsParameters, OutputFormat};
use crate::poll::{PollOutcome, PollSettings, wait_for_transcript};

/// Result of a single operation
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Output JSON for the item
    Done(Value),
    /// Cancelled while waiting; remaining work is skipped
    Aborted,
}

/// Create a transcription, optionally uploading, waiting and cleaning up
///
/// # Errors
///
/// Returns a validation error before any network call when the parameters
/// are unusable, and the upload, API or poll error otherwise
pub async fn create<A>(
    api: &A,
    params: &CreateParameters,
    binaries: &BTreeMap<String, BinaryData>,
    cancel: &CancellationToken,
) -> Result<Outcome>
where
    A: TranscriptionApi + ?Sized,
{
    let prepared = prepare(params)?;

    let (audio, uploaded_file_id) = match direct_audio(params)? {
        Some(audio) => (audio, None),
        None => {
            if params.binary_property.trim().is_empty() {
                return Err(NodeError::validation(
                    "Binary property is required when the audio source is 'binary'",
                ));
            }
            let upload = binary_upload(binaries, &params.binary_property)?;
            tracing::debug!(
                bytes = upload.data.len(),
                file_name = upload.file_name.as_deref().unwrap_or_default(),
                "uploading audio"
            );
            let file = api.upload_file(upload).await?;
            (AudioReference::file(file.id.clone()), Some(file.id))
        }
    };

    let request = prepared.with_audio(audio)?;
    let job = api.create_transcription(&request).await?;
    tracing::info!(transcription_id = %job.id, model = %request.model, "transcription created");

    if !params.wait.wait_for_completion {
        return Ok(Outcome::Done(job.to_redacted_value()));
    }

    let polled = match wait_for_transcript(api, &job.id, PollSettings::from(&params.wait), cancel).await {
        Ok(PollOutcome::Aborted) => return Ok(Outcome::Aborted),
        Ok(PollOutcome::Completed { job, transcript }) => Ok((job, transcript)),
        Err(e) => Err(e),
    };

    let warnings = if params.delete_after_completion {
        let targets = CleanupTargets {
            transcription_id: job.id.clone(),
            file_id: uploaded_file_id,
        };
        delete_resources(api, &targets).await
    } else {
        Vec::new()
    };

    let ((finished, transcript), warnings) = settle(polled, warnings)?;

    let mut output = shape(params.wait.output, &finished, &transcript);
    attach_warnings(&mut output, warnings);
    Ok(Outcome::Done(output))
}

/// Fetch the status and transcript of an existing transcription
///
/// # Errors
///
/// Returns a validation error for a blank id, `JobFailed` for a failed job
/// and the API or poll error otherwise
pub async fn get_results<A>(api: &A, params: &GetResultsParameters, cancel: &CancellationToken) -> Result<Outcome>
where
    A: TranscriptionApi + ?Sized,
{
    let id = transcription_id(&params.transcription_id)?;

    if params.wait.wait_for_completion {
        return match wait_for_transcript(api, id, PollSettings::from(&params.wait), cancel).await? {
            PollOutcome::Completed { job, transcript } => Ok(Outcome::Done(shape(params.wait.output, &job, &transcript))),
            PollOutcome::Aborted => Ok(Outcome::Aborted),
        };
    }

    let job = api.get_transcription(id).await?;
    current_results(api, job, params.wait.output).await.map(Outcome::Done)
}

async fn current_results<A>(api: &A, job: TranscriptionJob, format: OutputFormat) -> Result<Value>
where
    A: TranscriptionApi + ?Sized,
{
    if job.is_completed() {
        let transcript = api.get_transcript(&job.id).await?;
        return Ok(shape(format, &job, &transcript));
    }

    if job.is_error() {
        return Err(NodeError::JobFailed {
            id: job.id,
            message: job.error_message,
        });
    }

    tracing::debug!(transcription_id = %job.id, status = %job.status, "transcription not finished yet");
    Ok(job.to_redacted_value())
}

/// Delete a transcription and the file it was created from
///
/// # Errors
///
/// Returns an error when the job lookup or the transcription deletion
/// fails; a failed file deletion only adds a warning
pub async fn delete<A>(api: &A, params: &DeleteParameters) -> Result<Outcome>
where
    A: TranscriptionApi + ?Sized,
{
    let id = transcription_id(&params.transcription_id)?;

    let job = api.get_transcription(id).await?;
    api.delete_transcription(id).await?;
    tracing::info!(transcription_id = id, "transcription deleted");

    let mut warnings = Vec::new();
    let mut file_deleted = false;

    if let Some(file_id) = job.file_id.as_deref().map(str::trim).filter(|f| !f.is_empty()) {
        match api.delete_file(file_id).await {
            Ok(()) => file_deleted = true,
            Err(e) => {
                tracing::warn!(file_id, error = %e, "failed to delete file");
                warnings.push(format!("Failed to delete file {file_id}: {e}"));
            }
        }
    }

    let mut output = json!({
        "id": id,
        "deleted": true,
        "file_deleted": file_deleted,
    });
    attach_warnings(&mut output, warnings);
    Ok(Outcome::Done(output))
}

fn transcription_id(raw: &str) -> Result<&str> {
    let id = raw.trim();
    if id.is_empty() {
        return Err(NodeError::validation("Transcription ID is required"));
    }
    Ok(id)
}
