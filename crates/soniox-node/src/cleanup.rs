//! Best-effort removal of server-side resources after a wait

use crate::api::TranscriptionApi;
use crate::error::Result;

/// Output key holding cleanup warnings
pub const DELETE_WARNINGS_KEY: &str = "_deleteWarnings";

/// Resources to remove once a transcription is done with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupTargets {
    pub transcription_id: String,
    /// Set only when the audio was uploaded by this item
    pub file_id: Option<String>,
}

/// Delete the transcription and the uploaded file, if any
///
/// Never fails; every failed deletion becomes a warning string.
pub async fn delete_resources<A>(api: &A, targets: &CleanupTargets) -> Vec<String>
where
    A: TranscriptionApi + ?Sized,
{
    let mut warnings = Vec::new();

    if let Err(e) = api.delete_transcription(&targets.transcription_id).await {
        tracing::warn!(
            transcription_id = %targets.transcription_id,
            error = %e,
            "failed to delete transcription"
        );
        warnings.push(format!(
            "Failed to delete transcription {}: {e}",
            targets.transcription_id
        ));
    }

    if let Some(file_id) = &targets.file_id
        && let Err(e) = api.delete_file(file_id).await
    {
        tracing::warn!(file_id = %file_id, error = %e, "failed to delete uploaded file");
        warnings.push(format!("Failed to delete file {file_id}: {e}"));
    }

    warnings
}

/// Combine the primary result with cleanup warnings
///
/// Warnings travel with a success and are dropped when the primary step
/// failed, so the original error is what the caller sees.
///
/// # Errors
///
/// Returns the primary error unchanged
pub fn settle<T>(primary: Result<T>, warnings: Vec<String>) -> Result<(T, Vec<String>)> {
    match primary {
        Ok(value) => Ok((value, warnings)),
        Err(e) => {
            if !warnings.is_empty() {
                tracing::debug!(count = warnings.len(), "discarding cleanup warnings after failure");
            }
            Err(e)
        }
    }
}
