use async_trait::async_trait;
use soniox_client::{FileUpload, SonioxClient, Transcript, TranscriptionJob, TranscriptionRequest, UploadedFile};

/// Remote calls the orchestrator needs
///
/// Implemented by [`SonioxClient`]; tests substitute scripted fakes.
#[async_trait]
pub trait TranscriptionApi: Send + Sync {
    async fn upload_file(&self, upload: FileUpload) -> soniox_client::Result<UploadedFile>;

    async fn create_transcription(&self, request: &TranscriptionRequest) -> soniox_client::Result<TranscriptionJob>;

    async fn get_transcription(&self, id: &str) -> soniox_client::Result<TranscriptionJob>;

    async fn get_transcript(&self, id: &str) -> soniox_client::Result<Transcript>;

    async fn delete_transcription(&self, id: &str) -> soniox_client::Result<()>;

    async fn delete_file(&self, id: &str) -> soniox_client::Result<()>;
}

#[async_trait]
impl TranscriptionApi for SonioxClient {
    async fn upload_file(&self, upload: FileUpload) -> soniox_client::Result<UploadedFile> {
        Self::upload_file(self, upload).await
    }

    async fn create_transcription(&self, request: &TranscriptionRequest) -> soniox_client::Result<TranscriptionJob> {
        Self::create_transcription(self, request).await
    }

    async fn get_transcription(&self, id: &str) -> soniox_client::Result<TranscriptionJob> {
        Self::get_transcription(self, id).await
    }

    async fn get_transcript(&self, id: &str) -> soniox_client::Result<Transcript> {
        Self::get_transcript(self, id).await
    }

    async fn delete_transcription(&self, id: &str) -> soniox_client::Result<()> {
        Self::delete_transcription(self, id).await
    }

    async fn delete_file(&self, id: &str) -> soniox_client::Result<()> {
        Self::delete_file(self, id).await
    }
}
