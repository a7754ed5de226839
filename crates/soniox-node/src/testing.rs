//! Scripted in-memory `TranscriptionApi` for unit tests

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use serde_json::{Map, Value, json};
use soniox_client::{
    FileUpload, SonioxClientError, Transcript, TranscriptionJob, TranscriptionRequest, UploadedFile,
};

use crate::api::TranscriptionApi;

pub struct ScriptedApi {
    /// Statuses returned by successive status checks; the last one repeats
    statuses: Mutex<VecDeque<String>>,
    error_message: Option<String>,
    job_file_id: Option<String>,
    fail_delete_transcription: bool,
    fail_delete_file: bool,
    fail_status: bool,
    pub status_checks: AtomicU32,
    pub transcript_fetches: AtomicU32,
    pub uploads: AtomicU32,
    pub deleted_transcriptions: Mutex<Vec<String>>,
    pub deleted_files: Mutex<Vec<String>>,
    pub created: Mutex<Vec<Value>>,
}

impl ScriptedApi {
    pub fn with_statuses(statuses: &[&str]) -> Self {
        Self {
            statuses: Mutex::new(statuses.iter().map(|s| (*s).to_owned()).collect()),
            error_message: None,
            job_file_id: None,
            fail_delete_transcription: false,
            fail_delete_file: false,
            fail_status: false,
            status_checks: AtomicU32::new(0),
            transcript_fetches: AtomicU32::new(0),
            uploads: AtomicU32::new(0),
            deleted_transcriptions: Mutex::new(Vec::new()),
            deleted_files: Mutex::new(Vec::new()),
            created: Mutex::new(Vec::new()),
        }
    }

    pub fn error_message(mut self, message: &str) -> Self {
        self.error_message = Some(message.to_owned());
        self
    }

    pub fn job_file_id(mut self, file_id: &str) -> Self {
        self.job_file_id = Some(file_id.to_owned());
        self
    }

    pub const fn failing_transcription_delete(mut self) -> Self {
        self.fail_delete_transcription = true;
        self
    }

    pub const fn failing_file_delete(mut self) -> Self {
        self.fail_delete_file = true;
        self
    }

    pub const fn failing_status(mut self) -> Self {
        self.fail_status = true;
        self
    }

    pub fn checks(&self) -> u32 {
        self.status_checks.load(Ordering::SeqCst)
    }

    fn next_status(&self) -> String {
        let mut statuses = self.statuses.lock().unwrap();
        if statuses.len() > 1 {
            statuses.pop_front().unwrap()
        } else {
            statuses.front().cloned().unwrap_or_else(|| "processing".to_owned())
        }
    }

    fn job(&self, id: &str, status: String) -> TranscriptionJob {
        TranscriptionJob {
            id: id.to_owned(),
            error_message: (status == "error").then(|| self.error_message.clone()).flatten(),
            status,
            file_id: self.job_file_id.clone(),
            extra: Map::new(),
        }
    }
}

fn api_error(status: u16, message: &str) -> SonioxClientError {
    SonioxClientError::Api {
        message: message.to_owned(),
        hint: None,
        status: Some(status),
        code: None,
    }
}

#[async_trait]
impl TranscriptionApi for ScriptedApi {
    async fn upload_file(&self, upload: FileUpload) -> soniox_client::Result<UploadedFile> {
        self.uploads.fetch_add(1, Ordering::SeqCst);
        let mut metadata = Map::new();
        metadata.insert("size".to_owned(), json!(upload.data.len()));
        Ok(UploadedFile {
            id: "file-1".to_owned(),
            metadata,
        })
    }

    async fn create_transcription(&self, request: &TranscriptionRequest) -> soniox_client::Result<TranscriptionJob> {
        self.created.lock().unwrap().push(serde_json::to_value(request).unwrap());
        Ok(self.job("job-1", "queued".to_owned()))
    }

    async fn get_transcription(&self, id: &str) -> soniox_client::Result<TranscriptionJob> {
        self.status_checks.fetch_add(1, Ordering::SeqCst);
        if self.fail_status {
            return Err(api_error(404, "Transcription not found."));
        }
        Ok(self.job(id, self.next_status()))
    }

    async fn get_transcript(&self, id: &str) -> soniox_client::Result<Transcript> {
        self.transcript_fetches.fetch_add(1, Ordering::SeqCst);
        let mut metadata = Map::new();
        metadata.insert("id".to_owned(), json!(id));
        metadata.insert("tokens".to_owned(), json!([{"text": "hello"}]));
        Ok(Transcript {
            text: "hello world".to_owned(),
            metadata,
        })
    }

    async fn delete_transcription(&self, id: &str) -> soniox_client::Result<()> {
        if self.fail_delete_transcription {
            return Err(api_error(500, "delete exploded"));
        }
        self.deleted_transcriptions.lock().unwrap().push(id.to_owned());
        Ok(())
    }

    async fn delete_file(&self, id: &str) -> soniox_client::Result<()> {
        if self.fail_delete_file {
            return Err(api_error(404, "File not found."));
        }
        self.deleted_files.lock().unwrap().push(id.to_owned());
        Ok(())
    }
}
