//! Mock Soniox API for integration tests
//!
//! Implements the async transcription endpoints with scripted status
//! sequences, request counters and failure toggles.

use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use secrecy::SecretString;
use serde_json::{Value, json};
use soniox_client::SonioxClient;
use tokio_util::sync::CancellationToken;

/// API key the mock accepts
pub const API_KEY: &str = "test-key";

/// Mock Soniox backend
pub struct MockSoniox {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockState>,
}

/// Upload as received by the mock
#[derive(Debug, Clone)]
pub struct RecordedUpload {
    pub content_type: String,
    pub body: Vec<u8>,
}

#[derive(Default)]
struct MockState {
    /// Statuses returned by successive status checks; the last one repeats
    statuses: Mutex<VecDeque<String>>,
    error_message: Option<String>,
    fail_transcription_delete: bool,
    fail_file_delete: bool,
    upload_without_id: bool,
    status_delay: Option<Duration>,
    last_user_agent: Mutex<Option<String>>,
    jobs: Mutex<HashMap<String, Value>>,
    last_upload: Mutex<Option<RecordedUpload>>,
    last_create: Mutex<Option<Value>>,
    deleted_files: Mutex<Vec<String>>,
    upload_count: AtomicU32,
    create_count: AtomicU32,
    status_count: AtomicU32,
    transcript_count: AtomicU32,
    delete_transcription_count: AtomicU32,
}

/// Builder for a [`MockSoniox`]
#[derive(Default)]
pub struct MockSonioxBuilder {
    state: MockState,
}

impl MockSonioxBuilder {
    /// Status sequence for status checks
    pub fn statuses(self, statuses: &[&str]) -> Self {
        *self.state.statuses.lock().unwrap() = statuses.iter().map(|s| (*s).to_owned()).collect();
        self
    }

    /// Error message reported on jobs in the `error` state
    pub fn error_message(mut self, message: &str) -> Self {
        self.state.error_message = Some(message.to_owned());
        self
    }

    /// Pre-existing job, e.g. for delete and get results
    pub fn job(self, job: Value) -> Self {
        let id = job["id"].as_str().unwrap_or_default().to_owned();
        self.state.jobs.lock().unwrap().insert(id, job);
        self
    }

    /// Answer transcription deletes with 500
    pub fn failing_transcription_delete(mut self) -> Self {
        self.state.fail_transcription_delete = true;
        self
    }

    /// Answer file deletes with 404
    pub fn failing_file_delete(mut self) -> Self {
        self.state.fail_file_delete = true;
        self
    }

    /// Answer uploads with a body lacking an id
    pub fn upload_without_id(mut self) -> Self {
        self.state.upload_without_id = true;
        self
    }

    /// Hold every status response for `delay`
    pub fn status_delay(mut self, delay: Duration) -> Self {
        self.state.status_delay = Some(delay);
        self
    }

    /// Start the mock server, returning immediately
    pub async fn start(self) -> anyhow::Result<MockSoniox> {
        let state = Arc::new(self.state);

        let app = Router::new()
            .route("/v1/files", routing::post(handle_upload))
            .route("/v1/files/{id}", routing::delete(handle_delete_file))
            .route("/v1/transcriptions", routing::post(handle_create))
            .route(
                "/v1/transcriptions/{id}",
                routing::get(handle_status).delete(handle_delete_transcription),
            )
            .route("/v1/transcriptions/{id}/transcript", routing::get(handle_transcript))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(MockSoniox { addr, shutdown, state })
    }
}

impl MockSoniox {
    pub fn builder() -> MockSonioxBuilder {
        MockSonioxBuilder::default().statuses(&["completed"])
    }

    /// Start a mock whose jobs complete on the first check
    pub async fn start() -> anyhow::Result<Self> {
        Self::builder().start().await
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Client authenticated with [`API_KEY`]
    pub fn client(&self) -> SonioxClient {
        self.client_with_key(API_KEY)
    }

    pub fn client_with_key(&self, key: &str) -> SonioxClient {
        SonioxClient::new(&self.base_url(), SecretString::from(key.to_owned())).unwrap()
    }

    pub fn upload_count(&self) -> u32 {
        self.state.upload_count.load(Ordering::Relaxed)
    }

    pub fn create_count(&self) -> u32 {
        self.state.create_count.load(Ordering::Relaxed)
    }

    pub fn status_count(&self) -> u32 {
        self.state.status_count.load(Ordering::Relaxed)
    }

    pub fn transcript_count(&self) -> u32 {
        self.state.transcript_count.load(Ordering::Relaxed)
    }

    pub fn delete_transcription_count(&self) -> u32 {
        self.state.delete_transcription_count.load(Ordering::Relaxed)
    }

    pub fn deleted_files(&self) -> Vec<String> {
        self.state.deleted_files.lock().unwrap().clone()
    }

    pub fn last_upload(&self) -> Option<RecordedUpload> {
        self.state.last_upload.lock().unwrap().clone()
    }

    pub fn last_create(&self) -> Option<Value> {
        self.state.last_create.lock().unwrap().clone()
    }

    /// User agent of the most recent status check
    pub fn last_user_agent(&self) -> Option<String> {
        self.state.last_user_agent.lock().unwrap().clone()
    }
}

impl Drop for MockSoniox {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

// -- Handlers --

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "status_code": 401,
            "error_type": "unauthenticated",
            "message": "Invalid API key provided."
        })),
    )
        .into_response()
}

fn not_found(what: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "status_code": 404,
            "error_type": "not_found",
            "message": format!("{what} not found.")
        })),
    )
        .into_response()
}

fn authorize(headers: &HeaderMap) -> Result<(), Response> {
    let expected = format!("Bearer {API_KEY}");
    match headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        Some(value) if value == expected => Ok(()),
        _ => Err(unauthorized()),
    }
}

async fn handle_upload(State(state): State<Arc<MockState>>, headers: HeaderMap, body: Bytes) -> Response {
    if let Err(response) = authorize(&headers) {
        return response;
    }
    state.upload_count.fetch_add(1, Ordering::Relaxed);

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_owned();
    *state.last_upload.lock().unwrap() = Some(RecordedUpload {
        content_type,
        body: body.to_vec(),
    });

    if state.upload_without_id {
        return Json(json!({"filename": "audio"})).into_response();
    }

    Json(json!({"id": "file-abc", "filename": "audio", "size": body.len()})).into_response()
}

async fn handle_delete_file(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if let Err(response) = authorize(&headers) {
        return response;
    }
    if state.fail_file_delete {
        return not_found("File");
    }
    state.deleted_files.lock().unwrap().push(id);
    StatusCode::NO_CONTENT.into_response()
}

async fn handle_create(State(state): State<Arc<MockState>>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if let Err(response) = authorize(&headers) {
        return response;
    }
    let count = state.create_count.fetch_add(1, Ordering::Relaxed) + 1;

    if body.get("model").and_then(Value::as_str).is_none_or(str::is_empty) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error_type": "invalid_request", "message": "Missing model."})),
        )
            .into_response();
    }

    let mut job = body.clone();
    job["id"] = json!(format!("tr-{count}"));
    job["status"] = json!("queued");
    job["created_at"] = json!("2024-01-01T00:00:00Z");

    state
        .jobs
        .lock()
        .unwrap()
        .insert(format!("tr-{count}"), job.clone());
    *state.last_create.lock().unwrap() = Some(body);

    (StatusCode::CREATED, Json(job)).into_response()
}

async fn handle_status(State(state): State<Arc<MockState>>, headers: HeaderMap, Path(id): Path<String>) -> Response {
    if let Err(response) = authorize(&headers) {
        return response;
    }
    state.status_count.fetch_add(1, Ordering::Relaxed);
    *state.last_user_agent.lock().unwrap() = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    if let Some(delay) = state.status_delay {
        tokio::time::sleep(delay).await;
    }

    let Some(mut job) = state.jobs.lock().unwrap().get(&id).cloned() else {
        return not_found("Transcription");
    };

    let status = {
        let mut statuses = state.statuses.lock().unwrap();
        if statuses.len() > 1 {
            statuses.pop_front().unwrap_or_default()
        } else {
            statuses.front().cloned().unwrap_or_else(|| "processing".to_owned())
        }
    };

    if status == "error" {
        job["error_message"] = json!(state.error_message.clone());
    }
    job["status"] = json!(status);

    Json(job).into_response()
}

async fn handle_transcript(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if let Err(response) = authorize(&headers) {
        return response;
    }
    state.transcript_count.fetch_add(1, Ordering::Relaxed);

    if !state.jobs.lock().unwrap().contains_key(&id) {
        return not_found("Transcription");
    }

    Json(json!({
        "id": id,
        "text": "Hello from Soniox.",
        "tokens": [
            {"text": "Hello", "start_ms": 0, "end_ms": 400, "confidence": 0.98},
            {"text": " from Soniox.", "start_ms": 400, "end_ms": 1100, "confidence": 0.95}
        ]
    }))
    .into_response()
}

async fn handle_delete_transcription(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if let Err(response) = authorize(&headers) {
        return response;
    }
    state.delete_transcription_count.fetch_add(1, Ordering::Relaxed);

    if state.fail_transcription_delete {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"message": "Internal server error."})),
        )
            .into_response();
    }

    if state.jobs.lock().unwrap().remove(&id).is_none() {
        return not_found("Transcription");
    }
    StatusCode::NO_CONTENT.into_response()
}
