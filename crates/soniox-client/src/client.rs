use std::fmt;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::Value;
use soniox_config::HttpConfig;
use url::Url;

use crate::error::{Result, SonioxClientError};
use crate::failure;
use crate::multipart::FileForm;
use crate::types::{FileUpload, Transcript, TranscriptionJob, TranscriptionRequest, UploadedFile};

/// Path requested by the credential test; the service answers 404 to an
/// authenticated caller and 401 otherwise
const CREDENTIAL_TEST_PATH: &[&str] = &["v1", "transcriptions", "credential-test"];

const FILES_PATH: &[&str] = &["v1", "files"];
const TRANSCRIPTIONS_PATH: &[&str] = &["v1", "transcriptions"];

/// Request payload variants
enum Payload {
    Empty,
    Json(Value),
    Multipart(FileForm),
}

/// Typed client for the Soniox async transcription API
#[derive(Clone)]
pub struct SonioxClient {
    base_url: Url,
    http: reqwest::Client,
    api_key: SecretString,
}

impl fmt::Debug for SonioxClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SonioxClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl SonioxClient {
    /// Create a client for the given base URL with default HTTP settings
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid
    pub fn new(base_url: &str, api_key: SecretString) -> Result<Self> {
        Self::with_http_config(base_url, api_key, &HttpConfig::default())
    }

    /// Create a client for the given base URL and HTTP settings
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid, the timeout does not parse
    /// or the HTTP client cannot be built
    pub fn with_http_config(base_url: &str, api_key: SecretString, http: &HttpConfig) -> Result<Self> {
        let base_url =
            Url::parse(base_url).map_err(|e| SonioxClientError::Config(format!("invalid base URL: {e}")))?;
        Self::build(base_url, api_key, http)
    }

    /// Create a client from loaded configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP timeout does not parse or the HTTP
    /// client cannot be built
    pub fn from_config(config: &soniox_config::Config) -> Result<Self> {
        Self::build(
            config.credentials.base_url.clone(),
            config.credentials.api_key.clone(),
            &config.http,
        )
    }

    fn build(base_url: Url, api_key: SecretString, config: &HttpConfig) -> Result<Self> {
        if base_url.cannot_be_a_base() {
            return Err(SonioxClientError::Config(format!("base URL cannot carry a path: {base_url}")));
        }

        let timeout = config
            .request_timeout()
            .map_err(|e| SonioxClientError::Config(e.to_string()))?;

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| SonioxClientError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { base_url, http, api_key })
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // -- Files --

    /// Upload local audio and return the stored file
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response has no id
    pub async fn upload_file(&self, upload: FileUpload) -> Result<UploadedFile> {
        tracing::debug!(
            bytes = upload.data.len(),
            file_name = upload.file_name.as_deref().unwrap_or_default(),
            "uploading audio file"
        );

        let form = FileForm::new(&upload.data, upload.file_name.as_deref(), upload.mime_type.as_deref());
        let response = self.send(Method::POST, FILES_PATH, &[], Payload::Multipart(form)).await?;
        let body = response.text().await.map_err(|e| failure::from_transport(&e))?;

        let file = parse_uploaded_file(&body).ok_or(SonioxClientError::MissingFileId)?;
        tracing::debug!(file_id = %file.id, "audio file uploaded");

        Ok(file)
    }

    /// Delete an uploaded file
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails
    pub async fn delete_file(&self, file_id: &str) -> Result<()> {
        self.send(Method::DELETE, FILES_PATH, &[resource_id(file_id)?], Payload::Empty)
            .await?;
        tracing::debug!(file_id, "file deleted");
        Ok(())
    }

    // -- Transcriptions --

    /// Create a transcription job
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is not a job
    pub async fn create_transcription(&self, request: &TranscriptionRequest) -> Result<TranscriptionJob> {
        let body =
            serde_json::to_value(request).map_err(|e| SonioxClientError::Parse(format!("invalid request body: {e}")))?;

        let response = self.send(Method::POST, TRANSCRIPTIONS_PATH, &[], Payload::Json(body)).await?;
        let job: TranscriptionJob = read_json(response).await?;

        tracing::debug!(transcription_id = %job.id, status = %job.status, "transcription created");
        Ok(job)
    }

    /// Fetch the current state of a transcription job
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails
    pub async fn get_transcription(&self, id: &str) -> Result<TranscriptionJob> {
        let response = self
            .send(Method::GET, TRANSCRIPTIONS_PATH, &[resource_id(id)?], Payload::Empty)
            .await?;
        read_json(response).await
    }

    /// Fetch the transcript of a completed job
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails
    pub async fn get_transcript(&self, id: &str) -> Result<Transcript> {
        let response = self
            .send(
                Method::GET,
                TRANSCRIPTIONS_PATH,
                &[resource_id(id)?, "transcript"],
                Payload::Empty,
            )
            .await?;
        read_json(response).await
    }

    /// Delete a transcription job
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails
    pub async fn delete_transcription(&self, id: &str) -> Result<()> {
        self.send(Method::DELETE, TRANSCRIPTIONS_PATH, &[resource_id(id)?], Payload::Empty)
            .await?;
        tracing::debug!(transcription_id = id, "transcription deleted");
        Ok(())
    }

    // -- Credentials --

    /// Check that the API key is accepted
    ///
    /// A 404 from the credential test path proves the key was authenticated.
    ///
    /// # Errors
    ///
    /// Returns an API error for any other failure
    pub async fn test_credentials(&self) -> Result<()> {
        let url = make_url(&self.base_url, CREDENTIAL_TEST_PATH, &[]);

        let response = self
            .authorize(self.http.get(url.as_str()))
            .send()
            .await
            .map_err(|e| failure::from_transport(&e))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }

        handle_error(response).await.map(|_| ())
    }

    // -- Helpers --

    /// Send one authenticated request and reject non-success responses
    async fn send(&self, method: Method, base: &[&str], ids: &[&str], payload: Payload) -> Result<reqwest::Response> {
        let url = make_url(&self.base_url, base, ids);
        let path = url.path();
        tracing::debug!(%method, path, "soniox request");

        let builder = self.authorize(self.http.request(method, url.as_str()));
        let builder = match payload {
            Payload::Empty => builder,
            Payload::Json(body) => builder.json(&body),
            Payload::Multipart(form) => builder.header(CONTENT_TYPE, form.content_type()).body(form.into_body()),
        };

        let response = builder.send().await.map_err(|e| {
            tracing::error!(path, "soniox request failed: {e}");
            failure::from_transport(&e)
        })?;

        handle_error(response).await
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder.header(AUTHORIZATION, format!("Bearer {}", self.api_key.expose_secret()))
    }
}

/// Build a URL from the base and path segments
///
/// Each segment is percent-encoded on its own, so an id can never add
/// path levels. The base path prefix is kept.
fn make_url(base_url: &Url, base: &[&str], ids: &[&str]) -> Url {
    let mut url = base_url.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().extend(base).extend(ids);
    }
    url
}

/// Check an id before it becomes a path segment
///
/// Dot segments would be dropped from the path and change the target.
fn resource_id(id: &str) -> Result<&str> {
    if id.trim().is_empty() || id == "." || id == ".." {
        return Err(SonioxClientError::InvalidId(id.to_owned()));
    }
    Ok(id)
}

/// Check an HTTP response for errors
async fn handle_error(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let error = failure::from_response(status.as_u16(), &body);
    tracing::error!(status = status.as_u16(), "soniox API error: {error}");

    Err(error)
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let body = response.text().await.map_err(|e| failure::from_transport(&e))?;
    serde_json::from_str(&body).map_err(|e| SonioxClientError::Parse(e.to_string()))
}

/// Parse an upload response, accepting a JSON object or a JSON-encoded string
/// holding one
fn parse_uploaded_file(body: &str) -> Option<UploadedFile> {
    let mut value: Value = serde_json::from_str(body).ok()?;

    if let Value::String(text) = &value {
        value = serde_json::from_str(text).ok()?;
    }

    let Value::Object(mut metadata) = value else {
        return None;
    };

    let id = match metadata.remove("id")? {
        Value::String(id) if !id.trim().is_empty() => id,
        Value::Number(id) => id.to_string(),
        _ => return None,
    };

    Some(UploadedFile { id, metadata })
}
