//! Normalization of failed calls into [`SonioxClientError::Api`]
//!
//! A failure is first rendered into a lookup document:
//!
//! ```json
//! {
//!   "status": 429,
//!   "cause": { "detail": "...", "message": "..." },
//!   "body": { ...parsed response body... },
//!   "description": "non-JSON response body",
//!   "message": "transport error text"
//! }
//! ```
//!
//! The message, the application error code and the hint are then looked up
//! through ordered tables, first match wins.

use std::error::Error as _;

use serde_json::{Map, Value, json};

use crate::error::SonioxClientError;

/// Where to look for a human readable message, in priority order
const MESSAGE_POINTERS: &[&str] = &[
    "/cause/detail",
    "/cause/message",
    "/body/detail",
    "/body/message",
    "/body/error",
    "/body/error/message",
    "/description",
    "/message",
];

/// Where to look for an application error code, in priority order
const CODE_POINTERS: &[&str] = &["/body/error_code", "/body/code", "/body/error_type", "/body/error/code"];

/// Hints for application error codes, checked before status hints
const CODE_HINTS: &[(&str, &str)] = &[
    ("invalid_api_key", "Check that the API key in your Soniox credentials is correct and still active."),
    ("unauthenticated", "Check that the API key in your Soniox credentials is correct and still active."),
    ("rate_limit_exceeded", "Too many requests. Wait a moment before retrying or lower the number of items per run."),
    ("quota_exceeded", "The Soniox account has no remaining quota. Check usage and billing in the Soniox console."),
    ("file_too_large", "The audio file is too large. Use a smaller file or pass a public audio URL instead."),
    ("invalid_request", "The request was rejected. Check the model name, language codes and other options."),
    ("not_found", "The transcription or file was not found. It may already have been deleted."),
];

/// Hints for HTTP statuses without a recognised error code
const STATUS_HINTS: &[(u16, &str)] = &[
    (400, "The request was rejected. Check the model name, language codes and other options."),
    (401, "Check that the API key in your Soniox credentials is correct and still active."),
    (403, "The API key is not allowed to perform this operation."),
    (404, "The transcription or file was not found. It may already have been deleted."),
    (408, "The request timed out. Try again, or use a shorter audio file."),
    (413, "The audio file is too large. Use a smaller file or pass a public audio URL instead."),
    (429, "Too many requests. Wait a moment before retrying or lower the number of items per run."),
];

const SERVER_ERROR_HINT: &str = "The Soniox service is having problems. Try again later.";

/// Longest raw response body kept as description
const MAX_DESCRIPTION_LEN: usize = 500;

/// Build the error for a non-success HTTP response
pub(crate) fn from_response(status: u16, body: &str) -> SonioxClientError {
    let mut document = Map::new();
    document.insert("status".to_owned(), json!(status));

    match serde_json::from_str::<Value>(body) {
        Ok(parsed @ Value::Object(_)) => {
            document.insert("body".to_owned(), parsed);
        }
        Ok(Value::String(text)) => {
            document.insert("description".to_owned(), Value::String(truncate(&text)));
        }
        _ if !body.trim().is_empty() => {
            document.insert("description".to_owned(), Value::String(truncate(body.trim())));
        }
        _ => {}
    }

    normalize(&Value::Object(document))
}

/// Build the error for a request that failed before or while reading a response
pub(crate) fn from_transport(error: &reqwest::Error) -> SonioxClientError {
    let mut document = Map::new();
    document.insert("message".to_owned(), Value::String(error.to_string()));

    if let Some(status) = error.status() {
        document.insert("status".to_owned(), json!(status.as_u16()));
    }

    if let Some(source) = error.source() {
        document.insert("cause".to_owned(), json!({ "message": source.to_string() }));
    }

    normalize(&Value::Object(document))
}

/// Turn a lookup document into a uniform API error
pub(crate) fn normalize(document: &Value) -> SonioxClientError {
    let status = document
        .get("status")
        .and_then(Value::as_u64)
        .and_then(|s| u16::try_from(s).ok());
    let code = first_string(document, CODE_POINTERS);
    let hint = hint_for(code.as_deref(), status).map(str::to_owned);

    let message = first_string(document, MESSAGE_POINTERS).unwrap_or_else(|| match status {
        Some(status) => format!("Soniox API request failed (HTTP {status})"),
        None => "Soniox API request failed".to_owned(),
    });

    SonioxClientError::Api {
        message,
        hint,
        status,
        code,
    }
}

/// Remediation hint for a code or status; unknown ones yield `None`
pub fn hint_for(code: Option<&str>, status: Option<u16>) -> Option<&'static str> {
    let by_code = code.and_then(|code| {
        CODE_HINTS
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(code))
            .map(|(_, hint)| *hint)
    });

    by_code.or_else(|| {
        let status = status?;
        STATUS_HINTS
            .iter()
            .find(|(known, _)| *known == status)
            .map(|(_, hint)| *hint)
            .or_else(|| (500..600).contains(&status).then_some(SERVER_ERROR_HINT))
    })
}

fn first_string(document: &Value, pointers: &[&str]) -> Option<String> {
    pointers.iter().find_map(|pointer| {
        document
            .pointer(pointer)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
    })
}

fn truncate(text: &str) -> String {
    match text.char_indices().nth(MAX_DESCRIPTION_LEN) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_owned(),
    }
}
