#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

//! Typed Rust HTTP client for the Soniox async transcription API
//!
//! Covers file upload, transcription create/status/transcript/delete and
//! the credential test. Every failure is normalized into
//! [`SonioxClientError::Api`] with the best available message and, for
//! known error codes and statuses, a remediation hint.

mod client;
pub mod error;
mod failure;
pub mod multipart;
pub mod redact;
pub mod types;

pub use client::SonioxClient;
pub use error::{Result, SonioxClientError};
pub use failure::hint_for;
pub use redact::redact_webhook_secret;
pub use types::*;
