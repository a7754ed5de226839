#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

//! Soniox transcription node
//!
//! Turns per-item parameters into Soniox API calls: assembles and validates
//! the request, uploads local audio, creates the transcription, polls it to
//! a terminal state and cleans up server-side resources when asked to.
//! Items of a batch run strictly one after another.

mod api;
pub mod assemble;
pub mod binary;
pub mod cleanup;
mod error;
mod executor;
pub mod operations;
pub mod output;
pub mod params;
pub mod poll;
mod wait;

#[cfg(test)]
mod testing;

pub use api::TranscriptionApi;
pub use error::{NodeError, Result};
pub use executor::{BatchResult, Item, ItemFailure, NodeContext, OutputItem};
pub use operations::Outcome;
pub use params::{NodeParameters, Operation, OutputFormat};
pub use poll::{PollOutcome, PollSettings};
pub use wait::{Wait, sleep_or_cancel};
