//! Completion poller
//!
//! ```text
//! polling ──completed──▶ completed (transcript fetched)
//!    │ ──error──────▶ error      (JobFailed)
//!    │ ──deadline───▶ timed_out  (PollTimeout)
//!    └─ ──cancelled──▶ aborted
//! ```
//!
//! The deadline is fixed at loop entry and only checked between status
//! checks, so the total wait can exceed `max_wait` by up to one interval.
//! A `max_wait` too large to add to the clock means no deadline.

use std::time::Duration;

use soniox_client::{Transcript, TranscriptionJob};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::api::TranscriptionApi;
use crate::error::{NodeError, Result};
use crate::params::WaitParameters;
use crate::wait::{Wait, sleep_or_cancel};

/// Shortest allowed delay between status checks
pub const MIN_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Poll timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    interval: Duration,
    max_wait: Duration,
}

impl PollSettings {
    /// Settings with the interval raised to [`MIN_POLL_INTERVAL`] if needed
    pub fn new(interval: Duration, max_wait: Duration) -> Self {
        Self {
            interval: interval.max(MIN_POLL_INTERVAL),
            max_wait,
        }
    }

    pub const fn interval(&self) -> Duration {
        self.interval
    }

    pub const fn max_wait(&self) -> Duration {
        self.max_wait
    }
}

impl From<&WaitParameters> for PollSettings {
    fn from(params: &WaitParameters) -> Self {
        Self::new(params.poll_interval(), params.max_wait())
    }
}

/// Successful end of a poll
#[derive(Debug, Clone)]
pub enum PollOutcome {
    /// Job completed and its transcript was fetched
    Completed {
        job: TranscriptionJob,
        transcript: Transcript,
    },
    /// The execution was cancelled while waiting
    Aborted,
}

/// Poll a transcription until it completes, fails or the deadline passes
///
/// # Errors
///
/// Returns `JobFailed` when the job reaches the `error` state,
/// `PollTimeout` when the deadline passes first, and `Api` for failed
/// status or transcript requests
pub async fn wait_for_transcript<A>(
    api: &A,
    id: &str,
    settings: PollSettings,
    cancel: &CancellationToken,
) -> Result<PollOutcome>
where
    A: TranscriptionApi + ?Sized,
{
    let started = Instant::now();
    let deadline = started.checked_add(settings.max_wait);

    loop {
        let job = api.get_transcription(id).await?;

        if job.is_completed() {
            tracing::debug!(transcription_id = id, "transcription completed, fetching transcript");
            let transcript = api.get_transcript(id).await?;
            return Ok(PollOutcome::Completed { job, transcript });
        }

        if job.is_error() {
            return Err(NodeError::JobFailed {
                id: id.to_owned(),
                message: job.error_message,
            });
        }

        if deadline.is_some_and(|deadline| Instant::now() > deadline) {
            return Err(NodeError::PollTimeout {
                id: id.to_owned(),
                last_status: job.status,
                waited_secs: started.elapsed().as_secs(),
            });
        }

        tracing::debug!(
            transcription_id = id,
            status = %job.status,
            next_check_in = ?settings.interval,
            "transcription not finished yet"
        );

        if sleep_or_cancel(cancel, settings.interval).await == Wait::Cancelled {
            tracing::info!(transcription_id = id, "execution cancelled while waiting for transcription");
            return Ok(PollOutcome::Aborted);
        }
    }
}
