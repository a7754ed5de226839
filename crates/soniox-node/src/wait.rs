use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// How a cancellable wait ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wait {
    /// The full duration passed
    Elapsed,
    /// The execution was cancelled first
    Cancelled,
}

/// Sleep for `duration` unless `cancel` fires first
///
/// Cancellation is not an error: callers stop their remaining work.
pub async fn sleep_or_cancel(cancel: &CancellationToken, duration: Duration) -> Wait {
    tokio::select! {
        biased;
        () = cancel.cancelled() => Wait::Cancelled,
        () = tokio::time::sleep(duration) => Wait::Elapsed,
    }
}
