/// Deadline wrapper for storage calls
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;

/// The wrapped operation did not complete before its deadline.
#[derive(Debug, thiserror::Error)]
#[error("storage call exceeded deadline of {0:?}")]
pub struct DeadlineExceeded(pub Duration);

/// Run a fallible future under a hard deadline.
///
/// Expiry is reported through the inner error type so callers keep a single
/// error channel; `to_timeout_err` converts the elapsed deadline into the
/// caller's error.
pub async fn with_deadline<F, T, E>(
    duration: Duration,
    future: F,
    to_timeout_err: impl FnOnce(DeadlineExceeded) -> E,
) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
{
    match timeout(duration, future).await {
        Ok(result) => result,
        Err(_) => Err(to_timeout_err(DeadlineExceeded(duration))),
    }
}
