/// Bounded-call helpers for storage access
///
/// Two building blocks used by the engagement service:
/// - **Deadline**: every storage call runs under a hard time limit so that
///   a stalled connection surfaces as an error instead of hanging the
///   request task.
/// - **Retry**: read-only queries may be retried a bounded number of times
///   with exponential backoff and jitter. Mutating operations must not be
///   retried through this module.
pub mod deadline;
pub mod retry;

pub use deadline::{with_deadline, DeadlineExceeded};
pub use retry::{RetriesExhausted, RetryPolicy};
