//! Error types for submission, processing, and result rendezvous.

use thiserror::Error;

/// Rejection returned at submission time, before a job ever reaches the
/// queue. Admission is a coarse backlog bound, not an exact quota: the depth
/// check races with concurrent submissions by design.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("too many requests: {queued} jobs already queued")]
    TooManyRequests { queued: usize },
}

/// Failure observed while awaiting a job's result with a bound.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WaitError {
    /// The bound elapsed before the dispatcher wrote the result slot.
    #[error("timed out awaiting the job result")]
    TimedOut,

    /// The worker dropped the job without delivering a result, e.g. because
    /// its batch was lost to a panic or the engine shut down.
    #[error("worker dropped the job before delivering a result")]
    WorkerGone,
}

/// Error a processing variant may return. The dispatcher recovers these
/// per-job: the cause is logged with the job id and the caller only ever
/// observes [`JobFailed`].
#[derive(Debug, Clone, Error)]
pub enum GenerateError {
    #[error("prompt is empty")]
    EmptyPrompt,

    #[error("at least one sample must be requested")]
    NoSamples,

    #[error("model failure: {0}")]
    Model(String),
}

/// Distinguished marker written to a job's result slot when its processing
/// variant failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("generation failed")]
pub struct JobFailed;
