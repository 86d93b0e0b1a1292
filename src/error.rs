use thiserror::Error;

use crate::scheduler::SchedulerPhase;

/// Failure of a single request to the football data API.
///
/// Every variant is recoverable: the scheduler records it as the view model's
/// `last_error` and keeps serving the previous snapshot.
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("rate limited by provider")]
    RateLimited,

    #[error("API error {status}: {body}")]
    Status { status: u16, body: String },

    #[error("provider reported errors: {0}")]
    Api(String),

    #[error("malformed response body: {0}")]
    Decode(String),
}

/// A single provider record that could not be projected into the internal
/// schema. Only that record is skipped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("record #{index} skipped: {reason}")]
pub struct MalformedRecordError {
    /// Position of the record in the provider payload
    pub index: usize,
    pub reason: String,
}

impl MalformedRecordError {
    pub fn new(index: usize, reason: impl Into<String>) -> Self {
        MalformedRecordError {
            index,
            reason: reason.into(),
        }
    }
}

/// Misuse of the scheduler lifecycle (e.g. refreshing a stopped session).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("scheduler already started (phase: {0:?})")]
    AlreadyStarted(SchedulerPhase),

    #[error("scheduler is not running (phase: {0:?})")]
    NotRunning(SchedulerPhase),
}
