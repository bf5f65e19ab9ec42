//! Shared error types for the services crate.

use thiserror::Error;

use eduhub_core::grading::GradingError;
use eduhub_core::model::{AttemptError, MissingSelections, TestId};
use storage::StorageError;

/// Errors emitted by the REST client.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("invalid API url: {0}")]
    InvalidUrl(String),
    #[error("request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by the test-taking workflow.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("test is still loading")]
    Loading,
    #[error("test already loaded for this session")]
    AlreadyStarted,
    #[error("attempt already submitted")]
    Submitted,
    #[error("a submission is already in flight")]
    SubmissionInFlight,
    #[error("no answer selected for: {0}")]
    Incomplete(MissingSelections),
    #[error("graded result belongs to test {result:?}, expected {expected:?}")]
    ForeignResult { expected: TestId, result: TestId },
    #[error("failed to load test: {0}")]
    Fetch(#[source] ApiError),
    #[error("failed to submit answers: {0}")]
    Submit(#[source] ApiError),
    #[error(transparent)]
    Attempt(#[from] AttemptError),
    #[error(transparent)]
    Grading(#[from] GradingError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Encoding(#[from] serde_json::Error),
}

impl SessionError {
    /// Questions that blocked a submission, if this is a validation error.
    #[must_use]
    pub fn missing_selections(&self) -> Option<&MissingSelections> {
        match self {
            SessionError::Incomplete(missing) => Some(missing),
            _ => None,
        }
    }
}
