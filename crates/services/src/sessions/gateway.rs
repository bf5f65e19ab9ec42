use std::sync::Arc;

use eduhub_core::model::TestResult;

use crate::api::TestApi;
use crate::error::SessionError;
use crate::sessions::controller::SubmissionRequest;

/// Sends one validated attempt to the grading endpoint. Never retries.
#[derive(Clone)]
pub struct SubmissionGateway {
    api: Arc<dyn TestApi>,
}

impl SubmissionGateway {
    #[must_use]
    pub fn new(api: Arc<dyn TestApi>) -> Self {
        Self { api }
    }

    /// # Errors
    ///
    /// Returns `SessionError::Submit` when the request fails or the backend rejects it.
    pub async fn submit(&self, request: &SubmissionRequest) -> Result<TestResult, SessionError> {
        // secondsLeft is reported by the client and taken as-is by the backend.
        tracing::info!(
            test = %request.test_id,
            user = %request.user_id,
            seconds_left = request.seconds_left,
            "submitting attempt"
        );
        self.api
            .submit_answers(
                &request.test_id,
                &request.answers,
                request.seconds_left,
                &request.user_id,
            )
            .await
            .map_err(SessionError::Submit)
    }
}
