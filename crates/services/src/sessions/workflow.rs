use std::sync::Arc;

use eduhub_core::grading::{ResultReport, render_result};
use eduhub_core::model::{
    AnswerId, AttemptSnapshot, QuestionId, Test, TestId, TestResult, UserId,
};
use storage::LocalStore;

use super::controller::{SubmissionRequest, TestSession};
use super::gateway::SubmissionGateway;
use super::mirror::AttemptMirror;
use super::result_cache::ResultCache;
use crate::Clock;
use crate::api::TestApi;
use crate::error::SessionError;

/// Orchestrates loading, mirroring and submitting a single test attempt.
#[derive(Clone)]
pub struct TakeTestService {
    clock: Clock,
    api: Arc<dyn TestApi>,
    mirror: AttemptMirror,
    gateway: SubmissionGateway,
    results: ResultCache,
}

impl TakeTestService {
    #[must_use]
    pub fn new(clock: Clock, api: Arc<dyn TestApi>, store: Arc<dyn LocalStore>) -> Self {
        Self {
            clock,
            gateway: SubmissionGateway::new(api.clone()),
            api,
            mirror: AttemptMirror::new(store.clone()),
            results: ResultCache::new(store),
        }
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// Fetch a test and start (or resume) an attempt on it.
    ///
    /// A mirrored attempt is resumed only when it matches this test, user and question set;
    /// otherwise it is replaced by a fresh attempt.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Fetch` when the test cannot be loaded, or an attempt error when
    /// the test repeats a question id.
    pub async fn open(
        &self,
        test_id: &TestId,
        user_id: UserId,
    ) -> Result<TestSession, SessionError> {
        let test = self
            .api
            .fetch_test(test_id)
            .await
            .map_err(SessionError::Fetch)?;
        if let Err(err) = test.check_authoring() {
            tracing::warn!(test = %test.id, error = %err, "test violates authoring rules");
        }

        self.mirror.reopen().await;
        let mut session = TestSession::new(user_id);
        let mirrored = match self.mirror.load().await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                tracing::warn!(error = %err, "attempt mirror unavailable");
                None
            }
        };

        if let Some(snapshot) = mirrored {
            match session.resume(test.clone(), &snapshot) {
                Ok(()) => {
                    tracing::info!(
                        test = %test.id,
                        seconds_left = snapshot.seconds_left,
                        "resumed mirrored attempt"
                    );
                    return Ok(session);
                }
                Err(err) => {
                    tracing::info!(test = %test.id, reason = %err, "starting fresh attempt");
                }
            }
        }

        session.begin(test)?;
        self.save(&session).await;
        Ok(session)
    }

    /// Mirror the current attempt. Failures are logged and otherwise ignored.
    pub async fn save(&self, session: &TestSession) {
        if let Some(snapshot) = self.snapshot(session) {
            self.save_snapshot(&snapshot).await;
        }
    }

    /// Mirror a snapshot taken earlier with [`TakeTestService::snapshot`].
    pub async fn save_snapshot(&self, snapshot: &AttemptSnapshot) {
        if let Err(err) = self.mirror.save(snapshot).await {
            tracing::warn!(test = %snapshot.test_id, error = %err, "failed to mirror attempt");
        }
    }

    #[must_use]
    pub fn snapshot(&self, session: &TestSession) -> Option<AttemptSnapshot> {
        session.snapshot(self.clock.now())
    }

    /// Toggle one answer and mirror the result.
    ///
    /// # Errors
    ///
    /// Returns the session error when the toggle is rejected; nothing is mirrored then.
    pub async fn toggle(
        &self,
        session: &mut TestSession,
        question: &QuestionId,
        answer: &AnswerId,
        selected: bool,
    ) -> Result<(), SessionError> {
        session.toggle(question, answer, selected)?;
        self.save(session).await;
        Ok(())
    }

    /// One countdown period, mirrored when the remaining time changed.
    pub async fn tick(&self, session: &mut TestSession) -> bool {
        let changed = session.tick();
        if changed {
            self.save(session).await;
        }
        changed
    }

    /// Send a request taken with [`TestSession::begin_submission`].
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Submit` on any transport or backend failure.
    pub async fn send(&self, request: &SubmissionRequest) -> Result<TestResult, SessionError> {
        self.gateway.submit(request).await
    }

    /// Apply the outcome of [`TakeTestService::send`] to the session.
    ///
    /// A failure releases the latch and leaves the attempt in progress.
    ///
    /// # Errors
    ///
    /// Returns the submission error, or `SessionError::ForeignResult` for a mismatched result.
    pub fn settle(
        &self,
        session: &mut TestSession,
        outcome: Result<TestResult, SessionError>,
    ) -> Result<TestResult, SessionError> {
        match outcome {
            Ok(result) => {
                session.complete_submission(result.clone())?;
                Ok(result)
            }
            Err(err) => {
                tracing::warn!(error = %err, "submission failed; attempt stays open");
                session.abort_submission();
                Err(err)
            }
        }
    }

    /// Validate, send and settle in one step.
    ///
    /// Nothing is sent when a question has no selection.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Incomplete`, `SessionError::SubmissionInFlight`,
    /// `SessionError::Submit`, or a state error from the session.
    pub async fn submit(&self, session: &mut TestSession) -> Result<TestResult, SessionError> {
        let request = session.begin_submission()?;
        let outcome = self.send(&request).await;
        let result = self.settle(session, outcome)?;
        if let Some(test) = session.test() {
            self.remember_result(test, &result).await;
        }
        Ok(result)
    }

    /// Drop the mirror and cache the graded pair for the result page.
    pub async fn remember_result(&self, test: &Test, result: &TestResult) {
        if let Err(err) = self.mirror.clear().await {
            tracing::warn!(error = %err, "failed to clear attempt mirror");
        }
        if let Err(err) = self.results.store(test, result).await {
            tracing::warn!(error = %err, "failed to cache graded result");
        }
    }

    /// The last graded pair, if one is cached.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the cache cannot be read.
    pub async fn last_result(&self) -> Result<Option<(Test, TestResult)>, SessionError> {
        self.results.load().await
    }

    /// The result page for the last graded attempt.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` or `SessionError::Grading`.
    pub async fn last_report(&self) -> Result<Option<ResultReport>, SessionError> {
        let Some((test, result)) = self.last_result().await? else {
            return Ok(None);
        };
        Ok(Some(render_result(&test, &result)?))
    }

    /// Forget the mirrored attempt and the cached result.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if either record cannot be removed.
    pub async fn discard_local_state(&self) -> Result<(), SessionError> {
        self.mirror.clear().await?;
        self.results.clear().await?;
        Ok(())
    }
}
