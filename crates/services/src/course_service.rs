use std::sync::Arc;

use eduhub_core::model::{CourseId, Test, TestResult, UserId};
use eduhub_core::stats::ResultStatistics;
use storage::LocalStore;

use crate::api::TestApi;
use crate::error::SessionError;
use crate::sessions::ResultCache;

/// Tests of a course and the user's graded attempts in it.
///
/// The two listings load independently; a listing that failed is `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseOverview {
    pub course_id: CourseId,
    pub tests: Option<Vec<Test>>,
    pub results: Option<Vec<TestResult>>,
    pub statistics: Option<ResultStatistics>,
}

impl CourseOverview {
    /// The listed test a result was graded for, if the course still lists it.
    #[must_use]
    pub fn test_for(&self, result: &TestResult) -> Option<&Test> {
        self.tests
            .as_deref()?
            .iter()
            .find(|test| &test.id == result.test_id())
    }
}

#[derive(Clone)]
pub struct CourseTestsService {
    api: Arc<dyn TestApi>,
    results: ResultCache,
}

impl CourseTestsService {
    #[must_use]
    pub fn new(api: Arc<dyn TestApi>, store: Arc<dyn LocalStore>) -> Self {
        Self {
            api,
            results: ResultCache::new(store),
        }
    }

    /// # Errors
    ///
    /// Returns `SessionError::Fetch` when the listing cannot be loaded.
    pub async fn list_tests(&self, course_id: &CourseId) -> Result<Vec<Test>, SessionError> {
        self.api
            .list_course_tests(course_id)
            .await
            .map_err(SessionError::Fetch)
    }

    /// # Errors
    ///
    /// Returns `SessionError::Fetch` when the results cannot be loaded.
    pub async fn completed_results(
        &self,
        user_id: &UserId,
        course_id: &CourseId,
    ) -> Result<Vec<TestResult>, SessionError> {
        self.api
            .list_completed_results(user_id, course_id)
            .await
            .map_err(SessionError::Fetch)
    }

    /// Load tests, results and statistics for one course.
    ///
    /// A failed listing is logged and left out; the other one is still shown.
    pub async fn overview(&self, user_id: &UserId, course_id: &CourseId) -> CourseOverview {
        let (tests, results) = tokio::join!(
            self.list_tests(course_id),
            self.completed_results(user_id, course_id)
        );
        let tests = tests
            .inspect_err(|err| {
                tracing::warn!(course = %course_id, error = %err, "course tests unavailable");
            })
            .ok();
        let results = results
            .inspect_err(|err| {
                tracing::warn!(course = %course_id, error = %err, "completed tests unavailable");
            })
            .ok();
        tracing::debug!(
            course = %course_id,
            tests = tests.as_ref().map(Vec::len),
            results = results.as_ref().map(Vec::len),
            "loaded course overview"
        );
        let statistics = results.as_deref().and_then(ResultStatistics::from_results);
        CourseOverview {
            course_id: course_id.clone(),
            tests,
            results,
            statistics,
        }
    }

    /// Make a past result the one shown on the result page.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::ForeignResult` when the result was graded for another test,
    /// or a storage/encoding error from the cache.
    pub async fn open_result(&self, test: &Test, result: &TestResult) -> Result<(), SessionError> {
        if result.test_id() != &test.id {
            return Err(SessionError::ForeignResult {
                expected: test.id.clone(),
                result: result.test_id().clone(),
            });
        }
        self.results.store(test, result).await
    }

    /// Open a completed result, fetching its test when the course no longer lists it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Fetch` when the test cannot be loaded, or any error from
    /// [`CourseTestsService::open_result`].
    pub async fn open_completed(
        &self,
        result: &TestResult,
        listed: Option<&Test>,
    ) -> Result<(), SessionError> {
        let test = match listed {
            Some(test) => test.clone(),
            None => self
                .api
                .fetch_test(result.test_id())
                .await
                .map_err(SessionError::Fetch)?,
        };
        self.open_result(&test, result).await
    }
}
