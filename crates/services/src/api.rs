use std::env;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use url::Url;

use eduhub_core::model::{AnswerSheet, CourseId, Test, TestId, TestResult, UserId};

use crate::error::ApiError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl ApiConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read `EDUHUB_API_URL` and `EDUHUB_API_TIMEOUT_SECS`, falling back to defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url = env::var("EDUHUB_API_URL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.into());
        let timeout = env::var("EDUHUB_API_TIMEOUT_SECS")
            .ok()
            .and_then(|value| value.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        Self::new(base_url).with_timeout(Duration::from_secs(timeout))
    }

    /// Join escaped path segments onto the base URL.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidUrl` if the base URL cannot carry a path.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url =
            Url::parse(&self.base_url).map_err(|err| ApiError::InvalidUrl(err.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

/// The backend endpoints the test-taking client talks to.
#[async_trait]
pub trait TestApi: Send + Sync {
    /// `GET /tests/{id}`
    async fn fetch_test(&self, id: &TestId) -> Result<Test, ApiError>;

    /// `POST /tests/results/{testId}?secondsLeft={n}&userId={id}` with the answer sheet as body.
    async fn submit_answers(
        &self,
        test_id: &TestId,
        answers: &AnswerSheet,
        seconds_left: u32,
        user_id: &UserId,
    ) -> Result<TestResult, ApiError>;

    /// `GET /tests/course/{courseId}`
    async fn list_course_tests(&self, course_id: &CourseId) -> Result<Vec<Test>, ApiError>;

    /// `GET /tests/results/user/{userId}/course/{courseId}`
    async fn list_completed_results(
        &self,
        user_id: &UserId,
        course_id: &CourseId,
    ) -> Result<Vec<TestResult>, ApiError>;
}

#[derive(Clone)]
pub struct HttpTestApi {
    client: Client,
    config: ApiConfig,
}

impl HttpTestApi {
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the HTTP client cannot be built.
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    /// # Errors
    ///
    /// Returns `ApiError::Http` if the HTTP client cannot be built.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::new(ApiConfig::from_env())
    }

    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::HttpStatus(status));
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl TestApi for HttpTestApi {
    async fn fetch_test(&self, id: &TestId) -> Result<Test, ApiError> {
        let url = self.config.endpoint(&["tests", id.as_str()])?;
        tracing::debug!(%url, "fetching test");
        let response = self.client.get(url).send().await?;
        Self::decode(response).await
    }

    async fn submit_answers(
        &self,
        test_id: &TestId,
        answers: &AnswerSheet,
        seconds_left: u32,
        user_id: &UserId,
    ) -> Result<TestResult, ApiError> {
        let url = self
            .config
            .endpoint(&["tests", "results", test_id.as_str()])?;
        tracing::debug!(%url, seconds_left, "submitting answers");
        let response = self
            .client
            .post(url)
            .query(&[
                ("secondsLeft", seconds_left.to_string()),
                ("userId", user_id.to_string()),
            ])
            .json(answers)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn list_course_tests(&self, course_id: &CourseId) -> Result<Vec<Test>, ApiError> {
        let url = self
            .config
            .endpoint(&["tests", "course", course_id.as_str()])?;
        let response = self.client.get(url).send().await?;
        Self::decode(response).await
    }

    async fn list_completed_results(
        &self,
        user_id: &UserId,
        course_id: &CourseId,
    ) -> Result<Vec<TestResult>, ApiError> {
        let url = self.config.endpoint(&[
            "tests",
            "results",
            "user",
            user_id.as_str(),
            "course",
            course_id.as_str(),
        ])?;
        let response = self.client.get(url).send().await?;
        Self::decode(response).await
    }
}
