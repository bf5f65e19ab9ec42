use std::sync::Arc;

use async_trait::async_trait;
use eduhub_core::model::{AnswerSheet, CourseId, Test, TestId, TestResult, UserId};
use services::{ApiError, CourseTestsService, SessionError, TakeTestService, TestApi};
use storage::InMemoryRepository;

/// `archived` tests can still be fetched but are no longer listed; `results: None` fails.
struct CourseApi {
    tests: Vec<Test>,
    archived: Vec<Test>,
    results: Option<Vec<TestResult>>,
}

#[async_trait]
impl TestApi for CourseApi {
    async fn fetch_test(&self, id: &TestId) -> Result<Test, ApiError> {
        self.tests
            .iter()
            .chain(&self.archived)
            .find(|test| &test.id == id)
            .cloned()
            .ok_or(ApiError::HttpStatus(reqwest::StatusCode::NOT_FOUND))
    }

    async fn submit_answers(
        &self,
        _test_id: &TestId,
        _answers: &AnswerSheet,
        _seconds_left: u32,
        _user_id: &UserId,
    ) -> Result<TestResult, ApiError> {
        Err(ApiError::HttpStatus(reqwest::StatusCode::METHOD_NOT_ALLOWED))
    }

    async fn list_course_tests(&self, course_id: &CourseId) -> Result<Vec<Test>, ApiError> {
        Ok(self
            .tests
            .iter()
            .filter(|test| &test.course_id == course_id)
            .cloned()
            .collect())
    }

    async fn list_completed_results(
        &self,
        user_id: &UserId,
        course_id: &CourseId,
    ) -> Result<Vec<TestResult>, ApiError> {
        let results = self
            .results
            .as_ref()
            .ok_or(ApiError::HttpStatus(reqwest::StatusCode::BAD_GATEWAY))?;
        Ok(results
            .iter()
            .filter(|result| result.student_id() == user_id && result.course_id() == course_id)
            .cloned()
            .collect())
    }
}

fn test(id: &str) -> Test {
    serde_json::from_value(serde_json::json!({
        "id": id, "title": format!("Test {id}"), "courseId": "c1", "subjectId": "s1",
        "availableMinutes": 20,
        "questions": [{
            "id": "q1", "questionText": "Pick", "points": 2,
            "answers": [
                {"id": "a1", "text": "one", "correctAnswer": true},
                {"id": "a2", "text": "two"},
                {"id": "a3", "text": "three"}
            ]
        }]
    }))
    .unwrap()
}

fn result(test_id: &str, score: f64, secs: u32) -> TestResult {
    serde_json::from_value(serde_json::json!({
        "id": format!("r-{test_id}"), "testId": test_id, "studentId": "u1", "courseId": "c1",
        "score": score, "success": score >= 15.0, "testDuration": secs
    }))
    .unwrap()
}

fn service(
    results: Option<Vec<TestResult>>,
) -> (CourseTestsService, InMemoryRepository, Arc<CourseApi>) {
    let api = Arc::new(CourseApi {
        tests: vec![test("t1"), test("t2")],
        archived: vec![test("t0")],
        results,
    });
    let store = InMemoryRepository::new();
    (
        CourseTestsService::new(api.clone(), Arc::new(store.clone())),
        store,
        api,
    )
}

#[tokio::test]
async fn overview_lists_tests_results_and_statistics() {
    let (svc, _store, _api) =
        service(Some(vec![result("t1", 27.0, 600), result("t2", 9.0, 1200)]));
    let overview = svc.overview(&UserId::new("u1"), &CourseId::new("c1")).await;

    assert_eq!(overview.tests.as_ref().map(Vec::len), Some(2));
    let results = overview.results.clone().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(
        overview.test_for(&results[0]).map(|test| test.id.clone()),
        Some(TestId::new("t1"))
    );

    let stats = overview.statistics.unwrap();
    assert_eq!(stats.count, 2);
    assert_eq!(stats.passed, 1);
    assert!((stats.average_score - 18.0).abs() < f64::EPSILON);
    assert!(!stats.is_good());
    assert!((stats.average_minutes - 15.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn no_results_means_no_statistics() {
    let (svc, _store, _api) = service(Some(Vec::new()));
    let overview = svc.overview(&UserId::new("u1"), &CourseId::new("c1")).await;
    assert!(overview.statistics.is_none());
    assert_eq!(overview.results, Some(Vec::new()));
}

#[tokio::test]
async fn failed_results_listing_keeps_tests() {
    let (svc, _store, _api) = service(None);
    let overview = svc.overview(&UserId::new("u1"), &CourseId::new("c1")).await;
    assert_eq!(overview.tests.as_ref().map(Vec::len), Some(2));
    assert!(overview.results.is_none());
    assert!(overview.statistics.is_none());
}

#[tokio::test]
async fn opened_result_is_shown_on_result_page() {
    let (svc, store, api) = service(Some(vec![result("t1", 30.0, 90)]));
    let overview = svc.overview(&UserId::new("u1"), &CourseId::new("c1")).await;
    let tests = overview.tests.clone().unwrap();
    let graded = &overview.results.clone().unwrap()[0];

    assert!(matches!(
        svc.open_result(&tests[1], graded).await,
        Err(SessionError::ForeignResult { .. })
    ));
    svc.open_completed(graded, overview.test_for(graded)).await.unwrap();

    let take = TakeTestService::new(services::Clock::system(), api, Arc::new(store));
    let report = take.last_report().await.unwrap().unwrap();
    assert_eq!(report.test_id, TestId::new("t1"));
    assert!((report.duration_minutes - 1.5).abs() < f64::EPSILON);
    assert!((report.questions[0].weight - 30.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn result_for_unlisted_test_fetches_it() {
    let (svc, store, api) = service(Some(vec![result("t0", 12.0, 300)]));
    let overview = svc.overview(&UserId::new("u1"), &CourseId::new("c1")).await;
    let graded = &overview.results.clone().unwrap()[0];
    assert!(overview.test_for(graded).is_none());

    svc.open_completed(graded, None).await.unwrap();

    let take = TakeTestService::new(services::Clock::system(), api, Arc::new(store));
    let report = take.last_report().await.unwrap().unwrap();
    assert_eq!(report.test_id, TestId::new("t0"));
    assert_eq!(report.title, "Test t0");
}
