use dioxus::prelude::*;
use eduhub_core::model::{TestId, TestResult};
use services::sessions::{ResultCache, TAKE_TEST_FORM_KEY};
use storage::LocalStore;

use super::test_harness::{FakeApi, ViewKind, sample_test, setup_view_harness};
use crate::views::{AnswerLegend, StatisticsPanel};
use crate::vm::NO_RESULTS;

fn graded(score: u32, picked: &str) -> TestResult {
    graded_for("t1", "Ownership basics", score, picked)
}

fn graded_for(test_id: &str, title: &str, score: u32, picked: &str) -> TestResult {
    serde_json::from_value(serde_json::json!({
        "id": format!("r-{test_id}"), "testId": test_id, "title": title,
        "studentId": "u1", "courseId": "c1",
        "score": score, "success": score >= 15, "testDuration": 150,
        "questions": {"q1": [picked]},
        "questionScores": {"q1": if score > 0 { 1 } else { 0 }}
    }))
    .unwrap()
}

async fn settle(harness: &mut super::test_harness::ViewHarness) {
    harness.rebuild();
    for _ in 0..4 {
        harness.drive_async().await;
    }
}

#[test]
fn legend_lists_every_highlight() {
    let html = dioxus_ssr::render_element(rsx! { AnswerLegend {} });
    for label in [
        "Correct answer",
        "Wrong answer",
        "Missed correct answers but no wrong answers",
        "Missed correct answer",
    ] {
        assert!(html.contains(label), "missing {label} in {html}");
    }
}

#[test]
fn statistics_panel_without_results() {
    let html = dioxus_ssr::render_element(rsx! { StatisticsPanel { stats: None } });
    assert!(html.contains(NO_RESULTS), "missing empty notice in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn take_test_view_renders_questions_and_countdown() {
    let mut harness =
        setup_view_harness(ViewKind::TakeTest("t1".into()), FakeApi::new(sample_test()));
    settle(&mut harness).await;

    let html = harness.render();
    assert!(html.contains("Ownership basics"), "missing title in {html}");
    assert!(
        html.contains("Submit before: 20:00") || html.contains("Submit before: 19:59"),
        "missing countdown in {html}"
    );
    assert!(html.contains("1) Which type owns its heap buffer?"), "missing question in {html}");
    assert!(html.contains("Points: 1"), "missing points in {html}");
    assert!(html.contains("Submit"), "missing submit in {html}");

    let mirrored = harness.store.get_item(TAKE_TEST_FORM_KEY).await.unwrap();
    assert!(mirrored.is_some(), "fresh attempt should be mirrored");
}

#[tokio::test(flavor = "current_thread")]
async fn results_view_renders_cached_result() {
    let mut harness = setup_view_harness(ViewKind::Results, FakeApi::new(sample_test()));
    ResultCache::new(std::sync::Arc::new(harness.store.clone()))
        .store(&sample_test(), &graded(30, "a1"))
        .await
        .unwrap();
    settle(&mut harness).await;

    let html = harness.render();
    assert!(html.contains("Score:"), "missing score label in {html}");
    assert!(html.contains("30 / 30"), "missing score in {html}");
    assert!(html.contains("answer correct"), "missing correct class in {html}");
    assert!(html.contains("Back to Course Details"), "missing back link in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn results_view_marks_wrong_pick() {
    let mut harness = setup_view_harness(ViewKind::Results, FakeApi::new(sample_test()));
    ResultCache::new(std::sync::Arc::new(harness.store.clone()))
        .store(&sample_test(), &graded(0, "a2"))
        .await
        .unwrap();
    settle(&mut harness).await;

    let html = harness.render();
    assert!(html.contains("0 / 30"), "missing score in {html}");
    assert!(html.contains("Time Taken: 2.5 minutes"), "missing duration in {html}");
    assert!(html.contains("answer wrong"), "missing wrong class in {html}");
    assert!(html.contains("answer missed"), "missing missed class in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn results_view_without_cache_says_so() {
    let mut harness = setup_view_harness(ViewKind::Results, FakeApi::new(sample_test()));
    settle(&mut harness).await;
    let html = harness.render();
    assert!(html.contains("No test result to show."), "missing notice in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn course_view_lists_tests_and_statistics() {
    let api = FakeApi::new(sample_test()).with_completed(vec![graded(30, "a1")]);
    let mut harness = setup_view_harness(ViewKind::Course("c1".into()), api);
    settle(&mut harness).await;

    let html = harness.render();
    assert!(html.contains("Ownership basics"), "missing test in {html}");
    assert!(html.contains("30 / 30 (Passed)"), "missing result in {html}");
    assert!(html.contains("Personal Statistics"), "missing statistics in {html}");
    assert!(html.contains("View result"), "missing result button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn course_view_lists_results_for_unlisted_tests() {
    let mut archived = sample_test();
    archived.id = TestId::new("t0");
    archived.title = "Borrowing".into();
    let api = FakeApi::new(sample_test())
        .with_archived(archived)
        .with_completed(vec![graded(30, "a1"), graded_for("t0", "Borrowing", 12, "a2")]);
    let mut harness = setup_view_harness(ViewKind::Course("c1".into()), api);
    settle(&mut harness).await;

    let html = harness.render();
    assert!(html.contains("Take test"), "completed test lost its take link in {html}");
    assert!(html.contains("Tests completed"), "missing completed list in {html}");
    assert!(html.contains("Borrowing"), "missing unlisted result in {html}");
    assert!(html.contains("12 / 30 (Failed)"), "missing failed verdict in {html}");
    assert_eq!(html.matches("View result").count(), 2, "{html}");
}

#[tokio::test(flavor = "current_thread")]
async fn home_view_links_default_course() {
    let mut harness = setup_view_harness(ViewKind::Home, FakeApi::new(sample_test()));
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Signed in as u1"), "missing user in {html}");
    assert!(html.contains("Open course c1"), "missing course link in {html}");
}
