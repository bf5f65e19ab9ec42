use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use eduhub_core::model::{
    Answer, AnswerId, AnswerSheet, CourseId, Question, QuestionId, SubjectId, Test, TestId,
    TestResult, UserId,
};
use eduhub_core::time::fixed_now;
use services::{ApiError, Clock, CourseTestsService, TakeTestService, TestApi};
use storage::{InMemoryRepository, LocalStore};

use crate::context::{UiApp, build_app_context};
use crate::views::{CourseTestsView, HomeView, ResultsView, TakeTestView};

pub fn sample_test() -> Test {
    Test {
        id: TestId::new("t1"),
        title: "Ownership basics".into(),
        course_id: CourseId::new("c1"),
        subject_id: SubjectId::new("s1"),
        available_minutes: 20,
        questions: vec![Question::new(
            QuestionId::new("q1"),
            "Which type owns its heap buffer?",
            1,
            vec![
                Answer::new(AnswerId::new("a1"), "String", true),
                Answer::new(AnswerId::new("a2"), "&str", false),
                Answer::new(AnswerId::new("a3"), "&[u8]", false),
            ],
        )],
    }
}

/// Serves a fixed test; full marks when every correct answer and nothing else was picked.
///
/// Archived tests can be fetched by id but are not listed in the course.
pub struct FakeApi {
    test: Test,
    archived: Vec<Test>,
    completed: Mutex<Vec<TestResult>>,
}

impl FakeApi {
    pub fn new(test: Test) -> Self {
        Self {
            test,
            archived: Vec::new(),
            completed: Mutex::new(Vec::new()),
        }
    }

    pub fn with_archived(mut self, test: Test) -> Self {
        self.archived.push(test);
        self
    }

    pub fn with_completed(self, results: Vec<TestResult>) -> Self {
        *self.completed.lock().unwrap() = results;
        self
    }
}

#[async_trait]
impl TestApi for FakeApi {
    async fn fetch_test(&self, id: &TestId) -> Result<Test, ApiError> {
        std::iter::once(&self.test)
            .chain(&self.archived)
            .find(|test| &test.id == id)
            .cloned()
            .ok_or_else(|| ApiError::InvalidUrl(format!("no test {id}")))
    }

    async fn submit_answers(
        &self,
        test_id: &TestId,
        answers: &AnswerSheet,
        seconds_left: u32,
        user_id: &UserId,
    ) -> Result<TestResult, ApiError> {
        let all_right = self.test.questions.iter().all(|question| {
            let picked = answers.get(&question.id).unwrap_or_default();
            question
                .answers
                .iter()
                .all(|answer| answer.correct_answer == picked.contains(&answer.id))
        });
        let score = if all_right { 30 } else { 0 };
        Ok(serde_json::from_value(serde_json::json!({
            "id": "r1",
            "testId": test_id,
            "title": self.test.title,
            "studentId": user_id,
            "courseId": self.test.course_id,
            "score": score,
            "success": all_right,
            "testDuration": self.test.time_limit_secs() - seconds_left,
            "questions": answers,
            "questionScores": {"q1": if all_right { 1 } else { 0 }},
        }))
        .unwrap())
    }

    async fn list_course_tests(&self, _course_id: &CourseId) -> Result<Vec<Test>, ApiError> {
        Ok(vec![self.test.clone()])
    }

    async fn list_completed_results(
        &self,
        _user_id: &UserId,
        _course_id: &CourseId,
    ) -> Result<Vec<TestResult>, ApiError> {
        Ok(self.completed.lock().unwrap().clone())
    }
}

#[derive(Clone)]
struct TestApp {
    take_test: Arc<TakeTestService>,
    course_tests: Arc<CourseTestsService>,
}

impl UiApp for TestApp {
    fn user_id(&self) -> UserId {
        UserId::new("u1")
    }

    fn default_course_id(&self) -> Option<CourseId> {
        Some(CourseId::new("c1"))
    }

    fn take_test(&self) -> Arc<TakeTestService> {
        Arc::clone(&self.take_test)
    }

    fn course_tests(&self) -> Arc<CourseTestsService> {
        Arc::clone(&self.course_tests)
    }
}

#[derive(Clone, PartialEq, Eq)]
pub enum ViewKind {
    Home,
    Course(String),
    TakeTest(String),
    Results,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view.clone());
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Home => rsx! { HomeView {} },
        ViewKind::Course(course_id) => rsx! { CourseTestsView { course_id } },
        ViewKind::TakeTest(test_id) => rsx! { TakeTestView { test_id } },
        ViewKind::Results => rsx! { ResultsView {} },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub store: InMemoryRepository,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn setup_view_harness(view: ViewKind, api: FakeApi) -> ViewHarness {
    let store = InMemoryRepository::new();
    let local: Arc<dyn LocalStore> = Arc::new(store.clone());
    let api: Arc<dyn TestApi> = Arc::new(api);
    let clock = Clock::fixed(fixed_now());

    let app = Arc::new(TestApp {
        take_test: Arc::new(TakeTestService::new(clock, Arc::clone(&api), Arc::clone(&local))),
        course_tests: Arc::new(CourseTestsService::new(api, local)),
    });

    let dom = VirtualDom::new_with_props(ViewRouterHarness, ViewHarnessProps { app, view });
    ViewHarness { dom, store }
}
