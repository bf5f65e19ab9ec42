use std::sync::Arc;

use eduhub_core::model::{CourseId, UserId};
use services::{CourseTestsService, TakeTestService};

pub trait UiApp: Send + Sync {
    fn user_id(&self) -> UserId;
    fn default_course_id(&self) -> Option<CourseId>;

    fn take_test(&self) -> Arc<TakeTestService>;
    fn course_tests(&self) -> Arc<CourseTestsService>;
}

#[derive(Clone)]
pub struct AppContext {
    user_id: UserId,
    default_course_id: Option<CourseId>,

    take_test: Arc<TakeTestService>,
    course_tests: Arc<CourseTestsService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            user_id: app.user_id(),
            default_course_id: app.default_course_id(),
            take_test: app.take_test(),
            course_tests: app.course_tests(),
        }
    }

    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id.clone()
    }

    #[must_use]
    pub fn default_course_id(&self) -> Option<CourseId> {
        self.default_course_id.clone()
    }

    #[must_use]
    pub fn take_test(&self) -> Arc<TakeTestService> {
        Arc::clone(&self.take_test)
    }

    #[must_use]
    pub fn course_tests(&self) -> Arc<CourseTestsService> {
        Arc::clone(&self.course_tests)
    }
}

// This context is provided by the application composition root (`crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
