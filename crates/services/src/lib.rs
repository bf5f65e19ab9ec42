#![forbid(unsafe_code)]

pub mod api;
pub mod course_service;
pub mod error;
pub mod sessions;

pub use eduhub_core::Clock;

pub use api::{ApiConfig, HttpTestApi, TestApi};
pub use course_service::{CourseOverview, CourseTestsService};
pub use error::{ApiError, SessionError};
pub use sessions::{
    AttemptMirror, ResultCache, SessionPhase, SubmissionGateway, SubmissionRequest,
    TakeTestService, TestSession,
};
