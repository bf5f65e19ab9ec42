mod controller;
mod gateway;
mod mirror;
mod result_cache;
mod workflow;

// Public API of the test-taking subsystem.
pub use crate::error::SessionError;
pub use controller::{SessionPhase, SubmissionRequest, TestSession};
pub use gateway::SubmissionGateway;
pub use mirror::{AttemptMirror, TAKE_TEST_FORM_KEY};
pub use result_cache::{LAST_RESULT_KEY, LAST_TEST_KEY, ResultCache};
pub use workflow::TakeTestService;
