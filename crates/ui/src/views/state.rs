use dioxus::prelude::*;
use services::SessionError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    LoadTest,
    LoadCourse,
    Submit,
    Incomplete,
    MissingResult,
    Unknown,
}

impl ViewError {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            ViewError::LoadTest => "Loading test failed. Please try again.",
            ViewError::LoadCourse => "Loading course failed. Please try again.",
            ViewError::Submit => "An error occurred while sending test results.",
            ViewError::Incomplete => "Every question needs at least one answer.",
            ViewError::MissingResult => "No test result to show.",
            ViewError::Unknown => "Something went wrong. Please try again.",
        }
    }

    /// Map a workflow error onto the message shown at the UI boundary.
    #[must_use]
    pub fn from_session(err: &SessionError) -> Self {
        match err {
            SessionError::Fetch(_) => ViewError::LoadTest,
            SessionError::Submit(_) | SessionError::ForeignResult { .. } => ViewError::Submit,
            SessionError::Incomplete(_) => ViewError::Incomplete,
            _ => ViewError::Unknown,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Error(ViewError),
}

#[must_use]
pub fn view_state_from_resource<T: Clone>(
    resource: Resource<Result<T, ViewError>>,
) -> ViewState<T> {
    match resource.state().cloned() {
        UseResourceState::Pending => ViewState::Loading,
        UseResourceState::Ready => match resource.value().read().as_ref() {
            Some(Ok(data)) => ViewState::Ready(data.clone()),
            Some(Err(err)) => ViewState::Error(*err),
            None => ViewState::Error(ViewError::Unknown),
        },
        UseResourceState::Paused | UseResourceState::Stopped => ViewState::Idle,
    }
}
