mod home;
mod results;
mod state;

#[cfg(test)]
pub(crate) mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use course_tests::{CoursePage, CourseTestsView, StatisticsPanel};
pub use home::HomeView;
pub use results::{AnswerLegend, ResultsPage, ResultsView};
pub use state::{ViewError, ViewState, view_state_from_resource};
pub use take_test::{QuestionCard, TakeTestView};
