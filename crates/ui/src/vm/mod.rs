mod results_vm;
mod stats_vm;
mod take_test_vm;
mod time_fmt;

pub use results_vm::{
    GradedAnswerVm, GradedQuestionVm, LEGEND, ResultsVm, answer_class, map_results,
};
pub use stats_vm::{
    CompletedRowVm, CourseTestRowVm, CourseVm, EMPTY_LIST, NO_RESULTS, RESULTS_UNAVAILABLE,
    StatisticsVm, TESTS_UNAVAILABLE, map_course, map_statistics,
};
pub use take_test_vm::{AnswerOptionVm, QuestionVm, SELECTION_REQUIRED, TakeTestVm, open_test};
pub use time_fmt::{format_countdown, format_decimal, format_minutes, format_score};
