mod attempt;
mod countdown;
mod definition;
mod ids;
mod result;

pub use attempt::{
    AnswerSelection, AnswerSheet, Attempt, AttemptError, AttemptSnapshot, MissingSelections,
};
pub use countdown::Countdown;
pub use definition::{
    Answer, MAX_ANSWER_TEXT_LEN, MAX_ANSWERS, MAX_QUESTION_TEXT_LEN, MAX_QUESTIONS, MAX_TITLE_LEN,
    MIN_ANSWERS, MIN_AVAILABLE_MINUTES, MIN_POINTS, Question, Test, TestError,
};
pub use ids::{AnswerId, CourseId, ParseIdError, QuestionId, ResultId, SubjectId, TestId, UserId};
pub use result::{QuestionOutcome, ResultError, TestResult, TestResultPayload};
