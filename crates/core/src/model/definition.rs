use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{AnswerId, CourseId, QuestionId, SubjectId, TestId};

//
// ─── AUTHORING LIMITS ─────────────────────────────────────────────────────────
//

pub const MAX_TITLE_LEN: usize = 60;
pub const MIN_AVAILABLE_MINUTES: u32 = 20;
pub const MAX_QUESTIONS: usize = 20;
pub const MAX_QUESTION_TEXT_LEN: usize = 400;
pub const MIN_POINTS: u32 = 1;
pub const MIN_ANSWERS: usize = 3;
pub const MAX_ANSWERS: usize = 4;
pub const MAX_ANSWER_TEXT_LEN: usize = 100;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

/// Authoring-rule violations for a test definition.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TestError {
    #[error("title is required")]
    EmptyTitle,
    #[error("title must be at most {MAX_TITLE_LEN} characters (got {len})")]
    TitleTooLong { len: usize },
    #[error("available minutes must be at least {MIN_AVAILABLE_MINUTES} (got {minutes})")]
    TooShort { minutes: u32 },
    #[error("a test needs at least one question")]
    NoQuestions,
    #[error("a test can have at most {MAX_QUESTIONS} questions (got {count})")]
    TooManyQuestions { count: usize },
    #[error("question {question:?} appears more than once")]
    DuplicateQuestion { question: QuestionId },
    #[error("question {question:?} has no text")]
    EmptyQuestionText { question: QuestionId },
    #[error("question {question:?} text is longer than {MAX_QUESTION_TEXT_LEN} characters")]
    QuestionTextTooLong { question: QuestionId },
    #[error("question {question:?} must be worth at least {MIN_POINTS} point")]
    NoPoints { question: QuestionId },
    #[error("question {question:?} must have {MIN_ANSWERS} to {MAX_ANSWERS} answers (got {count})")]
    AnswerCount { question: QuestionId, count: usize },
    #[error("answer {answer:?} of question {question:?} is invalid")]
    InvalidAnswer { question: QuestionId, answer: AnswerId },
    #[error("answer {answer:?} appears more than once in question {question:?}")]
    DuplicateAnswer { question: QuestionId, answer: AnswerId },
    #[error("question {question:?} has no correct answer")]
    NoCorrectAnswer { question: QuestionId },
}

//
// ─── ANSWER ───────────────────────────────────────────────────────────────────
//

/// One multiple-choice option.
///
/// `correct_answer` is only meaningful when rendering a graded result; during an attempt
/// the client never reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub id: AnswerId,
    pub text: String,
    #[serde(default)]
    pub correct_answer: bool,
}

impl Answer {
    #[must_use]
    pub fn new(id: AnswerId, text: impl Into<String>, correct_answer: bool) -> Self {
        Self {
            id,
            text: text.into(),
            correct_answer,
        }
    }
}

//
// ─── QUESTION ─────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: QuestionId,
    pub question_text: String,
    pub points: u32,
    pub answers: Vec<Answer>,
}

impl Question {
    #[must_use]
    pub fn new(
        id: QuestionId,
        question_text: impl Into<String>,
        points: u32,
        answers: Vec<Answer>,
    ) -> Self {
        Self {
            id,
            question_text: question_text.into(),
            points,
            answers,
        }
    }

    #[must_use]
    pub fn answer(&self, id: &AnswerId) -> Option<&Answer> {
        self.answers.iter().find(|answer| &answer.id == id)
    }

    #[must_use]
    pub fn has_answer(&self, id: &AnswerId) -> bool {
        self.answer(id).is_some()
    }

    fn check_authoring(&self) -> Result<(), TestError> {
        let question = || self.id.clone();

        let text = self.question_text.trim();
        if text.is_empty() {
            return Err(TestError::EmptyQuestionText {
                question: question(),
            });
        }
        if text.chars().count() > MAX_QUESTION_TEXT_LEN {
            return Err(TestError::QuestionTextTooLong {
                question: question(),
            });
        }
        if self.points < MIN_POINTS {
            return Err(TestError::NoPoints {
                question: question(),
            });
        }
        if !(MIN_ANSWERS..=MAX_ANSWERS).contains(&self.answers.len()) {
            return Err(TestError::AnswerCount {
                question: question(),
                count: self.answers.len(),
            });
        }

        let mut seen = HashSet::with_capacity(self.answers.len());
        for answer in &self.answers {
            let text = answer.text.trim();
            if text.is_empty() || text.chars().count() > MAX_ANSWER_TEXT_LEN {
                return Err(TestError::InvalidAnswer {
                    question: question(),
                    answer: answer.id.clone(),
                });
            }
            if !seen.insert(&answer.id) {
                return Err(TestError::DuplicateAnswer {
                    question: question(),
                    answer: answer.id.clone(),
                });
            }
        }

        if !self.answers.iter().any(|answer| answer.correct_answer) {
            return Err(TestError::NoCorrectAnswer {
                question: question(),
            });
        }
        Ok(())
    }
}

//
// ─── TEST ─────────────────────────────────────────────────────────────────────
//

/// A quiz definition as served by `GET /tests/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Test {
    pub id: TestId,
    pub title: String,
    pub course_id: CourseId,
    pub subject_id: SubjectId,
    pub available_minutes: u32,
    pub questions: Vec<Question>,
}

impl Test {
    #[must_use]
    pub fn question(&self, id: &QuestionId) -> Option<&Question> {
        self.questions.iter().find(|question| &question.id == id)
    }

    /// Question ids in presentation order.
    pub fn question_ids(&self) -> impl Iterator<Item = &QuestionId> {
        self.questions.iter().map(|question| &question.id)
    }

    /// Sum of all question weights.
    #[must_use]
    pub fn total_points(&self) -> u32 {
        self.questions
            .iter()
            .fold(0_u32, |sum, question| sum.saturating_add(question.points))
    }

    /// Time limit in seconds.
    #[must_use]
    pub fn time_limit_secs(&self) -> u32 {
        self.available_minutes.saturating_mul(60)
    }

    /// Returns the first question id that appears more than once, if any.
    #[must_use]
    pub fn duplicate_question(&self) -> Option<&QuestionId> {
        let mut seen = HashSet::with_capacity(self.questions.len());
        self.question_ids().find(|id| !seen.insert(*id))
    }

    /// Check the rules a test must satisfy when it is authored.
    ///
    /// These are not re-enforced while taking a test.
    ///
    /// # Errors
    ///
    /// Returns the first `TestError` found, in document order.
    pub fn check_authoring(&self) -> Result<(), TestError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(TestError::EmptyTitle);
        }
        let len = title.chars().count();
        if len > MAX_TITLE_LEN {
            return Err(TestError::TitleTooLong { len });
        }
        if self.available_minutes < MIN_AVAILABLE_MINUTES {
            return Err(TestError::TooShort {
                minutes: self.available_minutes,
            });
        }
        if self.questions.is_empty() {
            return Err(TestError::NoQuestions);
        }
        if self.questions.len() > MAX_QUESTIONS {
            return Err(TestError::TooManyQuestions {
                count: self.questions.len(),
            });
        }
        if let Some(question) = self.duplicate_question() {
            return Err(TestError::DuplicateQuestion {
                question: question.clone(),
            });
        }
        self.questions.iter().try_for_each(Question::check_authoring)
    }
}
