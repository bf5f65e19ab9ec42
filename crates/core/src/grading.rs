//! Display classification of a graded attempt.
//!
//! Nothing here recomputes scores: awarded points come from the backend, and this module
//! only derives per-answer marks and scaled point labels from `(Test, TestResult)`.

use thiserror::Error;

use crate::model::{
    AnswerId, CourseId, Question, QuestionId, QuestionOutcome, Test, TestId, TestResult,
};

/// Fixed scale every total score is normalized to.
pub const SCORE_SCALE: f64 = 30.0;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GradingError {
    #[error("result belongs to test {result:?}, not {test:?}")]
    TestMismatch { test: TestId, result: TestId },
}

/// How a single answer is highlighted on the result page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnswerMark {
    /// Correct and picked.
    CorrectSelected,
    /// Wrong and picked.
    IncorrectSelected,
    /// Correct, not picked, and the question also has a wrong pick.
    MissedWithWrongSelected,
    /// Correct, not picked, but another correct answer was picked (and nothing wrong).
    MissedWithCorrectSelected,
    /// Correct and nothing at all was picked on the question.
    MissedAlone,
    /// Wrong and not picked.
    Neutral,
}

impl AnswerMark {
    /// True for the marks drawn in the red family.
    #[must_use]
    pub fn is_red_family(self) -> bool {
        matches!(
            self,
            AnswerMark::IncorrectSelected
                | AnswerMark::MissedWithWrongSelected
                | AnswerMark::MissedAlone
        )
    }
}

/// Classify one answer given what was picked on its question.
///
/// A wrong pick anywhere on the question outranks other correct picks when deciding how a
/// missed correct answer is drawn.
#[must_use]
pub fn classify_answer(
    question: &Question,
    outcome: &QuestionOutcome,
    answer: &AnswerId,
) -> AnswerMark {
    let selected = outcome.is_selected(answer);
    let correct = question
        .answer(answer)
        .is_some_and(|definition| definition.correct_answer);

    match (correct, selected) {
        (true, true) => AnswerMark::CorrectSelected,
        (false, true) => AnswerMark::IncorrectSelected,
        (false, false) => AnswerMark::Neutral,
        (true, false) => {
            let picked = question
                .answers
                .iter()
                .filter(|candidate| outcome.is_selected(&candidate.id));
            let (mut wrong, mut right) = (false, false);
            for candidate in picked {
                if candidate.correct_answer {
                    right = true;
                } else {
                    wrong = true;
                }
            }
            if wrong {
                AnswerMark::MissedWithWrongSelected
            } else if right {
                AnswerMark::MissedWithCorrectSelected
            } else {
                AnswerMark::MissedAlone
            }
        }
    }
}

/// Round half away from zero to two decimals.
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `points / total_points × SCORE_SCALE`, rounded to 2 decimals; zero when the test has no weight.
#[must_use]
pub fn scaled_points(points: f64, total_points: u32) -> f64 {
    if total_points == 0 {
        return 0.0;
    }
    round2(points / f64::from(total_points) * SCORE_SCALE)
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnswerReport {
    pub answer_id: AnswerId,
    pub text: String,
    pub selected: bool,
    pub mark: AnswerMark,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuestionReport {
    pub question_id: QuestionId,
    /// 1-based position in the test.
    pub number: usize,
    pub text: String,
    pub points: u32,
    /// Question weight on the fixed scale.
    pub weight: f64,
    /// Backend-awarded score, unscaled.
    pub awarded: f64,
    /// Backend-awarded score on the fixed scale.
    pub awarded_scaled: f64,
    pub answers: Vec<AnswerReport>,
}

impl QuestionReport {
    #[must_use]
    pub fn earned_points(&self) -> bool {
        self.awarded > 0.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultReport {
    pub test_id: TestId,
    pub course_id: CourseId,
    pub title: String,
    pub score: f64,
    pub scale: f64,
    pub passed: bool,
    pub duration_minutes: f64,
    pub total_points: u32,
    pub questions: Vec<QuestionReport>,
}

/// Build the full result page model for a graded attempt.
///
/// # Errors
///
/// Returns `GradingError::TestMismatch` when the result was graded for another test.
pub fn render_result(test: &Test, result: &TestResult) -> Result<ResultReport, GradingError> {
    if result.test_id() != &test.id {
        return Err(GradingError::TestMismatch {
            test: test.id.clone(),
            result: result.test_id().clone(),
        });
    }

    let total_points = test.total_points();
    let questions = test
        .questions
        .iter()
        .enumerate()
        .map(|(index, question)| {
            let outcome = result.outcome(&question.id);
            let answers = question
                .answers
                .iter()
                .map(|answer| AnswerReport {
                    answer_id: answer.id.clone(),
                    text: answer.text.clone(),
                    selected: outcome.is_selected(&answer.id),
                    mark: classify_answer(question, &outcome, &answer.id),
                })
                .collect();
            QuestionReport {
                question_id: question.id.clone(),
                number: index + 1,
                text: question.question_text.clone(),
                points: question.points,
                weight: scaled_points(f64::from(question.points), total_points),
                awarded: outcome.score,
                awarded_scaled: scaled_points(outcome.score, total_points),
                answers,
            }
        })
        .collect();

    Ok(ResultReport {
        test_id: test.id.clone(),
        course_id: test.course_id.clone(),
        title: test.title.clone(),
        score: result.score(),
        scale: SCORE_SCALE,
        passed: result.passed(),
        duration_minutes: round2(result.duration_secs() / 60.0),
        total_points,
        questions,
    })
}
