use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{AnswerId, CourseId, QuestionId, ResultId, TestId, UserId};

/// Errors raised while accepting a graded result from the backend.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum ResultError {
    #[error("total score is not a finite number: {0}")]
    InvalidScore(f64),
    #[error("score for question {question:?} is not a finite number: {score}")]
    InvalidQuestionScore { question: QuestionId, score: f64 },
    #[error("test duration is not a finite number: {0}")]
    InvalidDuration(f64),
}

/// What the backend recorded for a single question.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QuestionOutcome {
    pub selected: BTreeSet<AnswerId>,
    pub score: f64,
}

impl QuestionOutcome {
    #[must_use]
    pub fn is_selected(&self, answer: &AnswerId) -> bool {
        self.selected.contains(answer)
    }
}

/// A graded attempt, read-only on the client.
///
/// The backend reports selections and scores as two loosely-typed maps keyed by question id;
/// they are merged into one `QuestionOutcome` per question on the way in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TestResultPayload", into = "TestResultPayload")]
pub struct TestResult {
    id: ResultId,
    test_id: TestId,
    title: String,
    student_id: UserId,
    course_id: CourseId,
    score: f64,
    success: bool,
    duration_secs: f64,
    questions: BTreeMap<QuestionId, QuestionOutcome>,
}

impl TestResult {
    #[must_use]
    pub fn id(&self) -> &ResultId {
        &self.id
    }

    #[must_use]
    pub fn test_id(&self) -> &TestId {
        &self.test_id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn student_id(&self) -> &UserId {
        &self.student_id
    }

    #[must_use]
    pub fn course_id(&self) -> &CourseId {
        &self.course_id
    }

    /// Total score, already normalized by the backend to the fixed scale.
    #[must_use]
    pub fn score(&self) -> f64 {
        self.score
    }

    #[must_use]
    pub fn passed(&self) -> bool {
        self.success
    }

    /// Elapsed time reported for the attempt, in seconds.
    #[must_use]
    pub fn duration_secs(&self) -> f64 {
        self.duration_secs
    }

    /// Outcome for a question; questions the backend omitted count as unanswered with score 0.
    #[must_use]
    pub fn outcome(&self, question: &QuestionId) -> QuestionOutcome {
        self.questions.get(question).cloned().unwrap_or_default()
    }

    #[must_use]
    pub fn outcomes(&self) -> &BTreeMap<QuestionId, QuestionOutcome> {
        &self.questions
    }
}

/// Wire shape of `ITestResults`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResultPayload {
    pub id: ResultId,
    pub test_id: TestId,
    #[serde(default)]
    pub title: String,
    pub student_id: UserId,
    pub course_id: CourseId,
    pub score: f64,
    pub success: bool,
    #[serde(default)]
    pub questions: BTreeMap<QuestionId, Vec<AnswerId>>,
    #[serde(default)]
    pub test_duration: f64,
    #[serde(default)]
    pub question_scores: BTreeMap<QuestionId, f64>,
}

// Negative scores are backend penalties and pass through.
fn is_valid_amount(value: f64) -> bool {
    value.is_finite()
}

impl TryFrom<TestResultPayload> for TestResult {
    type Error = ResultError;

    fn try_from(payload: TestResultPayload) -> Result<Self, Self::Error> {
        if !is_valid_amount(payload.score) {
            return Err(ResultError::InvalidScore(payload.score));
        }
        if !is_valid_amount(payload.test_duration) {
            return Err(ResultError::InvalidDuration(payload.test_duration));
        }

        let mut questions: BTreeMap<QuestionId, QuestionOutcome> = BTreeMap::new();
        for (question, selected) in payload.questions {
            questions.entry(question).or_default().selected = selected.into_iter().collect();
        }
        for (question, score) in payload.question_scores {
            if !is_valid_amount(score) {
                return Err(ResultError::InvalidQuestionScore { question, score });
            }
            questions.entry(question).or_default().score = score;
        }

        Ok(Self {
            id: payload.id,
            test_id: payload.test_id,
            title: payload.title,
            student_id: payload.student_id,
            course_id: payload.course_id,
            score: payload.score,
            success: payload.success,
            duration_secs: payload.test_duration,
            questions,
        })
    }
}

impl From<TestResult> for TestResultPayload {
    fn from(result: TestResult) -> Self {
        let mut questions = BTreeMap::new();
        let mut question_scores = BTreeMap::new();
        for (question, outcome) in result.questions {
            question_scores.insert(question.clone(), outcome.score);
            questions.insert(question, outcome.selected.into_iter().collect());
        }
        Self {
            id: result.id,
            test_id: result.test_id,
            title: result.title,
            student_id: result.student_id,
            course_id: result.course_id,
            score: result.score,
            success: result.success,
            questions,
            test_duration: result.duration_secs,
            question_scores,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "id": "r1",
        "testId": "t1",
        "title": "Quiz",
        "studentId": "u1",
        "courseId": "c1",
        "score": 22.5,
        "success": true,
        "questions": {"q1": ["a1", "a3"], "q2": []},
        "testDuration": 150,
        "questionScores": {"q1": 1.5, "q3": 2}
    }"#;

    #[test]
    fn merges_selections_and_scores_per_question() {
        let result: TestResult = serde_json::from_str(SAMPLE).unwrap();
        let q1 = result.outcome(&QuestionId::new("q1"));
        assert!(q1.is_selected(&AnswerId::new("a1")));
        assert!(q1.is_selected(&AnswerId::new("a3")));
        assert!((q1.score - 1.5).abs() < f64::EPSILON);

        let q3 = result.outcome(&QuestionId::new("q3"));
        assert!(q3.selected.is_empty());
        assert!((q3.score - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_question_defaults_to_unanswered() {
        let result: TestResult = serde_json::from_str(SAMPLE).unwrap();
        let missing = result.outcome(&QuestionId::new("nope"));
        assert_eq!(missing, QuestionOutcome::default());
    }

    #[test]
    fn negative_question_score_is_kept() {
        let result: TestResult = serde_json::from_value(serde_json::json!({
            "id": "r1", "testId": "t1", "studentId": "u1", "courseId": "c1",
            "score": -0.5, "success": false,
            "questions": {"q1": ["a2"]},
            "testDuration": 60,
            "questionScores": {"q1": -0.5}
        }))
        .unwrap();
        assert!((result.score() + 0.5).abs() < f64::EPSILON);
        assert!((result.outcome(&QuestionId::new("q1")).score + 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn non_finite_question_score_is_rejected() {
        let mut payload: TestResultPayload = serde_json::from_str(SAMPLE).unwrap();
        payload.question_scores.insert(QuestionId::new("q1"), f64::NAN);
        let err = TestResult::try_from(payload).unwrap_err();
        assert!(matches!(err, ResultError::InvalidQuestionScore { .. }));
    }

    #[test]
    fn survives_cache_round_trip() {
        let result: TestResult = serde_json::from_str(SAMPLE).unwrap();
        let json = serde_json::to_string(&result).unwrap();
        let back: TestResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }
}
