use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::countdown::Countdown;
use crate::model::definition::Test;
use crate::model::ids::{AnswerId, QuestionId, TestId, UserId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AttemptError {
    #[error("question {0:?} is not part of this test")]
    UnknownQuestion(QuestionId),
    #[error("answer {answer:?} does not belong to question {question:?}")]
    UnknownAnswer { question: QuestionId, answer: AnswerId },
    #[error("question {0:?} appears more than once in the test")]
    DuplicateQuestion(QuestionId),
    #[error("mirrored attempt belongs to another test")]
    ForeignSnapshot,
    #[error("mirrored attempt belongs to another user")]
    ForeignOwner,
    #[error("mirrored attempt does not cover the same questions as the test")]
    QuestionSetMismatch,
}

/// Questions a submission was refused for, in test order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingSelections(pub Vec<QuestionId>);

impl fmt::Display for MissingSelections {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, question) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{question}")?;
        }
        Ok(())
    }
}

impl MissingSelections {
    #[must_use]
    pub fn contains(&self, question: &QuestionId) -> bool {
        self.0.contains(question)
    }
}

//
// ─── ANSWER SHEET ──────────────────────────────────────────────────────────────
//

/// Submission body: question id to the answer ids picked for it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSheet(BTreeMap<QuestionId, Vec<AnswerId>>);

impl AnswerSheet {
    #[must_use]
    pub fn get(&self, question: &QuestionId) -> Option<&[AnswerId]> {
        self.0.get(question).map(Vec::as_slice)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

//
// ─── SNAPSHOT ──────────────────────────────────────────────────────────────────
//

/// Selections for one question as they appear in the mirrored form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerSelection {
    pub question_id: QuestionId,
    pub selected_answers: Vec<AnswerId>,
}

/// Serialized attempt state kept in the durable local mirror.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptSnapshot {
    pub test_id: TestId,
    pub user_id: UserId,
    pub seconds_left: u32,
    pub answers: Vec<AnswerSelection>,
    pub saved_at: DateTime<Utc>,
}

//
// ─── ATTEMPT ───────────────────────────────────────────────────────────────────
//

/// In-progress answers for one test: exactly one selection set per question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    test_id: TestId,
    user_id: UserId,
    order: Vec<QuestionId>,
    selections: BTreeMap<QuestionId, BTreeSet<AnswerId>>,
    countdown: Countdown,
}

impl Attempt {
    /// Open a fresh attempt with empty selections and the full time limit.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::DuplicateQuestion` if two questions share an id.
    pub fn new(test: &Test, user_id: UserId) -> Result<Self, AttemptError> {
        if let Some(question) = test.duplicate_question() {
            return Err(AttemptError::DuplicateQuestion(question.clone()));
        }
        let order: Vec<QuestionId> = test.question_ids().cloned().collect();
        let selections = order
            .iter()
            .map(|id| (id.clone(), BTreeSet::new()))
            .collect();
        Ok(Self {
            test_id: test.id.clone(),
            user_id,
            order,
            selections,
            countdown: Countdown::from_minutes(test.available_minutes),
        })
    }

    /// Rebuild an attempt from a mirrored snapshot.
    ///
    /// Answer ids the question no longer offers are dropped.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::ForeignSnapshot`/`ForeignOwner` when the snapshot was taken
    /// for another test or user, and `AttemptError::QuestionSetMismatch` when it does not
    /// cover exactly the test's questions.
    pub fn restore(
        test: &Test,
        snapshot: &AttemptSnapshot,
        user_id: &UserId,
    ) -> Result<Self, AttemptError> {
        if snapshot.test_id != test.id {
            return Err(AttemptError::ForeignSnapshot);
        }
        if &snapshot.user_id != user_id {
            return Err(AttemptError::ForeignOwner);
        }
        let mut attempt = Self::new(test, user_id.clone())?;

        let mirrored: BTreeSet<&QuestionId> = snapshot
            .answers
            .iter()
            .map(|selection| &selection.question_id)
            .collect();
        let expected: BTreeSet<&QuestionId> = attempt.order.iter().collect();
        if mirrored != expected || snapshot.answers.len() != attempt.order.len() {
            return Err(AttemptError::QuestionSetMismatch);
        }

        for selection in &snapshot.answers {
            let Some(question) = test.question(&selection.question_id) else {
                return Err(AttemptError::QuestionSetMismatch);
            };
            let kept = selection
                .selected_answers
                .iter()
                .filter(|answer| question.has_answer(answer))
                .cloned()
                .collect();
            attempt.selections.insert(selection.question_id.clone(), kept);
        }
        attempt.countdown = Countdown::from_remaining(snapshot.seconds_left);
        Ok(attempt)
    }

    #[must_use]
    pub fn test_id(&self) -> &TestId {
        &self.test_id
    }

    #[must_use]
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    #[must_use]
    pub fn countdown(&self) -> Countdown {
        self.countdown
    }

    /// Question ids covered by this attempt, in test order.
    #[must_use]
    pub fn question_ids(&self) -> &[QuestionId] {
        &self.order
    }

    #[must_use]
    pub fn selected(&self, question: &QuestionId) -> Option<&BTreeSet<AnswerId>> {
        self.selections.get(question)
    }

    #[must_use]
    pub fn is_selected(&self, question: &QuestionId, answer: &AnswerId) -> bool {
        self.selections
            .get(question)
            .is_some_and(|set| set.contains(answer))
    }

    /// Add or remove an answer from a question's selection set.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::UnknownQuestion`/`UnknownAnswer` for ids outside the test.
    pub fn toggle(
        &mut self,
        test: &Test,
        question: &QuestionId,
        answer: &AnswerId,
        selected: bool,
    ) -> Result<(), AttemptError> {
        let definition = test
            .question(question)
            .ok_or_else(|| AttemptError::UnknownQuestion(question.clone()))?;
        if !definition.has_answer(answer) {
            return Err(AttemptError::UnknownAnswer {
                question: question.clone(),
                answer: answer.clone(),
            });
        }
        let set = self
            .selections
            .get_mut(question)
            .ok_or_else(|| AttemptError::UnknownQuestion(question.clone()))?;
        if selected {
            set.insert(answer.clone());
        } else {
            set.remove(answer);
        }
        Ok(())
    }

    /// Advance the countdown by one second.
    pub fn tick(&mut self) -> bool {
        self.countdown.tick()
    }

    /// Questions with no selected answer, in test order.
    #[must_use]
    pub fn missing_selections(&self) -> Option<MissingSelections> {
        let missing: Vec<QuestionId> = self
            .order
            .iter()
            .filter(|id| self.selections.get(*id).is_none_or(BTreeSet::is_empty))
            .cloned()
            .collect();
        (!missing.is_empty()).then_some(MissingSelections(missing))
    }

    #[must_use]
    pub fn answer_sheet(&self) -> AnswerSheet {
        AnswerSheet(
            self.selections
                .iter()
                .map(|(question, answers)| (question.clone(), answers.iter().cloned().collect()))
                .collect(),
        )
    }

    #[must_use]
    pub fn snapshot(&self, saved_at: DateTime<Utc>) -> AttemptSnapshot {
        let answers = self
            .order
            .iter()
            .map(|id| AnswerSelection {
                question_id: id.clone(),
                selected_answers: self
                    .selections
                    .get(id)
                    .map(|set| set.iter().cloned().collect())
                    .unwrap_or_default(),
            })
            .collect();
        AttemptSnapshot {
            test_id: self.test_id.clone(),
            user_id: self.user_id.clone(),
            seconds_left: self.countdown.remaining_secs(),
            answers,
            saved_at,
        }
    }
}
