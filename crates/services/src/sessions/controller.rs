use std::fmt;

use chrono::{DateTime, Utc};
use eduhub_core::model::{
    AnswerId, AnswerSheet, Attempt, AttemptSnapshot, MissingSelections, QuestionId, Test, TestId,
    TestResult, UserId,
};

use crate::error::SessionError;

/// Lifecycle of one quiz attempt. `Submitted` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Loading,
    InProgress,
    Submitted,
}

/// Everything the grading endpoint needs for one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRequest {
    pub test_id: TestId,
    pub answers: AnswerSheet,
    pub seconds_left: u32,
    pub user_id: UserId,
}

enum State {
    Loading,
    InProgress {
        test: Test,
        attempt: Attempt,
        submitting: bool,
    },
    Submitted {
        test: Test,
        attempt: Attempt,
        result: TestResult,
    },
}

/// Owns the countdown and the answer selections for a single attempt.
///
/// One session is built per attempt and dropped when the attempt is done; it is never
/// shared between views.
pub struct TestSession {
    user_id: UserId,
    state: State,
}

impl TestSession {
    /// A session waiting for its test definition.
    #[must_use]
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            state: State::Loading,
        }
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        match self.state {
            State::Loading => SessionPhase::Loading,
            State::InProgress { .. } => SessionPhase::InProgress,
            State::Submitted { .. } => SessionPhase::Submitted,
        }
    }

    #[must_use]
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    #[must_use]
    pub fn test(&self) -> Option<&Test> {
        match &self.state {
            State::Loading => None,
            State::InProgress { test, .. } | State::Submitted { test, .. } => Some(test),
        }
    }

    #[must_use]
    pub fn attempt(&self) -> Option<&Attempt> {
        match &self.state {
            State::Loading => None,
            State::InProgress { attempt, .. } | State::Submitted { attempt, .. } => Some(attempt),
        }
    }

    #[must_use]
    pub fn result(&self) -> Option<&TestResult> {
        match &self.state {
            State::Submitted { result, .. } => Some(result),
            _ => None,
        }
    }

    #[must_use]
    pub fn remaining_secs(&self) -> Option<u32> {
        self.attempt()
            .map(|attempt| attempt.countdown().remaining_secs())
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.attempt()
            .is_some_and(|attempt| attempt.countdown().is_expired())
    }

    /// True while a submission is outstanding.
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        matches!(self.state, State::InProgress { submitting: true, .. })
    }

    #[must_use]
    pub fn is_selected(&self, question: &QuestionId, answer: &AnswerId) -> bool {
        self.attempt()
            .is_some_and(|attempt| attempt.is_selected(question, answer))
    }

    /// `Loading → InProgress` with a fresh attempt.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AlreadyStarted` outside `Loading`, or an attempt error when
    /// the test repeats a question id.
    pub fn begin(&mut self, test: Test) -> Result<(), SessionError> {
        self.ensure_loading()?;
        let attempt = Attempt::new(&test, self.user_id.clone())?;
        self.state = State::InProgress {
            test,
            attempt,
            submitting: false,
        };
        Ok(())
    }

    /// `Loading → InProgress` continuing a mirrored attempt.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AlreadyStarted` outside `Loading`, or an attempt error when the
    /// snapshot does not belong to this test and user.
    pub fn resume(&mut self, test: Test, snapshot: &AttemptSnapshot) -> Result<(), SessionError> {
        self.ensure_loading()?;
        let attempt = Attempt::restore(&test, snapshot, &self.user_id)?;
        self.state = State::InProgress {
            test,
            attempt,
            submitting: false,
        };
        Ok(())
    }

    fn ensure_loading(&self) -> Result<(), SessionError> {
        match self.state {
            State::Loading => Ok(()),
            _ => Err(SessionError::AlreadyStarted),
        }
    }

    /// Select or deselect one answer.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Loading`/`Submitted` outside `InProgress`, or an attempt error
    /// for ids the test does not contain.
    pub fn toggle(
        &mut self,
        question: &QuestionId,
        answer: &AnswerId,
        selected: bool,
    ) -> Result<(), SessionError> {
        match &mut self.state {
            State::Loading => Err(SessionError::Loading),
            State::Submitted { .. } => Err(SessionError::Submitted),
            State::InProgress { test, attempt, .. } => {
                attempt.toggle(test, question, answer, selected)?;
                Ok(())
            }
        }
    }

    /// One timer period. Returns `true` when the remaining time changed.
    pub fn tick(&mut self) -> bool {
        match &mut self.state {
            State::InProgress { attempt, .. } => attempt.tick(),
            _ => false,
        }
    }

    #[must_use]
    pub fn missing_selections(&self) -> Option<MissingSelections> {
        match &self.state {
            State::InProgress { attempt, .. } => attempt.missing_selections(),
            _ => None,
        }
    }

    /// Validate the attempt and take the submission latch.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Incomplete` when a question has no selection,
    /// `SessionError::SubmissionInFlight` while a previous submission is outstanding, and
    /// `Loading`/`Submitted` outside `InProgress`.
    pub fn begin_submission(&mut self) -> Result<SubmissionRequest, SessionError> {
        let user_id = self.user_id.clone();
        match &mut self.state {
            State::Loading => Err(SessionError::Loading),
            State::Submitted { .. } => Err(SessionError::Submitted),
            State::InProgress {
                submitting: true, ..
            } => Err(SessionError::SubmissionInFlight),
            State::InProgress {
                test,
                attempt,
                submitting,
            } => {
                if let Some(missing) = attempt.missing_selections() {
                    return Err(SessionError::Incomplete(missing));
                }
                *submitting = true;
                Ok(SubmissionRequest {
                    test_id: test.id.clone(),
                    answers: attempt.answer_sheet(),
                    seconds_left: attempt.countdown().remaining_secs(),
                    user_id,
                })
            }
        }
    }

    /// Release the latch after a failed submission; the attempt stays editable.
    pub fn abort_submission(&mut self) {
        if let State::InProgress { submitting, .. } = &mut self.state {
            *submitting = false;
        }
    }

    /// `InProgress → Submitted` with the graded result.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::ForeignResult` (releasing the latch) when the result is for a
    /// different test, and `Loading`/`Submitted` outside `InProgress`.
    pub fn complete_submission(&mut self, result: TestResult) -> Result<(), SessionError> {
        match &self.state {
            State::Loading => return Err(SessionError::Loading),
            State::Submitted { .. } => return Err(SessionError::Submitted),
            State::InProgress { test, .. } if result.test_id() != &test.id => {
                let expected = test.id.clone();
                self.abort_submission();
                return Err(SessionError::ForeignResult {
                    expected,
                    result: result.test_id().clone(),
                });
            }
            State::InProgress { .. } => {}
        }

        if let State::InProgress { test, attempt, .. } =
            std::mem::replace(&mut self.state, State::Loading)
        {
            self.state = State::Submitted {
                test,
                attempt,
                result,
            };
        }
        Ok(())
    }

    /// State to mirror; only an attempt in progress is mirrored.
    #[must_use]
    pub fn snapshot(&self, saved_at: DateTime<Utc>) -> Option<AttemptSnapshot> {
        match &self.state {
            State::InProgress { attempt, .. } => Some(attempt.snapshot(saved_at)),
            _ => None,
        }
    }
}

impl fmt::Debug for TestSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestSession")
            .field("user_id", &self.user_id)
            .field("phase", &self.phase())
            .field("test_id", &self.test().map(|test| &test.id))
            .field("remaining_secs", &self.remaining_secs())
            .field("submitting", &self.is_submitting())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
