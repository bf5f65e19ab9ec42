use eduhub_core::model::{AnswerId, AttemptSnapshot, QuestionId, Test, TestId, TestResult, UserId};
use services::{SessionError, SessionPhase, SubmissionRequest, TakeTestService, TestSession};

use crate::views::ViewError;
use crate::vm::time_fmt::format_countdown;

/// Inline message under a question with no selection.
pub const SELECTION_REQUIRED: &str = "Choose at least 1 answer.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnswerOptionVm {
    pub id: AnswerId,
    pub text: String,
    pub selected: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionVm {
    pub id: QuestionId,
    pub number: usize,
    pub text: String,
    pub points: u32,
    pub options: Vec<AnswerOptionVm>,
    pub error: Option<&'static str>,
}

pub struct TakeTestVm {
    session: TestSession,
    show_validation: bool,
}

impl TakeTestVm {
    #[must_use]
    pub fn new(session: TestSession) -> Self {
        Self {
            session,
            show_validation: false,
        }
    }

    #[must_use]
    pub fn session(&self) -> &TestSession {
        &self.session
    }

    #[must_use]
    pub fn title(&self) -> &str {
        self.session.test().map_or("", |test| test.title.as_str())
    }

    #[must_use]
    pub fn countdown_label(&self) -> String {
        let remaining = self.session.remaining_secs().unwrap_or(0);
        format!("Submit before: {}", format_countdown(remaining))
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.session.is_expired()
    }

    /// Checkboxes stay editable until the attempt is graded.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.session.phase() != SessionPhase::InProgress
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.session.is_submitting()
    }

    #[must_use]
    pub fn questions(&self) -> Vec<QuestionVm> {
        let Some(test) = self.session.test() else {
            return Vec::new();
        };
        let missing = if self.show_validation {
            self.session.missing_selections()
        } else {
            None
        };

        test.questions
            .iter()
            .enumerate()
            .map(|(index, question)| QuestionVm {
                id: question.id.clone(),
                number: index + 1,
                text: question.question_text.clone(),
                points: question.points,
                options: question
                    .answers
                    .iter()
                    .map(|answer| AnswerOptionVm {
                        id: answer.id.clone(),
                        text: answer.text.clone(),
                        selected: self.session.is_selected(&question.id, &answer.id),
                    })
                    .collect(),
                error: missing
                    .as_ref()
                    .is_some_and(|missing| missing.contains(&question.id))
                    .then_some(SELECTION_REQUIRED),
            })
            .collect()
    }

    /// Apply a checkbox change and return the state to mirror.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::Unknown` when the session rejects the change.
    pub fn toggle(
        &mut self,
        service: &TakeTestService,
        question: &QuestionId,
        answer: &AnswerId,
        selected: bool,
    ) -> Result<Option<AttemptSnapshot>, ViewError> {
        self.session
            .toggle(question, answer, selected)
            .map_err(|err| ViewError::from_session(&err))?;
        Ok(service.snapshot(&self.session))
    }

    /// One timer period; returns the state to mirror when the countdown moved.
    pub fn tick(&mut self, service: &TakeTestService) -> Option<AttemptSnapshot> {
        if self.session.tick() {
            service.snapshot(&self.session)
        } else {
            None
        }
    }

    /// Validate and take the submission latch. `Ok(None)` while a submission is in flight.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::Incomplete` when any question has no selection.
    pub fn begin_submission(&mut self) -> Result<Option<SubmissionRequest>, ViewError> {
        self.show_validation = true;
        match self.session.begin_submission() {
            Ok(request) => Ok(Some(request)),
            Err(SessionError::SubmissionInFlight) => Ok(None),
            Err(err) => Err(ViewError::from_session(&err)),
        }
    }

    /// Apply the submission outcome. On success returns the graded pair to cache.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::Submit` when the submission failed; the attempt stays editable.
    pub fn settle(
        &mut self,
        service: &TakeTestService,
        outcome: Result<TestResult, SessionError>,
    ) -> Result<(Test, TestResult), ViewError> {
        let result = service
            .settle(&mut self.session, outcome)
            .map_err(|err| ViewError::from_session(&err))?;
        let test = self.session.test().cloned().ok_or(ViewError::Unknown)?;
        Ok((test, result))
    }
}

/// # Errors
///
/// Returns `ViewError::LoadTest` when the test cannot be fetched.
pub async fn open_test(
    service: &TakeTestService,
    test_id: &TestId,
    user_id: UserId,
) -> Result<TakeTestVm, ViewError> {
    let session = service.open(test_id, user_id).await.map_err(|err| {
        tracing::warn!(test = %test_id, error = %err, "failed to open test");
        match err {
            SessionError::Fetch(_) => ViewError::LoadTest,
            other => ViewError::from_session(&other),
        }
    })?;
    Ok(TakeTestVm::new(session))
}
