use course_core::model::{
    AnswerFeedback, InvalidQuizError, LessonId, QuizResult, QuizSession, QuizSessionError,
};
use storage::repository::AttemptId;

/// A quiz being played for one lesson.
///
/// Wraps the session so the persisted attempt id travels with it and is
/// cleared on retake.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizRun {
    lesson_id: LessonId,
    session: QuizSession,
    attempt_id: Option<AttemptId>,
}

impl QuizRun {
    #[must_use]
    pub fn new(lesson_id: LessonId, session: QuizSession) -> Self {
        Self {
            lesson_id,
            session,
            attempt_id: None,
        }
    }

    #[must_use]
    pub fn lesson_id(&self) -> LessonId {
        self.lesson_id
    }

    #[must_use]
    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    #[must_use]
    pub fn attempt_id(&self) -> Option<AttemptId> {
        self.attempt_id
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.session.is_completed()
    }

    /// # Errors
    ///
    /// Propagates `QuizSessionError` from the session, including `AlreadyAnswered`.
    pub fn select_answer(
        &mut self,
        question: usize,
        option: usize,
    ) -> Result<AnswerFeedback, QuizSessionError> {
        self.session.select_answer(question, option)
    }

    pub fn go_to(&mut self, index: usize) {
        self.session.go_to(index);
    }

    pub fn next(&mut self) {
        self.session.next();
    }

    pub fn previous(&mut self) {
        self.session.previous();
    }

    pub(crate) fn session_mut(&mut self) -> &mut QuizSession {
        &mut self.session
    }

    pub(crate) fn set_attempt_id(&mut self, id: Option<AttemptId>) {
        self.attempt_id = id;
    }
}

/// Why a quiz lesson cannot be played.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizUnavailable {
    /// Payload missing or not yet a quiz; `note` is any free text it carried.
    ComingSoon { note: Option<String> },
    /// Payload parsed into questions that failed validation.
    Invalid(InvalidQuizError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum QuizStart {
    Ready(QuizRun),
    Unavailable(QuizUnavailable),
}

impl QuizStart {
    #[must_use]
    pub fn into_run(self) -> Option<QuizRun> {
        match self {
            Self::Ready(run) => Some(run),
            Self::Unavailable(_) => None,
        }
    }
}

/// Outcome of submitting a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSubmission {
    pub result: QuizResult,
    pub attempt_id: Option<AttemptId>,
}
