use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::question::{InvalidQuizError, QuestionDraft, QuizQuestion, validate_questions};
use crate::model::result::{QuizAttempt, QuizAttemptError, QuizResult};
use crate::model::LessonId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizSessionError {
    #[error("question index {index} is out of range (quiz has {len} questions)")]
    QuestionOutOfRange { index: usize, len: usize },

    #[error("option {option} is out of range for question {index} ({len} options)")]
    OptionOutOfRange {
        index: usize,
        option: usize,
        len: usize,
    },

    #[error("question {index} is already answered")]
    AlreadyAnswered { index: usize },

    #[error("quiz already submitted")]
    Completed,

    #[error("quiz has not been submitted")]
    NotSubmitted,

    #[error(transparent)]
    Attempt(#[from] QuizAttemptError),
}

/// What the learner sees next to a question after interacting with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerFeedback {
    Unanswered,
    Correct,
    Incorrect,
    /// Answered, but the question has no answer key.
    Ungraded,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-progress attempt at one quiz lesson.
///
/// Answers lock on selection: each question takes exactly one choice until
/// `reset`. Submission freezes the session and yields a `QuizResult`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSession {
    questions: Vec<QuizQuestion>,
    current: usize,
    answers: BTreeMap<usize, usize>,
    locked: BTreeSet<usize>,
    completed: bool,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl QuizSession {
    /// Start a fresh session over the given question drafts.
    ///
    /// # Errors
    ///
    /// Returns `InvalidQuizError` if the list is empty or any question is malformed.
    pub fn load(
        drafts: Vec<QuestionDraft>,
        started_at: DateTime<Utc>,
    ) -> Result<Self, InvalidQuizError> {
        let questions = validate_questions(drafts)?;
        Ok(Self::from_questions(questions, started_at))
    }

    fn from_questions(questions: Vec<QuizQuestion>, started_at: DateTime<Utc>) -> Self {
        Self {
            questions,
            current: 0,
            answers: BTreeMap::new(),
            locked: BTreeSet::new(),
            completed: false,
            started_at,
            completed_at: None,
        }
    }

    #[must_use]
    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always false for a loaded session; present for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> &QuizQuestion {
        &self.questions[self.current]
    }

    #[must_use]
    pub fn question(&self, index: usize) -> Option<&QuizQuestion> {
        self.questions.get(index)
    }

    #[must_use]
    pub fn is_first(&self) -> bool {
        self.current == 0
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.current + 1 == self.questions.len()
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    //
    // ─── ANSWERS ───────────────────────────────────────────────────────────────
    //

    /// Record the learner's choice for a question and lock it.
    ///
    /// # Errors
    ///
    /// - `QuestionOutOfRange` / `OptionOutOfRange` for bad indices.
    /// - `Completed` once the quiz has been submitted.
    /// - `AlreadyAnswered` if the question is locked; the stored answer is untouched.
    pub fn select_answer(
        &mut self,
        question_index: usize,
        option_index: usize,
    ) -> Result<AnswerFeedback, QuizSessionError> {
        let question = self
            .questions
            .get(question_index)
            .ok_or(QuizSessionError::QuestionOutOfRange {
                index: question_index,
                len: self.questions.len(),
            })?;
        if option_index >= question.option_count() {
            return Err(QuizSessionError::OptionOutOfRange {
                index: question_index,
                option: option_index,
                len: question.option_count(),
            });
        }
        if self.completed {
            return Err(QuizSessionError::Completed);
        }
        if self.locked.contains(&question_index) {
            return Err(QuizSessionError::AlreadyAnswered {
                index: question_index,
            });
        }

        self.answers.insert(question_index, option_index);
        self.locked.insert(question_index);
        Ok(self.feedback(question_index))
    }

    #[must_use]
    pub fn answer_for(&self, index: usize) -> Option<usize> {
        self.answers.get(&index).copied()
    }

    #[must_use]
    pub fn is_answered(&self, index: usize) -> bool {
        self.answers.contains_key(&index)
    }

    #[must_use]
    pub fn is_locked(&self, index: usize) -> bool {
        self.locked.contains(&index)
    }

    /// False when unanswered or when the question has no answer key.
    #[must_use]
    pub fn is_correct(&self, index: usize) -> bool {
        match (self.questions.get(index), self.answers.get(&index)) {
            (Some(question), Some(&option)) => question.is_correct_option(option),
            _ => false,
        }
    }

    #[must_use]
    pub fn feedback(&self, index: usize) -> AnswerFeedback {
        let Some(question) = self.questions.get(index) else {
            return AnswerFeedback::Unanswered;
        };
        match self.answers.get(&index) {
            None => AnswerFeedback::Unanswered,
            Some(_) if !question.is_graded() => AnswerFeedback::Ungraded,
            Some(&option) if question.is_correct_option(option) => AnswerFeedback::Correct,
            Some(_) => AnswerFeedback::Incorrect,
        }
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    /// Fraction of questions answered, in `[0.0, 1.0]`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn progress(&self) -> f64 {
        if self.questions.is_empty() {
            return 0.0;
        }
        self.answers.len() as f64 / self.questions.len() as f64
    }

    //
    // ─── NAVIGATION ────────────────────────────────────────────────────────────
    //

    /// Move to `index`, clamped to the last question.
    pub fn go_to(&mut self, index: usize) {
        self.current = index.min(self.questions.len().saturating_sub(1));
    }

    pub fn next(&mut self) {
        if !self.is_last() {
            self.current += 1;
        }
    }

    pub fn previous(&mut self) {
        self.current = self.current.saturating_sub(1);
    }

    //
    // ─── COMPLETION ────────────────────────────────────────────────────────────
    //

    /// Score snapshot of the current answers. Does not complete the session.
    #[must_use]
    pub fn result(&self) -> QuizResult {
        let mut correct = 0_u32;
        let mut marks_awarded = 0_u32;
        let mut marks_total = 0_u32;

        for (index, question) in self.questions.iter().enumerate() {
            marks_total = marks_total.saturating_add(question.marks());
            if self.is_correct(index) {
                correct = correct.saturating_add(1);
                marks_awarded = marks_awarded.saturating_add(question.marks());
            }
        }

        let answered = u32::try_from(self.answers.len()).unwrap_or(u32::MAX);
        let total = u32::try_from(self.questions.len()).unwrap_or(u32::MAX);
        QuizResult::tally(answered, total, correct, marks_awarded, marks_total)
    }

    /// Complete the quiz. Unanswered questions score as incorrect.
    ///
    /// Submitting again keeps the original completion time and returns the same result.
    pub fn submit(&mut self, completed_at: DateTime<Utc>) -> QuizResult {
        if !self.completed {
            self.completed = true;
            self.completed_at = Some(completed_at.max(self.started_at));
        }
        self.result()
    }

    /// Build the history record for a submitted session.
    ///
    /// # Errors
    ///
    /// Returns `QuizSessionError::NotSubmitted` before `submit`.
    pub fn attempt(&self, lesson_id: LessonId) -> Result<QuizAttempt, QuizSessionError> {
        let completed_at = self.completed_at.ok_or(QuizSessionError::NotSubmitted)?;
        Ok(QuizAttempt::new(
            lesson_id,
            self.started_at,
            completed_at,
            self.result(),
        )?)
    }

    /// Start over on the same questions.
    pub fn reset(&mut self, started_at: DateTime<Utc>) {
        self.current = 0;
        self.answers.clear();
        self.locked.clear();
        self.completed = false;
        self.started_at = started_at;
        self.completed_at = None;
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
