use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::LessonId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizAttemptError {
    #[error("completed_at is before started_at")]
    InvalidTimeRange,

    #[error("answered count ({answered}) exceeds question count ({total})")]
    AnsweredExceedsTotal { answered: u32, total: u32 },

    #[error("correct count ({correct}) exceeds answered count ({answered})")]
    CorrectExceedsAnswered { correct: u32, answered: u32 },

    #[error("score {score}% does not match {correct}/{total} correct")]
    ScoreMismatch { score: u8, correct: u32, total: u32 },

    #[error("awarded marks ({awarded}) exceed available marks ({total})")]
    MarksExceedTotal { awarded: u32, total: u32 },
}

//
// ─── RESULT ────────────────────────────────────────────────────────────────────
//

/// Score summary of a quiz session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizResult {
    answered_count: u32,
    total_count: u32,
    correct_count: u32,
    score_percent: u8,
    marks_awarded: u32,
    marks_total: u32,
}

/// `round(100 * correct / total)`, halves rounded up, 0 for an empty quiz.
#[must_use]
pub fn score_percent(correct: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    let correct = u64::from(correct.min(total));
    let total = u64::from(total);
    let rounded = (200 * correct + total) / (2 * total);
    u8::try_from(rounded).unwrap_or(100)
}

impl QuizResult {
    pub(crate) fn tally(
        answered_count: u32,
        total_count: u32,
        correct_count: u32,
        marks_awarded: u32,
        marks_total: u32,
    ) -> Self {
        Self {
            answered_count,
            total_count,
            correct_count,
            score_percent: score_percent(correct_count, total_count),
            marks_awarded,
            marks_total,
        }
    }

    /// Rehydrate a result from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `QuizAttemptError` if the counts are inconsistent with each other.
    pub fn from_persisted(
        answered_count: u32,
        total_count: u32,
        correct_count: u32,
        score: u8,
        marks_awarded: u32,
        marks_total: u32,
    ) -> Result<Self, QuizAttemptError> {
        if answered_count > total_count {
            return Err(QuizAttemptError::AnsweredExceedsTotal {
                answered: answered_count,
                total: total_count,
            });
        }
        if correct_count > answered_count {
            return Err(QuizAttemptError::CorrectExceedsAnswered {
                correct: correct_count,
                answered: answered_count,
            });
        }
        if score != score_percent(correct_count, total_count) {
            return Err(QuizAttemptError::ScoreMismatch {
                score,
                correct: correct_count,
                total: total_count,
            });
        }
        if marks_awarded > marks_total {
            return Err(QuizAttemptError::MarksExceedTotal {
                awarded: marks_awarded,
                total: marks_total,
            });
        }

        Ok(Self::tally(
            answered_count,
            total_count,
            correct_count,
            marks_awarded,
            marks_total,
        ))
    }

    #[must_use]
    pub fn answered_count(&self) -> u32 {
        self.answered_count
    }

    #[must_use]
    pub fn total_count(&self) -> u32 {
        self.total_count
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    #[must_use]
    pub fn score_percent(&self) -> u8 {
        self.score_percent
    }

    #[must_use]
    pub fn marks_awarded(&self) -> u32 {
        self.marks_awarded
    }

    #[must_use]
    pub fn marks_total(&self) -> u32 {
        self.marks_total
    }

    #[must_use]
    pub fn unanswered_count(&self) -> u32 {
        self.total_count.saturating_sub(self.answered_count)
    }
}

//
// ─── ATTEMPT ───────────────────────────────────────────────────────────────────
//

/// A submitted quiz, as kept in the learner's local history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizAttempt {
    lesson_id: LessonId,
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
    result: QuizResult,
}

impl QuizAttempt {
    /// # Errors
    ///
    /// Returns `QuizAttemptError::InvalidTimeRange` if `completed_at` is before `started_at`.
    pub fn new(
        lesson_id: LessonId,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
        result: QuizResult,
    ) -> Result<Self, QuizAttemptError> {
        if completed_at < started_at {
            return Err(QuizAttemptError::InvalidTimeRange);
        }
        Ok(Self {
            lesson_id,
            started_at,
            completed_at,
            result,
        })
    }

    #[must_use]
    pub fn lesson_id(&self) -> LessonId {
        self.lesson_id
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    #[must_use]
    pub fn result(&self) -> &QuizResult {
        &self.result
    }
}
