use chrono::{DateTime, Utc};
use std::sync::Arc;

use course_core::model::{LessonId, QuizAttempt};
use storage::repository::{AttemptId, AttemptRow, InMemoryRepository, QuizAttemptRepository};

use crate::error::AttemptError;

/// Attempts scanned when picking the best score for a lesson.
const BEST_ATTEMPT_SCAN: u32 = 500;

/// Presentation-agnostic list item for a stored attempt.
///
/// The UI formats timestamps and percentages itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptListItem {
    pub id: AttemptId,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,

    pub answered: u32,
    pub total: u32,
    pub correct: u32,
    pub score_percent: u8,
    pub marks_awarded: u32,
    pub marks_total: u32,
}

impl AttemptListItem {
    #[must_use]
    pub fn from_attempt(id: AttemptId, attempt: &QuizAttempt) -> Self {
        let result = attempt.result();
        Self {
            id,
            started_at: attempt.started_at(),
            completed_at: attempt.completed_at(),
            answered: result.answered_count(),
            total: result.total_count(),
            correct: result.correct_count(),
            score_percent: result.score_percent(),
            marks_awarded: result.marks_awarded(),
            marks_total: result.marks_total(),
        }
    }

    fn from_row(row: &AttemptRow) -> Self {
        Self::from_attempt(row.id, &row.attempt)
    }
}

/// Read side of quiz history; hides repositories from the UI.
#[derive(Clone)]
pub struct QuizAttemptService {
    attempts: Arc<dyn QuizAttemptRepository>,
}

impl QuizAttemptService {
    #[must_use]
    pub fn new(attempts: Arc<dyn QuizAttemptRepository>) -> Self {
        Self { attempts }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryRepository::new()))
    }

    /// Attempts for a lesson, newest first.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::Storage` on repository failures.
    pub async fn list_attempts(
        &self,
        lesson_id: LessonId,
        limit: u32,
    ) -> Result<Vec<AttemptListItem>, AttemptError> {
        let rows = self.attempts.list_attempts(lesson_id, limit).await?;
        Ok(rows.iter().map(AttemptListItem::from_row).collect())
    }

    /// # Errors
    ///
    /// Returns `AttemptError::Storage` when the attempt is missing or unreadable.
    pub async fn get_attempt(&self, id: AttemptId) -> Result<QuizAttempt, AttemptError> {
        Ok(self.attempts.get_attempt(id).await?)
    }

    /// Highest scoring attempt for a lesson; ties go to the most recent.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::Storage` on repository failures.
    pub async fn best_attempt(
        &self,
        lesson_id: LessonId,
    ) -> Result<Option<AttemptListItem>, AttemptError> {
        let rows = self
            .attempts
            .list_attempts(lesson_id, BEST_ATTEMPT_SCAN)
            .await?;
        let mut best: Option<&AttemptRow> = None;
        for row in &rows {
            let better = best.is_none_or(|current| {
                rank(&row.attempt) > rank(&current.attempt)
            });
            if better {
                best = Some(row);
            }
        }
        Ok(best.map(AttemptListItem::from_row))
    }
}

fn rank(attempt: &QuizAttempt) -> (u8, u32) {
    let result = attempt.result();
    (result.score_percent(), result.marks_awarded())
}
