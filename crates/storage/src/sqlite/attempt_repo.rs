use course_core::model::{LessonId, QuizAttempt};

use super::SqliteRepository;
use super::mapping::{lesson_id_to_i64, map_attempt_row, map_attempt_row_with_id};
use crate::repository::{AttemptId, AttemptRow, QuizAttemptRepository, StorageError};

#[async_trait::async_trait]
impl QuizAttemptRepository for SqliteRepository {
    async fn append_attempt(&self, attempt: &QuizAttempt) -> Result<AttemptId, StorageError> {
        let result = attempt.result();
        let res = sqlx::query(
            r"
                INSERT INTO quiz_attempts (
                    lesson_id, started_at, completed_at,
                    answered_count, total_count, correct_count, score_percent,
                    marks_awarded, marks_total
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ",
        )
        .bind(lesson_id_to_i64(attempt.lesson_id())?)
        .bind(attempt.started_at())
        .bind(attempt.completed_at())
        .bind(i64::from(result.answered_count()))
        .bind(i64::from(result.total_count()))
        .bind(i64::from(result.correct_count()))
        .bind(i64::from(result.score_percent()))
        .bind(i64::from(result.marks_awarded()))
        .bind(i64::from(result.marks_total()))
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(res.last_insert_rowid())
    }

    async fn get_attempt(&self, id: AttemptId) -> Result<QuizAttempt, StorageError> {
        let row = sqlx::query(
            r"
                SELECT
                    lesson_id, started_at, completed_at,
                    answered_count, total_count, correct_count, score_percent,
                    marks_awarded, marks_total
                FROM quiz_attempts
                WHERE id = ?1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?
        .ok_or(StorageError::NotFound)?;

        map_attempt_row(&row)
    }

    async fn list_attempts(
        &self,
        lesson_id: LessonId,
        limit: u32,
    ) -> Result<Vec<AttemptRow>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT
                    id, lesson_id, started_at, completed_at,
                    answered_count, total_count, correct_count, score_percent,
                    marks_awarded, marks_total
                FROM quiz_attempts
                WHERE lesson_id = ?1
                ORDER BY completed_at DESC, id DESC
                LIMIT ?2
            ",
        )
        .bind(lesson_id_to_i64(lesson_id)?)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        rows.iter().map(map_attempt_row_with_id).collect()
    }
}
