use course_core::model::{LessonId, QuizAttempt, QuizResult};
use sqlx::Row;

use crate::repository::{AttemptRow, StorageError};

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn lesson_id_to_i64(id: LessonId) -> Result<i64, StorageError> {
    i64::try_from(id.value())
        .map_err(|_| StorageError::Serialization("lesson_id overflow".into()))
}

fn lesson_id_from_i64(v: i64) -> Result<LessonId, StorageError> {
    u64::try_from(v)
        .map(LessonId::new)
        .map_err(|_| StorageError::Serialization("lesson_id sign overflow".into()))
}

fn u32_from_i64(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

fn count(row: &sqlx::sqlite::SqliteRow, field: &'static str) -> Result<u32, StorageError> {
    u32_from_i64(field, row.try_get::<i64, _>(field).map_err(ser)?)
}

pub(crate) fn map_attempt_row(row: &sqlx::sqlite::SqliteRow) -> Result<QuizAttempt, StorageError> {
    let lesson_id = lesson_id_from_i64(row.try_get::<i64, _>("lesson_id").map_err(ser)?)?;
    let started_at = row.try_get("started_at").map_err(ser)?;
    let completed_at = row.try_get("completed_at").map_err(ser)?;

    let score_raw: i64 = row.try_get("score_percent").map_err(ser)?;
    let score = u8::try_from(score_raw)
        .map_err(|_| StorageError::Serialization(format!("invalid score_percent: {score_raw}")))?;

    let result = QuizResult::from_persisted(
        count(row, "answered_count")?,
        count(row, "total_count")?,
        count(row, "correct_count")?,
        score,
        count(row, "marks_awarded")?,
        count(row, "marks_total")?,
    )
    .map_err(ser)?;

    QuizAttempt::new(lesson_id, started_at, completed_at, result).map_err(ser)
}

pub(crate) fn map_attempt_row_with_id(
    row: &sqlx::sqlite::SqliteRow,
) -> Result<AttemptRow, StorageError> {
    let id: i64 = row.try_get("id").map_err(ser)?;
    Ok(AttemptRow::new(id, map_attempt_row(row)?))
}
