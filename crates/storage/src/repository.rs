use async_trait::async_trait;
use course_core::model::{LessonId, QuizAttempt};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Storage identifier for a submitted attempt (`SQLite` row id).
pub type AttemptId = i64;

/// A persisted attempt together with its row id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptRow {
    pub id: AttemptId,
    pub attempt: QuizAttempt,
}

impl AttemptRow {
    #[must_use]
    pub fn new(id: AttemptId, attempt: QuizAttempt) -> Self {
        Self { id, attempt }
    }
}

/// History of submitted quizzes. In-progress sessions are never stored.
#[async_trait]
pub trait QuizAttemptRepository: Send + Sync {
    /// Append a submitted attempt and return its id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the attempt cannot be stored.
    async fn append_attempt(&self, attempt: &QuizAttempt) -> Result<AttemptId, StorageError>;

    /// Fetch an attempt by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_attempt(&self, id: AttemptId) -> Result<QuizAttempt, StorageError>;

    /// Attempts for a lesson, newest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_attempts(
        &self,
        lesson_id: LessonId,
        limit: u32,
    ) -> Result<Vec<AttemptRow>, StorageError>;
}

/// In-memory repository for tests and the demo mode.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    attempts: Arc<Mutex<BTreeMap<AttemptId, QuizAttempt>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QuizAttemptRepository for InMemoryRepository {
    async fn append_attempt(&self, attempt: &QuizAttempt) -> Result<AttemptId, StorageError> {
        let mut guard = self
            .attempts
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let id = guard.keys().next_back().map_or(1, |last| last + 1);
        guard.insert(id, attempt.clone());
        Ok(id)
    }

    async fn get_attempt(&self, id: AttemptId) -> Result<QuizAttempt, StorageError> {
        let guard = self
            .attempts
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.get(&id).cloned().ok_or(StorageError::NotFound)
    }

    async fn list_attempts(
        &self,
        lesson_id: LessonId,
        limit: u32,
    ) -> Result<Vec<AttemptRow>, StorageError> {
        let guard = self
            .attempts
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut rows: Vec<AttemptRow> = guard
            .iter()
            .filter(|(_, attempt)| attempt.lesson_id() == lesson_id)
            .map(|(id, attempt)| AttemptRow::new(*id, attempt.clone()))
            .collect();
        rows.sort_by(|a, b| {
            b.attempt
                .completed_at()
                .cmp(&a.attempt.completed_at())
                .then_with(|| b.id.cmp(&a.id))
        });
        rows.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(rows)
    }
}

/// Repositories behind trait objects so the backend can be swapped.
#[derive(Clone)]
pub struct Storage {
    pub attempts: Arc<dyn QuizAttemptRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            attempts: Arc::new(InMemoryRepository::new()),
        }
    }
}
