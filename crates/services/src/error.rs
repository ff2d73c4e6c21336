//! Shared error types for the services crate.

use thiserror::Error;

use course_core::model::{LessonId, QuizSessionError};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by a `CourseSource`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CourseSourceError {
    #[error("course not found")]
    NotFound,
    #[error("session is not authorized for this course")]
    Unauthorized,
    #[error("course request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("could not decode course payload: {0}")]
    Decode(String),
}

/// Errors emitted by `CourseService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CourseError {
    #[error("lesson {0} is not part of this course")]
    LessonNotFound(LessonId),
    #[error(transparent)]
    Source(#[from] CourseSourceError),
}

/// Errors emitted by `QuizLoopService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error("lesson {0} is not a quiz")]
    NotAQuiz(LessonId),
    #[error("quiz has not been submitted")]
    NotSubmitted,
    #[error(transparent)]
    Session(#[from] QuizSessionError),
    #[error(transparent)]
    Course(#[from] CourseError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `QuizAttemptService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AttemptError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl AttemptError {
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Storage(StorageError::NotFound))
    }
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
