use std::sync::Arc;

use course_core::model::CourseId;
use storage::repository::Storage;

use crate::Clock;
use crate::course_service::CourseService;
use crate::course_source::CourseSource;
use crate::error::AppServicesError;
use crate::quiz::{QuizAttemptService, QuizLoopService};

/// Assembles app-facing services for one course.
#[derive(Clone)]
pub struct AppServices {
    course_id: CourseId,
    courses: Arc<CourseService>,
    quiz_loop: Arc<QuizLoopService>,
    attempts: Arc<QuizAttemptService>,
}

impl AppServices {
    #[must_use]
    pub fn new(
        storage: &Storage,
        source: Arc<dyn CourseSource>,
        clock: Clock,
        course_id: CourseId,
    ) -> Self {
        let courses = CourseService::new(source);
        let quiz_loop = Arc::new(QuizLoopService::new(
            clock,
            courses.clone(),
            Arc::clone(&storage.attempts),
        ));
        let attempts = Arc::new(QuizAttemptService::new(Arc::clone(&storage.attempts)));

        Self {
            course_id,
            courses: Arc::new(courses),
            quiz_loop,
            attempts,
        }
    }

    /// Build services with attempt history in `SQLite`.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        source: Arc<dyn CourseSource>,
        clock: Clock,
        course_id: CourseId,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::new(&storage, source, clock, course_id))
    }

    #[must_use]
    pub fn course_id(&self) -> CourseId {
        self.course_id
    }

    #[must_use]
    pub fn courses(&self) -> Arc<CourseService> {
        Arc::clone(&self.courses)
    }

    #[must_use]
    pub fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }

    #[must_use]
    pub fn attempts(&self) -> Arc<QuizAttemptService> {
        Arc::clone(&self.attempts)
    }
}
