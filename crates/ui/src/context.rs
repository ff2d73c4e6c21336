use std::sync::Arc;

use course_core::model::CourseId;
use services::{CourseService, QuizAttemptService, QuizLoopService};

pub trait UiApp: Send + Sync {
    fn course_id(&self) -> CourseId;

    fn courses(&self) -> Arc<CourseService>;
    fn quiz_loop(&self) -> Arc<QuizLoopService>;
    fn attempts(&self) -> Arc<QuizAttemptService>;
}

#[derive(Clone)]
pub struct AppContext {
    course_id: CourseId,
    courses: Arc<CourseService>,
    quiz_loop: Arc<QuizLoopService>,
    attempts: Arc<QuizAttemptService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            course_id: app.course_id(),
            courses: app.courses(),
            quiz_loop: app.quiz_loop(),
            attempts: app.attempts(),
        }
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

// Provided by the composition root in `crates/app`.

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
