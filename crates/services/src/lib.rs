#![forbid(unsafe_code)]

pub mod app_services;
pub mod course_service;
pub mod course_source;
pub mod error;
pub mod quiz;

pub use course_core::Clock;

pub use app_services::AppServices;
pub use course_service::{CourseService, LessonContext, LessonLink, lesson_context};
pub use course_source::{
    CourseApiConfig, CourseListing, CourseSource, DEFAULT_API_BASE_URL, HttpCourseSource,
    InMemoryCourseSource, course_from_json, demo_course,
};
pub use error::{AppServicesError, AttemptError, CourseError, CourseSourceError, QuizError};
pub use storage::repository::AttemptId;

pub use quiz::{
    AttemptListItem, QuizAttemptService, QuizLoopService, QuizRun, QuizStart, QuizSubmission,
    QuizUnavailable,
};
