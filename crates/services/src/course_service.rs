use std::sync::Arc;

use course_core::model::{Course, CourseId, Lesson, LessonId};

use crate::course_source::{CourseListing, CourseSource, InMemoryCourseSource};
use crate::error::CourseError;

/// A lesson with enough of its surroundings to render navigation.
#[derive(Debug, Clone, PartialEq)]
pub struct LessonContext {
    pub course_id: CourseId,
    pub course_title: String,
    pub module_title: Option<String>,
    pub lesson: Lesson,
    pub previous: Option<LessonLink>,
    pub next: Option<LessonLink>,
}

/// Id and title of a neighbouring lesson.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonLink {
    pub id: LessonId,
    pub title: String,
}

impl LessonLink {
    fn from_lesson(lesson: &Lesson) -> Self {
        Self {
            id: lesson.id,
            title: lesson.title.clone(),
        }
    }
}

/// Read-only course facade over a `CourseSource`.
#[derive(Clone)]
pub struct CourseService {
    source: Arc<dyn CourseSource>,
}

impl CourseService {
    #[must_use]
    pub fn new(source: Arc<dyn CourseSource>) -> Self {
        Self { source }
    }

    #[must_use]
    pub fn demo() -> Self {
        Self::new(Arc::new(InMemoryCourseSource::demo()))
    }

    /// # Errors
    ///
    /// Returns `CourseError::Source` when the source fails.
    pub async fn list_courses(&self) -> Result<Vec<CourseListing>, CourseError> {
        Ok(self.source.list_courses().await?)
    }

    /// # Errors
    ///
    /// Returns `CourseError::Source` when the course cannot be loaded.
    pub async fn get_course(&self, id: CourseId) -> Result<Course, CourseError> {
        let course = self.source.fetch_course(id).await?;
        tracing::debug!(course = %id, lessons = course.lesson_count(), "course loaded");
        Ok(course)
    }

    /// Load a lesson together with its previous/next neighbours.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::LessonNotFound` if the lesson is not in the course.
    pub async fn get_lesson(
        &self,
        course_id: CourseId,
        lesson_id: LessonId,
    ) -> Result<LessonContext, CourseError> {
        let course = self.get_course(course_id).await?;
        lesson_context(&course, lesson_id)
    }
}

/// # Errors
///
/// Returns `CourseError::LessonNotFound` if the lesson is not in the course.
pub fn lesson_context(course: &Course, lesson_id: LessonId) -> Result<LessonContext, CourseError> {
    let lesson = course
        .lesson(lesson_id)
        .ok_or(CourseError::LessonNotFound(lesson_id))?;
    Ok(LessonContext {
        course_id: course.id(),
        course_title: course.title().to_owned(),
        module_title: course.module_of(lesson_id).map(|m| m.title.clone()),
        lesson: lesson.clone(),
        previous: course.previous_lesson(lesson_id).map(LessonLink::from_lesson),
        next: course.next_lesson(lesson_id).map(LessonLink::from_lesson),
    })
}
