use serde::{Deserialize, Serialize};

use crate::model::{CourseId, LessonId, ModuleId};

//
// ─── LESSON ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LessonKind {
    Video,
    Text,
    Quiz,
}

impl LessonKind {
    /// Parse the backend's lesson type tag, case-insensitively.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_uppercase().as_str() {
            "VIDEO" => Some(Self::Video),
            "TEXT" | "ARTICLE" | "READING" => Some(Self::Text),
            "QUIZ" => Some(Self::Quiz),
            _ => None,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Video => "Video",
            Self::Text => "Reading",
            Self::Quiz => "Quiz",
        }
    }
}

/// Quiz payload attached to a quiz lesson.
///
/// Backends send either a JSON question list or a free-form string; the
/// string may itself hold JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuizContent {
    Raw(String),
    Structured(serde_json::Value),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Lesson {
    pub id: LessonId,
    pub title: String,
    pub position: u32,
    pub kind: LessonKind,
    pub body: Option<String>,
    pub video_url: Option<String>,
    pub quiz: Option<QuizContent>,
}

impl Lesson {
    #[must_use]
    pub fn is_quiz(&self) -> bool {
        self.kind == LessonKind::Quiz
    }
}

//
// ─── MODULE / COURSE ───────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq)]
pub struct CourseModule {
    pub id: ModuleId,
    pub title: String,
    pub position: u32,
    pub lessons: Vec<Lesson>,
}

/// A course outline: modules and their lessons, each in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct Course {
    id: CourseId,
    title: String,
    description: Option<String>,
    modules: Vec<CourseModule>,
}

impl Course {
    /// Build an outline, ordering modules and lessons by `position`.
    #[must_use]
    pub fn new(
        id: CourseId,
        title: impl Into<String>,
        description: Option<String>,
        mut modules: Vec<CourseModule>,
    ) -> Self {
        modules.sort_by_key(|module| module.position);
        for module in &mut modules {
            module.lessons.sort_by_key(|lesson| lesson.position);
        }
        Self {
            id,
            title: title.into(),
            description,
            modules,
        }
    }

    #[must_use]
    pub fn id(&self) -> CourseId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn modules(&self) -> &[CourseModule] {
        &self.modules
    }

    /// Every lesson in reading order, across module boundaries.
    pub fn lessons(&self) -> impl Iterator<Item = &Lesson> {
        self.modules.iter().flat_map(|module| module.lessons.iter())
    }

    #[must_use]
    pub fn lesson_count(&self) -> usize {
        self.modules.iter().map(|module| module.lessons.len()).sum()
    }

    #[must_use]
    pub fn lesson(&self, id: LessonId) -> Option<&Lesson> {
        self.lessons().find(|lesson| lesson.id == id)
    }

    #[must_use]
    pub fn module_of(&self, id: LessonId) -> Option<&CourseModule> {
        self.modules
            .iter()
            .find(|module| module.lessons.iter().any(|lesson| lesson.id == id))
    }

    #[must_use]
    pub fn first_lesson(&self) -> Option<&Lesson> {
        self.lessons().next()
    }

    #[must_use]
    pub fn next_lesson(&self, id: LessonId) -> Option<&Lesson> {
        let mut lessons = self.lessons().skip_while(|lesson| lesson.id != id);
        lessons.next()?;
        lessons.next()
    }

    #[must_use]
    pub fn previous_lesson(&self, id: LessonId) -> Option<&Lesson> {
        let mut previous = None;
        for lesson in self.lessons() {
            if lesson.id == id {
                return previous;
            }
            previous = Some(lesson);
        }
        None
    }

    pub fn quiz_lessons(&self) -> impl Iterator<Item = &Lesson> {
        self.lessons().filter(|lesson| lesson.is_quiz())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lesson(id: u64, position: u32, kind: LessonKind) -> Lesson {
        Lesson {
            id: LessonId::new(id),
            title: format!("Lesson {id}"),
            position,
            kind,
            body: None,
            video_url: None,
            quiz: None,
        }
    }

    fn sample_course() -> Course {
        Course::new(
            CourseId::new(1),
            "Rust basics",
            None,
            vec![
                CourseModule {
                    id: ModuleId::new(20),
                    title: "Ownership".into(),
                    position: 2,
                    lessons: vec![lesson(4, 1, LessonKind::Quiz), lesson(3, 0, LessonKind::Text)],
                },
                CourseModule {
                    id: ModuleId::new(10),
                    title: "Intro".into(),
                    position: 1,
                    lessons: vec![lesson(1, 0, LessonKind::Video), lesson(2, 1, LessonKind::Quiz)],
                },
            ],
        )
    }

    #[test]
    fn outline_is_ordered_by_position() {
        let course = sample_course();
        let ids: Vec<u64> = course.lessons().map(|l| l.id.value()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(course.lesson_count(), 4);
        assert_eq!(course.first_lesson().map(|l| l.id), Some(LessonId::new(1)));
    }

    #[test]
    fn navigation_crosses_module_boundaries() {
        let course = sample_course();
        let next = course.next_lesson(LessonId::new(2)).unwrap();
        assert_eq!(next.id, LessonId::new(3));
        let prev = course.previous_lesson(LessonId::new(3)).unwrap();
        assert_eq!(prev.id, LessonId::new(2));
        assert!(course.previous_lesson(LessonId::new(1)).is_none());
        assert!(course.next_lesson(LessonId::new(4)).is_none());
        assert!(course.next_lesson(LessonId::new(99)).is_none());
    }

    #[test]
    fn module_lookup_and_quiz_filter() {
        let course = sample_course();
        assert_eq!(
            course.module_of(LessonId::new(4)).map(|m| m.id),
            Some(ModuleId::new(20))
        );
        let quizzes: Vec<u64> = course.quiz_lessons().map(|l| l.id.value()).collect();
        assert_eq!(quizzes, vec![2, 4]);
    }

    #[test]
    fn lesson_kind_tags_are_case_insensitive() {
        assert_eq!(LessonKind::from_tag("quiz"), Some(LessonKind::Quiz));
        assert_eq!(LessonKind::from_tag(" VIDEO "), Some(LessonKind::Video));
        assert_eq!(LessonKind::from_tag("podcast"), None);
    }

    #[test]
    fn quiz_content_accepts_string_or_json() {
        let raw: QuizContent = serde_json::from_str(r#""1. What?""#).unwrap();
        assert!(matches!(raw, QuizContent::Raw(_)));
        let structured: QuizContent = serde_json::from_str(r#"[{"questionText":"x"}]"#).unwrap();
        assert!(matches!(structured, QuizContent::Structured(_)));
    }
}
