use course_core::model::{Course, LessonKind};
use services::{LessonContext, LessonLink};

use crate::vm::markdown_vm::markdown_to_html;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LessonRowVm {
    pub id: u64,
    pub title: String,
    pub kind_label: &'static str,
    pub is_quiz: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModuleVm {
    pub title: String,
    pub lessons: Vec<LessonRowVm>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutlineVm {
    pub title: String,
    pub description: Option<String>,
    pub lesson_count: usize,
    pub quiz_count: usize,
    pub modules: Vec<ModuleVm>,
}

#[must_use]
pub fn map_outline(course: &Course) -> OutlineVm {
    let modules = course
        .modules()
        .iter()
        .map(|module| ModuleVm {
            title: module.title.clone(),
            lessons: module
                .lessons
                .iter()
                .map(|lesson| LessonRowVm {
                    id: lesson.id.value(),
                    title: lesson.title.clone(),
                    kind_label: lesson.kind.label(),
                    is_quiz: lesson.is_quiz(),
                })
                .collect(),
        })
        .collect();

    OutlineVm {
        title: course.title().to_string(),
        description: course.description().map(str::to_string),
        lesson_count: course.lesson_count(),
        quiz_count: course.quiz_lessons().count(),
        modules,
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LessonLinkVm {
    pub id: u64,
    pub title: String,
}

impl LessonLinkVm {
    fn from_link(link: &LessonLink) -> Self {
        Self {
            id: link.id.value(),
            title: link.title.clone(),
        }
    }
}

/// What the lesson page renders above the navigation links.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LessonBodyVm {
    Video {
        url: Option<String>,
        notes_html: Option<String>,
    },
    Text {
        html: String,
    },
    Quiz,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LessonVm {
    pub id: u64,
    pub title: String,
    pub breadcrumb: String,
    pub kind_label: &'static str,
    pub body: LessonBodyVm,
    pub previous: Option<LessonLinkVm>,
    pub next: Option<LessonLinkVm>,
}

#[must_use]
pub fn map_lesson(ctx: &LessonContext) -> LessonVm {
    let lesson = &ctx.lesson;
    let body = match lesson.kind {
        LessonKind::Video => LessonBodyVm::Video {
            url: lesson.video_url.clone(),
            notes_html: lesson.body.as_deref().map(markdown_to_html),
        },
        LessonKind::Text => LessonBodyVm::Text {
            html: lesson
                .body
                .as_deref()
                .map(markdown_to_html)
                .unwrap_or_default(),
        },
        LessonKind::Quiz => LessonBodyVm::Quiz,
    };

    let breadcrumb = match &ctx.module_title {
        Some(module) => format!("{} / {module}", ctx.course_title),
        None => ctx.course_title.clone(),
    };

    LessonVm {
        id: lesson.id.value(),
        title: lesson.title.clone(),
        breadcrumb,
        kind_label: lesson.kind.label(),
        body,
        previous: ctx.previous.as_ref().map(LessonLinkVm::from_link),
        next: ctx.next.as_ref().map(LessonLinkVm::from_link),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use course_core::model::LessonId;
    use services::{demo_course, lesson_context};

    #[test]
    fn outline_lists_modules_in_order_with_counts() {
        let outline = map_outline(&demo_course());
        assert_eq!(outline.title, "Rust Foundations");
        assert_eq!(outline.lesson_count, 6);
        assert_eq!(outline.quiz_count, 3);
        assert_eq!(outline.modules[0].title, "Getting started");
        assert_eq!(outline.modules[0].lessons[0].kind_label, "Video");
        assert!(outline.modules[1].lessons[1].is_quiz);
    }

    #[test]
    fn text_lesson_renders_markdown_and_neighbours() {
        let course = demo_course();
        let ctx = lesson_context(&course, LessonId::new(101)).unwrap();
        let vm = map_lesson(&ctx);
        assert_eq!(vm.breadcrumb, "Rust Foundations / Getting started");
        let LessonBodyVm::Text { html } = &vm.body else {
            panic!("expected text body");
        };
        assert!(html.contains("<code>let mut</code>"), "{html}");
        assert_eq!(vm.previous.as_ref().map(|l| l.id), Some(100));
        assert_eq!(vm.next.as_ref().map(|l| l.id), Some(102));
    }

    #[test]
    fn first_lesson_has_no_previous_link() {
        let course = demo_course();
        let vm = map_lesson(&lesson_context(&course, LessonId::new(100)).unwrap());
        assert!(vm.previous.is_none());
        assert!(matches!(vm.body, LessonBodyVm::Video { url: Some(_), .. }));
    }
}
