use dioxus::prelude::*;
use dioxus_router::Link;

use course_core::model::LessonId;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{QuizPanel, ViewError, ViewState, view_state_from_resource};
use crate::vm::{LessonBodyVm, LessonLinkVm, LessonVm, map_lesson};

#[component]
pub fn LessonView(lesson_id: u64) -> Element {
    let ctx = use_context::<AppContext>();
    let courses = ctx.courses();
    let course_id = ctx.course_id();

    let resource = use_resource(use_reactive!(|(lesson_id,)| {
        let courses = courses.clone();
        async move {
            let lesson = courses
                .get_lesson(course_id, LessonId::new(lesson_id))
                .await
                .map_err(|err| ViewError::from_course(&err))?;
            Ok::<_, ViewError>(map_lesson(&lesson))
        }
    }));

    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page lesson-page",
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(lesson) => rsx! {
                    LessonContent { lesson }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                    if err.is_retryable() {
                        button {
                            class: "btn btn-secondary",
                            r#type: "button",
                            onclick: move |_| {
                                let mut resource = resource;
                                resource.restart();
                            },
                            "Retry"
                        }
                    } else {
                        Link { to: Route::Home {}, "Back to course" }
                    }
                },
            }
        }
    }
}

#[component]
fn LessonContent(lesson: LessonVm) -> Element {
    let lesson_id = lesson.id;
    rsx! {
        header { class: "lesson-header",
            p { class: "lesson-breadcrumb", "{lesson.breadcrumb}" }
            h2 { "{lesson.title}" }
            span { class: "lesson-kind", "{lesson.kind_label}" }
        }

        match lesson.body {
            LessonBodyVm::Video { url, notes_html } => rsx! {
                if let Some(url) = url {
                    video { class: "lesson-video", src: "{url}", controls: true }
                } else {
                    p { class: "lesson-empty", "Video is not available." }
                }
                if let Some(notes) = notes_html {
                    div { class: "lesson-body", dangerous_inner_html: "{notes}" }
                }
            },
            LessonBodyVm::Text { html } => rsx! {
                if html.is_empty() {
                    p { class: "lesson-empty", "This lesson has no content yet." }
                } else {
                    div { class: "lesson-body", dangerous_inner_html: "{html}" }
                }
            },
            LessonBodyVm::Quiz => rsx! {
                QuizPanel { key: "{lesson_id}", lesson_id }
                Link { class: "lesson-history-link", to: Route::History { lesson_id }, "Past attempts" }
            },
        }

        nav { class: "lesson-nav",
            LessonNavLink { link: lesson.previous, label: "Previous" }
            LessonNavLink { link: lesson.next, label: "Next" }
        }
    }
}

#[component]
fn LessonNavLink(link: Option<LessonLinkVm>, label: &'static str) -> Element {
    match link {
        Some(link) => rsx! {
            Link { class: "lesson-nav__link", to: Route::Lesson { lesson_id: link.id },
                span { class: "lesson-nav__label", "{label}" }
                span { class: "lesson-nav__title", "{link.title}" }
            }
        },
        None => rsx! {
            span { class: "lesson-nav__link disabled", "{label}" }
        },
    }
}
