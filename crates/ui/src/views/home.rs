use dioxus::prelude::*;
use dioxus_router::Link;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{ModuleVm, OutlineVm, map_outline};

#[component]
pub fn HomeView() -> Element {
    let ctx = use_context::<AppContext>();
    let courses = ctx.courses();
    let course_id = ctx.course_id();

    let resource = use_resource(move || {
        let courses = courses.clone();
        async move {
            let course = courses
                .get_course(course_id)
                .await
                .map_err(|err| ViewError::from_course(&err))?;
            Ok::<_, ViewError>(map_outline(&course))
        }
    });

    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page",
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(outline) => rsx! {
                    CourseOutline { outline }
                },
                ViewState::Error(err) => rsx! {
                    h2 { "Course" }
                    p { "{err.message()}" }
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        onclick: move |_| {
                            let mut resource = resource;
                            resource.restart();
                        },
                        "Retry"
                    }
                },
            }
        }
    }
}

#[component]
fn CourseOutline(outline: OutlineVm) -> Element {
    rsx! {
        h2 { "{outline.title}" }
        if let Some(description) = outline.description.clone() {
            p { class: "course-description", "{description}" }
        }
        p { class: "course-stats", "{outline.lesson_count} lessons, {outline.quiz_count} quizzes" }
        for module in outline.modules {
            ModuleSection { module }
        }
    }
}

#[component]
fn ModuleSection(module: ModuleVm) -> Element {
    rsx! {
        section { class: "course-module",
            h3 { "{module.title}" }
            if module.lessons.is_empty() {
                p { class: "lesson-empty", "No lessons yet." }
            } else {
                ol { class: "course-lessons",
                    for lesson in module.lessons {
                        li { class: "course-lesson",
                            Link { to: Route::Lesson { lesson_id: lesson.id }, "{lesson.title}" }
                            span { class: "lesson-kind", "{lesson.kind_label}" }
                            if lesson.is_quiz {
                                Link {
                                    class: "course-lesson__history",
                                    to: Route::History { lesson_id: lesson.id },
                                    "History"
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
