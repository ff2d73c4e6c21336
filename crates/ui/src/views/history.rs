use dioxus::prelude::*;
use dioxus_router::Link;

use course_core::model::LessonId;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{AttemptCardVm, map_attempt_card, map_attempt_cards};

const HISTORY_LIMIT: u32 = 20;

#[derive(Clone, Debug, PartialEq)]
struct HistoryData {
    lesson_title: Option<String>,
    best: Option<AttemptCardVm>,
    cards: Vec<AttemptCardVm>,
}

#[component]
pub fn HistoryView(lesson_id: u64) -> Element {
    let ctx = use_context::<AppContext>();
    let attempts = ctx.attempts();
    let courses = ctx.courses();
    let course_id = ctx.course_id();

    let resource = use_resource(use_reactive!(|(lesson_id,)| {
        let attempts = attempts.clone();
        let courses = courses.clone();
        async move {
            let lesson = LessonId::new(lesson_id);
            let items = attempts
                .list_attempts(lesson, HISTORY_LIMIT)
                .await
                .map_err(|_| ViewError::Unknown)?;
            let best = attempts
                .best_attempt(lesson)
                .await
                .map_err(|_| ViewError::Unknown)?;
            // History stays readable offline; the title is decoration.
            let lesson_title = courses
                .get_lesson(course_id, lesson)
                .await
                .ok()
                .map(|ctx| ctx.lesson.title);
            Ok::<_, ViewError>(HistoryData {
                lesson_title,
                best: best.as_ref().map(map_attempt_card),
                cards: map_attempt_cards(&items),
            })
        }
    }));

    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page",
            h2 { "Quiz History" }

            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(data) => rsx! {
                    if let Some(title) = data.lesson_title.clone() {
                        p { class: "history-lesson",
                            Link { to: Route::Lesson { lesson_id }, "{title}" }
                        }
                    }
                    if let Some(best) = data.best.clone() {
                        p { class: "history-best", "Best score: {best.score_label}" }
                    }
                    if data.cards.is_empty() {
                        p { "No attempts yet." }
                    } else {
                        ul {
                            for card in data.cards {
                                AttemptCard { card }
                            }
                        }
                    }
                },
                ViewState::Error(err) => rsx! {
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
fn AttemptCard(card: AttemptCardVm) -> Element {
    rsx! {
        li {
            Link { class: "summary-link", to: Route::Attempt { attempt_id: card.id },
                span { class: "summary-date", "{card.completed_at_str}" }
                span { class: "summary-score", "{card.score_label}" }
                span { class: "summary-cta", "View" }
            }
            p { "{card.detail}" }
        }
    }
}
