use dioxus::prelude::*;
use dioxus_router::Link;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{AttemptDetailVm, map_attempt_detail};

#[component]
pub fn AttemptView(attempt_id: i64) -> Element {
    let ctx = use_context::<AppContext>();
    let attempts = ctx.attempts();

    let resource = use_resource(use_reactive!(|(attempt_id,)| {
        let attempts = attempts.clone();
        async move {
            let attempt = attempts.get_attempt(attempt_id).await.map_err(|err| {
                if err.is_not_found() {
                    ViewError::NotFound
                } else {
                    ViewError::Unknown
                }
            })?;
            Ok::<_, ViewError>(map_attempt_detail(&attempt))
        }
    }));

    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page",
            h2 { "Attempt Summary" }

            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(detail) => rsx! {
                    AttemptDetails { detail }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                },
            }
        }
    }
}

#[component]
fn AttemptDetails(detail: AttemptDetailVm) -> Element {
    rsx! {
        dl { class: "summary",
            dt { "Started" }
            dd { "{detail.started_at_str}" }

            dt { "Completed" }
            dd { "{detail.completed_at_str}" }

            dt { "Time taken" }
            dd { "{detail.duration_str}" }

            dt { "Score" }
            dd { "{detail.score_percent}%" }

            dt { "Correct" }
            dd { "{detail.correct} / {detail.total}" }

            dt { "Answered" }
            dd { "{detail.answered}" }

            dt { "Unanswered" }
            dd { "{detail.unanswered}" }

            dt { "Marks" }
            dd { "{detail.marks_str}" }
        }
        Link { to: Route::History { lesson_id: detail.lesson_id }, "Back to history" }
    }
}
