use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};

use crate::views::{AttemptView, HistoryView, HomeView, LessonView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", HomeView)] Home {},
        #[route("/lesson/:lesson_id", LessonView)] Lesson { lesson_id: u64 },
        #[route("/lesson/:lesson_id/history", HistoryView)] History { lesson_id: u64 },
        #[route("/attempt/:attempt_id", AttemptView)] Attempt { attempt_id: i64 },
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            Sidebar {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn Sidebar() -> Element {
    rsx! {
        nav { class: "sidebar",
            h1 { "Course" }
            ul {
                li { Link { to: Route::Home {}, "Outline" } }
            }
        }
    }
}
