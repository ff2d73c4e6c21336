use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use course_core::model::CourseId;
use course_core::time::fixed_now;
use services::{
    Clock, CourseService, CourseSource, InMemoryCourseSource, QuizAttemptService, QuizLoopService,
};
use storage::repository::Storage;

use crate::context::{UiApp, build_app_context};
use crate::views::quiz::QuizTestHandles;
use crate::views::{AttemptView, HistoryView, HomeView, LessonView};
use crate::vm::{QuizIntent, QuizVm};

#[derive(Clone)]
struct TestApp {
    course_id: CourseId,
    courses: Arc<CourseService>,
    quiz_loop: Arc<QuizLoopService>,
    attempts: Arc<QuizAttemptService>,
}

impl UiApp for TestApp {
    fn course_id(&self) -> CourseId {
        self.course_id
    }

    fn courses(&self) -> Arc<CourseService> {
        Arc::clone(&self.courses)
    }

    fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }

    fn attempts(&self) -> Arc<QuizAttemptService> {
        Arc::clone(&self.attempts)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Home,
    Lesson(u64),
    History(u64),
    Attempt(i64),
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
    quiz_handles: QuizTestHandles,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view);
    use_context_provider(|| props.quiz_handles.clone());
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Home => rsx! { HomeView {} },
        ViewKind::Lesson(lesson_id) => rsx! { LessonView { lesson_id } },
        ViewKind::History(lesson_id) => rsx! { HistoryView { lesson_id } },
        ViewKind::Attempt(attempt_id) => rsx! { AttemptView { attempt_id } },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub storage: Storage,
    quiz_handles: QuizTestHandles,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Rebuild, then let nested resources resolve.
    pub async fn settle(&mut self) {
        self.rebuild();
        for _ in 0..4 {
            self.drive_async().await;
        }
    }

    pub async fn dispatch_quiz(&mut self, intent: QuizIntent) {
        let dispatch = self.quiz_handles.dispatch();
        self.dom.in_runtime(|| dispatch.call(intent));
        for _ in 0..2 {
            self.drive_async().await;
        }
    }

    pub fn quiz_vm(&self) -> Option<QuizVm> {
        let vm = self.quiz_handles.vm();
        self.dom.in_runtime(|| vm.read().clone())
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn setup_view_harness(view: ViewKind) -> ViewHarness {
    setup_view_harness_with(view, Storage::in_memory(), Arc::new(InMemoryCourseSource::demo()))
}

pub fn setup_view_harness_with(
    view: ViewKind,
    storage: Storage,
    source: Arc<dyn CourseSource>,
) -> ViewHarness {
    let clock = Clock::fixed(fixed_now());
    let courses = CourseService::new(source);
    let quiz_loop = Arc::new(QuizLoopService::new(
        clock,
        courses.clone(),
        Arc::clone(&storage.attempts),
    ));
    let attempts = Arc::new(QuizAttemptService::new(Arc::clone(&storage.attempts)));

    let app = Arc::new(TestApp {
        course_id: CourseId::new(1),
        courses: Arc::new(courses),
        quiz_loop,
        attempts,
    });
    let quiz_handles = QuizTestHandles::default();

    let dom = VirtualDom::new_with_props(
        ViewRouterHarness,
        ViewHarnessProps {
            app,
            view,
            quiz_handles: quiz_handles.clone(),
        },
    );

    ViewHarness {
        dom,
        storage,
        quiz_handles,
    }
}
