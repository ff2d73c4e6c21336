use dioxus::prelude::*;
use dioxus_router::Link;

use course_core::model::{AnswerFeedback, LessonId};
use services::{QuizStart, QuizUnavailable};

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{OptionVm, QuestionPillVm, QuestionVm, QuizIntent, QuizResultVm, QuizVm};

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

#[derive(Clone, Debug, PartialEq, Eq)]
enum QuizLoad {
    Ready,
    ComingSoon { note: Option<String> },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LastAction {
    Start,
    Apply(QuizIntent),
}

/// Quiz player for one lesson. Mount with `key` set to the lesson id so a
/// new lesson gets a fresh run.
#[component]
pub fn QuizPanel(lesson_id: u64) -> Element {
    let ctx = use_context::<AppContext>();
    let course_id = ctx.course_id();
    let quiz_loop = ctx.quiz_loop();

    let error = use_signal(|| None::<ViewError>);
    let vm = use_signal(|| None::<QuizVm>);
    let last_action = use_signal(|| None::<LastAction>);

    let quiz_loop_for_resource = quiz_loop.clone();
    let resource = use_resource(move || {
        let quiz_loop = quiz_loop_for_resource.clone();
        let mut error = error;
        let mut vm = vm;
        let mut last_action = last_action;

        async move {
            last_action.set(Some(LastAction::Start));
            let start = quiz_loop
                .start_quiz(course_id, LessonId::new(lesson_id))
                .await
                .map_err(|err| ViewError::from_quiz(&err))?;
            error.set(None);
            match start {
                QuizStart::Ready(run) => {
                    vm.set(Some(QuizVm::new(run)));
                    Ok::<_, ViewError>(QuizLoad::Ready)
                }
                QuizStart::Unavailable(QuizUnavailable::ComingSoon { note }) => {
                    vm.set(None);
                    Ok(QuizLoad::ComingSoon { note })
                }
                QuizStart::Unavailable(QuizUnavailable::Invalid(_)) => {
                    vm.set(None);
                    Err(ViewError::QuizUnavailable)
                }
            }
        }
    });
    let state = view_state_from_resource(&resource);

    let dispatch_intent = {
        let quiz_loop = quiz_loop.clone();
        use_callback(move |intent: QuizIntent| {
            let quiz_loop = quiz_loop.clone();
            let mut error = error;
            let mut vm = vm;
            let mut last_action = last_action;

            spawn(async move {
                last_action.set(Some(LastAction::Apply(intent)));
                let taken = vm.write().take();
                let Some(mut local_vm) = taken else {
                    error.set(Some(ViewError::Unknown));
                    return;
                };

                let result = local_vm.apply(&quiz_loop, intent).await;

                // Put the run back even on errors so the learner keeps their answers.
                vm.set(Some(local_vm));
                match result {
                    Ok(_) => error.set(None),
                    Err(err) => error.set(Some(err)),
                }
            });
        })
    };

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<QuizTestHandles>() {
                handles.register(dispatch_intent, vm);
            }
        }
    }

    let retry_action = use_callback(move |()| match last_action() {
        Some(LastAction::Start) | None => {
            let mut resource = resource;
            resource.restart();
        }
        Some(LastAction::Apply(intent)) => dispatch_intent.call(intent),
    });

    let on_key = use_callback(move |evt: KeyboardEvent| {
        let playing = vm.read().as_ref().is_some_and(|vm| !vm.is_submitted());
        if !playing {
            return;
        }
        match evt.data.key() {
            Key::ArrowLeft => {
                evt.prevent_default();
                dispatch_intent.call(QuizIntent::Previous);
            }
            Key::ArrowRight => {
                evt.prevent_default();
                dispatch_intent.call(QuizIntent::Next);
            }
            Key::Character(value) => {
                if let Some(option) = value
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                {
                    evt.prevent_default();
                    dispatch_intent.call(QuizIntent::Select(option));
                }
            }
            _ => {}
        }
    });

    let vm_guard = vm.read();

    rsx! {
        section { class: "quiz", id: "quiz-root", tabindex: "0", onkeydown: on_key,
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading quiz..." }
                },
                ViewState::Error(err) => rsx! {
                    div { class: "quiz-unavailable",
                        p { "{err.message()}" }
                        if err.is_retryable() {
                            button {
                                class: "btn btn-secondary",
                                r#type: "button",
                                onclick: move |_| retry_action.call(()),
                                "Retry"
                            }
                        }
                    }
                },
                ViewState::Ready(QuizLoad::ComingSoon { note }) => rsx! {
                    div { class: "quiz-unavailable",
                        p { class: "quiz-unavailable__title", "This quiz will be available soon." }
                        if let Some(note) = note {
                            p { class: "quiz-unavailable__note", "{note}" }
                        }
                    }
                },
                ViewState::Ready(QuizLoad::Ready) => rsx! {
                    if let Some(err) = *error.read() {
                        div { class: "quiz-error",
                            p { "{err.message()}" }
                            button {
                                class: "btn btn-secondary",
                                r#type: "button",
                                onclick: move |_| retry_action.call(()),
                                "Retry"
                            }
                        }
                    }
                    match vm_guard.as_ref() {
                        None => rsx! {
                            p { "Loading quiz..." }
                        },
                        Some(quiz) => match quiz.result() {
                            Some(result) => rsx! {
                                QuizResultPanel { result, lesson_id, on_intent: dispatch_intent }
                            },
                            None => rsx! {
                                QuizPlayer {
                                    question: quiz.current_question(),
                                    pills: quiz.pills(),
                                    answered_label: quiz.answered_label(),
                                    progress: quiz.progress_percent(),
                                    can_previous: quiz.can_go_previous(),
                                    can_next: quiz.can_go_next(),
                                    on_intent: dispatch_intent,
                                }
                            },
                        },
                    }
                },
            }
        }
    }
}

#[component]
fn QuizPlayer(
    question: QuestionVm,
    pills: Vec<QuestionPillVm>,
    answered_label: String,
    progress: u8,
    can_previous: bool,
    can_next: bool,
    on_intent: EventHandler<QuizIntent>,
) -> Element {
    let feedback = match question.feedback {
        AnswerFeedback::Correct => Some(("quiz-feedback correct", "Correct!")),
        AnswerFeedback::Incorrect => Some(("quiz-feedback wrong", "Not quite.")),
        AnswerFeedback::Ungraded => Some(("quiz-feedback", "Answer recorded.")),
        AnswerFeedback::Unanswered => None,
    };

    rsx! {
        div { class: "quiz-progress",
            span { class: "quiz-progress__label", "{answered_label}" }
            div { class: "quiz-progress__bar",
                div { class: "quiz-progress__fill", style: "width: {progress}%" }
            }
        }
        ol { class: "quiz-pills",
            for pill in pills {
                li {
                    button {
                        class: pill_class(pill),
                        r#type: "button",
                        onclick: move |_| on_intent.call(QuizIntent::GoTo(pill.index)),
                        "{pill.number}"
                    }
                }
            }
        }
        article { class: "quiz-question",
            header { class: "quiz-question__header",
                span { class: "quiz-question__position", "{question.position_label}" }
                if question.marks > 1 {
                    span { class: "quiz-question__marks", "{question.marks} marks" }
                }
            }
            div { class: "quiz-question__text", dangerous_inner_html: "{question.text_html}" }
            ul { class: "quiz-options",
                for option in question.options.clone() {
                    QuizOption { option, locked: question.locked, on_intent }
                }
            }
            if let Some((class, label)) = feedback {
                p { class: "{class}", "{label}" }
            }
            if let Some(explanation) = question.explanation_html.clone() {
                div { class: "quiz-explanation", dangerous_inner_html: "{explanation}" }
            }
        }
        footer { class: "quiz-nav",
            button {
                class: "btn btn-secondary",
                r#type: "button",
                disabled: !can_previous,
                onclick: move |_| on_intent.call(QuizIntent::Previous),
                "Previous"
            }
            if can_next {
                button {
                    class: "btn btn-secondary",
                    r#type: "button",
                    onclick: move |_| on_intent.call(QuizIntent::Next),
                    "Next"
                }
            }
            button {
                class: "btn btn-primary",
                id: "quiz-submit",
                r#type: "button",
                onclick: move |_| on_intent.call(QuizIntent::Submit),
                "Submit Quiz"
            }
        }
    }
}

fn pill_class(pill: QuestionPillVm) -> &'static str {
    if pill.current {
        "quiz-pill current"
    } else if pill.answered {
        "quiz-pill answered"
    } else {
        "quiz-pill"
    }
}

#[component]
fn QuizOption(option: OptionVm, locked: bool, on_intent: EventHandler<QuizIntent>) -> Element {
    let index = option.index;
    rsx! {
        li {
            button {
                class: "{option.state.class()}",
                r#type: "button",
                disabled: locked,
                onclick: move |_| on_intent.call(QuizIntent::Select(index)),
                span { class: "quiz-option__letter", "{option.letter}" }
                span { class: "quiz-option__text", dangerous_inner_html: "{option.html}" }
            }
        }
    }
}

#[component]
fn QuizResultPanel(
    result: QuizResultVm,
    lesson_id: u64,
    on_intent: EventHandler<QuizIntent>,
) -> Element {
    rsx! {
        div { class: "quiz-result",
            h3 { class: "quiz-result__title", "Quiz complete" }
            p { class: "quiz-result__score", "Score: {result.score_percent}%" }
            dl { class: "summary",
                dt { "Correct" }
                dd { "{result.correct} / {result.total}" }

                dt { "Answered" }
                dd { "{result.answered}" }

                dt { "Unanswered" }
                dd { "{result.unanswered}" }

                dt { "Marks" }
                dd { "{result.marks_awarded} / {result.marks_total}" }
            }
            if !result.is_saved() {
                p { class: "quiz-result__note", "This result has not been saved yet." }
            }
            div { class: "quiz-result__actions",
                button {
                    class: "btn btn-primary",
                    id: "quiz-retake",
                    r#type: "button",
                    onclick: move |_| on_intent.call(QuizIntent::Retake),
                    "Retake Quiz"
                }
                Link { class: "btn btn-ghost", to: Route::History { lesson_id }, "View History" }
            }
        }
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct QuizTestHandles {
    dispatch: Rc<RefCell<Option<Callback<QuizIntent>>>>,
    vm: Rc<RefCell<Option<Signal<Option<QuizVm>>>>>,
}

#[cfg(test)]
impl QuizTestHandles {
    pub(crate) fn register(&self, dispatch: Callback<QuizIntent>, vm: Signal<Option<QuizVm>>) {
        *self.dispatch.borrow_mut() = Some(dispatch);
        *self.vm.borrow_mut() = Some(vm);
    }

    pub(crate) fn dispatch(&self) -> Callback<QuizIntent> {
        (*self.dispatch.borrow()).expect("quiz dispatch registered")
    }

    pub(crate) fn vm(&self) -> Signal<Option<QuizVm>> {
        (*self.vm.borrow()).expect("quiz vm registered")
    }
}
