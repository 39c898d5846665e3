use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};

use crate::context::{AppContext, QuizSetup, use_quiz_slot};
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{
    FeedbackDisplay, GRADING_MESSAGE, QuizScreenVm, SELECT_PROMPT, SUBMIT_LABEL,
    map_quiz_screen,
};

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum QuizIntent {
    Select(String),
    Submit,
    Next,
}

#[component]
pub fn QuizView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let slot = use_quiz_slot();
    let quiz_loop = ctx.quiz_loop();

    let selected = use_signal(|| None::<String>);
    let grading = use_signal(|| false);
    let error = use_signal(|| None::<ViewError>);

    let quiz_loop_for_resource = quiz_loop.clone();
    let resource = use_resource(move || {
        let quiz_loop = quiz_loop_for_resource.clone();
        let mut run = slot.run;
        async move {
            if run.peek().is_some() {
                return Ok::<_, ViewError>(());
            }
            let setup = QuizSetup::clone(&slot.setup.peek());
            let started = quiz_loop
                .start(Some(setup.nickname.as_str()), setup.roles)
                .await?;
            run.set(Some(started));
            Ok(())
        }
    });
    let state = view_state_from_resource(&resource);

    let dispatch_intent = {
        let quiz_loop = quiz_loop.clone();
        use_callback(move |intent: QuizIntent| {
            let mut selected = selected;
            let mut grading = grading;
            let mut error = error;
            let mut run = slot.run;

            match intent {
                QuizIntent::Select(option) => {
                    selected.set(Some(option));
                    error.set(None);
                }
                QuizIntent::Submit => {
                    if grading() {
                        return;
                    }
                    let Some(choice) = selected() else {
                        error.set(Some(ViewError::NoSelection));
                        return;
                    };
                    let quiz_loop = quiz_loop.clone();
                    spawn(async move {
                        let Some(mut local_run) = run.peek().as_ref().cloned() else {
                            error.set(Some(ViewError::Unknown));
                            return;
                        };
                        grading.set(true);
                        let result = quiz_loop.submit(&mut local_run, Some(choice.as_str())).await;
                        run.set(Some(local_run));
                        grading.set(false);
                        match result {
                            Ok(_) => error.set(None),
                            Err(err) => error.set(Some(err.into())),
                        }
                    });
                }
                QuizIntent::Next => {
                    let complete = {
                        let mut guard = run.write();
                        let Some(active) = guard.as_mut() else {
                            return;
                        };
                        if !active.is_complete() {
                            quiz_loop.next(active);
                        }
                        active.is_complete()
                    };
                    selected.set(None);
                    error.set(None);
                    if complete {
                        navigator.push(Route::Results {});
                    }
                }
            }
        })
    };

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<QuizTestHandles>() {
                handles.register(dispatch_intent);
            }
        }
    }

    let screen = {
        let run_guard = slot.run.read();
        run_guard.as_ref().and_then(|active| {
            quiz_loop
                .current(active)
                .ok()
                .map(|question| map_quiz_screen(active, question))
        })
    };

    rsx! {
        div { class: "page quiz-page",
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { class: "loading", "問題を準備しています..." }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "error", "{err.message()}" }
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        onclick: move |_| {
                            let mut resource = resource;
                            resource.restart();
                        },
                        "再試行"
                    }
                    Link { class: "btn btn-link", to: Route::Home {}, "スタートに戻る" }
                },
                ViewState::Ready(()) => match screen {
                    Some(vm) => rsx! {
                        QuizScreen {
                            vm,
                            selected: selected(),
                            grading: grading(),
                            error: error(),
                            on_intent: dispatch_intent,
                        }
                    },
                    None => rsx! {
                        p { class: "error", "{ViewError::Unknown.message()}" }
                        Link { class: "btn btn-link", to: Route::Home {}, "スタートに戻る" }
                    },
                },
            }
        }
    }
}

#[component]
fn QuizScreen(
    vm: QuizScreenVm,
    selected: Option<String>,
    grading: bool,
    error: Option<ViewError>,
    on_intent: Callback<QuizIntent>,
) -> Element {
    let locked = vm.answered || grading;
    let options = vm.options.iter().map(|option| {
        let text = option.text.clone();
        let checked = if vm.answered {
            vm.is_chosen(&option.text)
        } else {
            selected.as_deref() == Some(option.text.as_str())
        };
        rsx! {
            label { key: "{option.label}", class: "quiz-option",
                input {
                    r#type: "radio",
                    name: "quiz-option",
                    value: "{option.text}",
                    checked: checked,
                    disabled: locked,
                    onchange: move |_| on_intent.call(QuizIntent::Select(text.clone())),
                }
                span { class: "quiz-option-label", "{option.label}." }
                span { class: "quiz-option-text", "{option.text}" }
            }
        }
    });
    let progress_style = format!("width: {:.1}%;", vm.progress_percent);

    rsx! {
        header { class: "view-header",
            h2 { class: "view-title", "{vm.heading}" }
            div { class: "progress",
                div { class: "progress-bar", style: "{progress_style}" }
            }
            span { class: "progress-label", "{vm.progress_label}" }
        }
        div { class: "view-divider" }
        p { class: "quiz-prompt", "{vm.prompt}" }
        fieldset { class: "quiz-options",
            legend { "{SELECT_PROMPT}" }
            {options}
        }
        if let Some(err) = error {
            p { class: "warning", "{err.message()}" }
        }
        if !vm.answered {
            button {
                class: "btn btn-primary",
                id: "quiz-submit",
                r#type: "button",
                disabled: grading,
                onclick: move |_| on_intent.call(QuizIntent::Submit),
                "{SUBMIT_LABEL}"
            }
        }
        if grading {
            div { class: "spinner", "{GRADING_MESSAGE}" }
        }
        if let Some(feedback) = vm.feedback.clone() {
            FeedbackPanel { feedback }
        }
        if let Some(next) = vm.next {
            button {
                class: "btn btn-primary",
                id: "quiz-next",
                r#type: "button",
                onclick: move |_| on_intent.call(QuizIntent::Next),
                "{next.label()}"
            }
        }
    }
}

#[component]
fn FeedbackPanel(feedback: FeedbackDisplay) -> Element {
    match feedback {
        FeedbackDisplay::Formatted(vm) => rsx! {
            div { class: "{vm.banner.class}",
                span { class: "verdict-icon", "{vm.banner.icon}" }
                span { class: "verdict-title", "{vm.banner.title}" }
                if let Some(badge) = vm.banner.badge {
                    span { class: "verdict-badge", "{badge}" }
                }
            }
            div { class: "feedback",
                p { strong { "あなたの回答: " } "{vm.user_answer}" }
                p { strong { "正解: " } "{vm.correct_answer}" }
                div { class: "feedback-explanation",
                    strong { "💡 解説:" }
                    div { dangerous_inner_html: "{vm.explanation_html}" }
                }
            }
        },
        FeedbackDisplay::Raw { banner, text } => rsx! {
            div { class: "{banner.class}",
                span { class: "verdict-icon", "{banner.icon}" }
                span { class: "verdict-title", "{banner.title}" }
            }
            div { class: "feedback feedback-raw",
                p { class: "error", "回答の表示中にエラーが発生しました。" }
                p { strong { "GPTレスポンス:" } }
                pre { "{text}" }
            }
        },
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct QuizTestHandles {
    dispatch: Rc<RefCell<Option<Callback<QuizIntent>>>>,
}

#[cfg(test)]
impl QuizTestHandles {
    pub(crate) fn register(&self, dispatch: Callback<QuizIntent>) {
        *self.dispatch.borrow_mut() = Some(dispatch);
    }

    pub(crate) fn dispatch(&self) -> Callback<QuizIntent> {
        (*self.dispatch.borrow()).expect("quiz dispatch registered")
    }
}
