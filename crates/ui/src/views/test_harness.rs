use std::sync::Arc;

use async_trait::async_trait;
use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use quiz_core::model::{PersonaCatalog, Question, QuizProfile, QuizSettings, QuizSettingsDraft};
use quiz_core::time::fixed_now;
use services::evaluator::{EvaluationRequest, Evaluator};
use services::{AppServices, Clock, EvaluatorError, QuizLoopService, QuizRun};
use storage::repository::{InMemoryRepository, Storage};

use crate::context::{QuizSetup, QuizSlot, UiApp, build_app_context};
use crate::views::quiz::QuizTestHandles;
use crate::views::{HomeView, QuizView, ResultView};

/// Grades `options[1]` as correct and echoes the labels the parser expects.
pub struct KeyedEvaluator;

#[async_trait]
impl Evaluator for KeyedEvaluator {
    async fn evaluate(&self, request: &EvaluationRequest) -> Result<String, EvaluatorError> {
        let correct = &request.question.options()[1];
        let marker = if &request.user_answer == correct {
            "RESULT:[CORRECT]"
        } else {
            "RESULT:[INCORRECT]"
        };
        Ok(format!(
            "{marker}\nあなたの回答: {}\n正解: {correct}\n解説: **{correct}**が正しい答えです。",
            request.user_answer
        ))
    }
}

/// Answers with an explanation that sanitizes down to nothing.
pub struct ScriptOnlyEvaluator;

#[async_trait]
impl Evaluator for ScriptOnlyEvaluator {
    async fn evaluate(&self, request: &EvaluationRequest) -> Result<String, EvaluatorError> {
        Ok(format!(
            "RESULT:[CORRECT]\nあなたの回答: {}\n正解: {}\n解説: <script>alert(1)</script>",
            request.user_answer, request.user_answer
        ))
    }
}

#[derive(Clone)]
struct TestApp {
    services: Arc<AppServices>,
}

impl UiApp for TestApp {
    fn quiz_loop(&self) -> Arc<QuizLoopService> {
        self.services.quiz_loop()
    }

    fn settings(&self) -> QuizSettings {
        self.services.settings().clone()
    }

    fn catalog(&self) -> PersonaCatalog {
        self.services.catalog().clone()
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Home,
    Quiz,
    Results,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
    run: Option<QuizRun>,
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

    let setup = use_signal(QuizSetup::default);
    let run = use_signal(|| props.run.clone());
    use_context_provider(|| QuizSlot { setup, run });

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
        ViewKind::Quiz => rsx! { QuizView {} },
        ViewKind::Results => rsx! { ResultView {} },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub services: Arc<AppServices>,
    pub quiz_handles: QuizTestHandles,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        for _ in 0..4 {
            let _ = tokio::time::timeout(
                std::time::Duration::from_millis(50),
                self.dom.wait_for_work(),
            )
            .await;
            self.dom.render_immediate(&mut NoOpMutations);
            self.dom.process_events();
        }
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

pub fn travel_questions(n: usize) -> Vec<Question> {
    (0..n)
        .map(|i| {
            Question::new(
                format!("旅行クイズ{}", i + 1),
                ["パスポートのみ", "ESTAの申請", "何も要らない"],
            )
            .expect("valid question")
        })
        .collect()
}

pub fn settings(profile: QuizProfile, max_questions: u32) -> QuizSettings {
    QuizSettingsDraft {
        max_questions: Some(max_questions),
        ..QuizSettingsDraft::from_profile(profile)
    }
    .validate()
    .expect("valid settings")
}

pub fn build_services(
    questions: Vec<Question>,
    settings: QuizSettings,
    evaluator: Arc<dyn Evaluator>,
) -> Arc<AppServices> {
    let storage = Storage {
        questions: Arc::new(InMemoryRepository::with_questions(questions)),
    };
    Arc::new(AppServices::from_storage(
        &storage,
        Clock::fixed(fixed_now()),
        settings,
        evaluator,
    ))
}

pub fn setup_view_harness(
    view: ViewKind,
    services: Arc<AppServices>,
    run: Option<QuizRun>,
) -> ViewHarness {
    let quiz_handles = QuizTestHandles::default();
    let app = Arc::new(TestApp {
        services: Arc::clone(&services),
    });

    let dom = VirtualDom::new_with_props(
        ViewRouterHarness,
        ViewHarnessProps {
            app,
            view,
            run,
            quiz_handles: quiz_handles.clone(),
        },
    );

    ViewHarness {
        dom,
        services,
        quiz_handles,
    }
}
