use std::sync::Arc;

use dioxus::prelude::*;
use quiz_core::model::{PersonaCatalog, PersonaId, QuizSettings};
use services::{QuizLoopService, QuizRun};

pub trait UiApp: Send + Sync {
    fn quiz_loop(&self) -> Arc<QuizLoopService>;
    fn settings(&self) -> QuizSettings;
    fn catalog(&self) -> PersonaCatalog;
}

#[derive(Clone)]
pub struct AppContext {
    quiz_loop: Arc<QuizLoopService>,
    settings: QuizSettings,
    catalog: PersonaCatalog,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            quiz_loop: app.quiz_loop(),
            settings: app.settings(),
            catalog: app.catalog(),
        }
    }

    #[must_use]
    pub fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }

    #[must_use]
    pub fn settings(&self) -> &QuizSettings {
        &self.settings
    }

    #[must_use]
    pub fn catalog(&self) -> &PersonaCatalog {
        &self.catalog
    }
}

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}

/// Choices made on the start screen.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QuizSetup {
    pub nickname: String,
    pub roles: Vec<PersonaId>,
}

/// Per-window quiz state shared by the start, quiz and result screens.
///
/// Each window owns exactly one slot, so a session is never shared.
#[derive(Clone, Copy, PartialEq)]
pub struct QuizSlot {
    pub setup: Signal<QuizSetup>,
    pub run: Signal<Option<QuizRun>>,
}

impl QuizSlot {
    /// Drop the current run so the next visit to the quiz screen starts fresh.
    pub fn reset(mut self) {
        self.run.set(None);
    }
}

/// Create the window's `QuizSlot` and provide it to descendants.
pub fn use_quiz_slot_provider() -> QuizSlot {
    let setup = use_signal(QuizSetup::default);
    let run = use_signal(|| None::<QuizRun>);
    use_context_provider(|| QuizSlot { setup, run })
}

#[must_use]
pub fn use_quiz_slot() -> QuizSlot {
    use_context::<QuizSlot>()
}
