use std::sync::Arc;

use quiz_core::model::{EvaluatorSettings, PersonaCatalog, QuizSettings};
use storage::repository::Storage;

use crate::Clock;
use crate::error::AppServicesError;
use crate::evaluator::{Evaluator, OpenAiEvaluator};
use crate::quiz::{QuizController, QuizLoopService};

/// Assembles app-facing services.
#[derive(Clone)]
pub struct AppServices {
    quiz_loop: Arc<QuizLoopService>,
    settings: QuizSettings,
    catalog: PersonaCatalog,
}

impl AppServices {
    /// Build services backed by `SQLite` storage and the HTTP evaluator.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        settings: QuizSettings,
        evaluator_settings: &EvaluatorSettings,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        if storage.questions.count_questions().await? == 0 {
            log::warn!("question table in {db_url} is empty; run the seed command first");
        }
        let evaluator: Arc<dyn Evaluator> =
            Arc::new(OpenAiEvaluator::from_settings(evaluator_settings));
        Ok(Self::from_storage(&storage, clock, settings, evaluator))
    }

    /// Build services over any storage and evaluator.
    #[must_use]
    pub fn from_storage(
        storage: &Storage,
        clock: Clock,
        settings: QuizSettings,
        evaluator: Arc<dyn Evaluator>,
    ) -> Self {
        let catalog = PersonaCatalog::travel();
        let controller = Arc::new(
            QuizController::new(evaluator, settings.clone(), catalog.clone()).with_clock(clock),
        );
        let quiz_loop = Arc::new(QuizLoopService::new(
            controller,
            Arc::clone(&storage.questions),
        ));
        Self {
            quiz_loop,
            settings,
            catalog,
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
