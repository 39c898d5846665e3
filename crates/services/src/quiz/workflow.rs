use std::sync::{Arc, OnceLock};

use quiz_core::model::{
    PersonaId, Question, QuestionBank, QuestionIndex, QuestionSource, QuizProgress, QuizResult,
    SessionState,
};
use storage::repository::QuestionRepository;

use super::controller::{QuizController, SubmitOutcome};
use crate::error::QuizError;

/// One user's quiz in flight: the session state plus the questions it runs over.
#[derive(Debug, Clone)]
pub struct QuizRun {
    state: SessionState,
    bank: Arc<QuestionBank>,
    last_outcome: Option<SubmitOutcome>,
    result: Option<QuizResult>,
}

impl QuizRun {
    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    /// Outcome of the answer given to the question on screen, if any.
    #[must_use]
    pub fn last_outcome(&self) -> Option<&SubmitOutcome> {
        self.last_outcome.as_ref()
    }

    /// Result snapshot, taken when the last question was scored.
    #[must_use]
    pub fn result(&self) -> Option<&QuizResult> {
        self.result.as_ref()
    }

    #[must_use]
    pub fn progress(&self) -> QuizProgress {
        self.state.progress()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.state.is_complete()
    }

    #[must_use]
    pub fn current_index(&self) -> QuestionIndex {
        self.state.current_question_index()
    }

    /// The question on screen has been scored and the user may move on.
    #[must_use]
    pub fn awaiting_next(&self) -> bool {
        self.state.is_answered(self.current_index())
    }
}

/// Orchestrates quiz start, grading and navigation over the stored questions.
pub struct QuizLoopService {
    controller: Arc<QuizController>,
    questions: Arc<dyn QuestionRepository>,
    bank: OnceLock<Arc<QuestionBank>>,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(controller: Arc<QuizController>, questions: Arc<dyn QuestionRepository>) -> Self {
        Self {
            controller,
            questions,
            bank: OnceLock::new(),
        }
    }

    #[must_use]
    pub fn controller(&self) -> Arc<QuizController> {
        Arc::clone(&self.controller)
    }

    /// The question table, read from storage on first use.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Storage` if the table cannot be read.
    pub async fn load_bank(&self) -> Result<Arc<QuestionBank>, QuizError> {
        if let Some(bank) = self.bank.get() {
            return Ok(Arc::clone(bank));
        }
        let loaded = Arc::new(self.questions.load_bank().await?);
        log::info!("loaded {} questions", loaded.len());
        Ok(Arc::clone(self.bank.get_or_init(|| loaded)))
    }

    /// Start a fresh quiz.
    ///
    /// # Errors
    ///
    /// Returns `QuizError` if storage fails, no questions exist, or the
    /// persona selection is rejected.
    pub async fn start(
        &self,
        nickname: Option<&str>,
        roles: Vec<PersonaId>,
    ) -> Result<QuizRun, QuizError> {
        let bank = self.load_bank().await?;
        let mut state = self.controller.start(nickname, roles, bank.len())?;
        self.controller.ensure_unanswered(&mut state, bank.as_ref());
        Ok(QuizRun {
            state,
            bank,
            last_outcome: None,
            result: None,
        })
    }

    /// The question on screen.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::QuestionOutOfRange` if the cursor is past the table.
    pub fn current<'r>(&self, run: &'r QuizRun) -> Result<&'r Question, QuizError> {
        self.controller.current_question(&run.state, run.bank.as_ref())
    }

    /// Grade the answer to the question on screen.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidSelection` or `QuizError::Completed` without
    /// touching the run.
    pub async fn submit(
        &self,
        run: &mut QuizRun,
        chosen_option: Option<&str>,
    ) -> Result<SubmitOutcome, QuizError> {
        let index = run.state.current_question_index();
        let bank = Arc::clone(&run.bank);
        let outcome = self
            .controller
            .submit_answer(&mut run.state, bank.as_ref(), index, chosen_option)
            .await?;
        if outcome.recorded && run.result.is_none() && run.state.is_complete() {
            run.result = Some(self.controller.finalize(&run.state)?);
        }
        run.last_outcome = Some(outcome.clone());
        Ok(outcome)
    }

    /// Move to the next unanswered question.
    pub fn next(&self, run: &mut QuizRun) -> QuestionIndex {
        run.last_outcome = None;
        self.controller.advance(&mut run.state, run.bank.as_ref())
    }

    /// Snapshot the finished quiz.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NotComplete` while questions remain.
    pub fn finalize(&self, run: &QuizRun) -> Result<QuizResult, QuizError> {
        match &run.result {
            Some(result) => Ok(result.clone()),
            None => self.controller.finalize(&run.state),
        }
    }
}
