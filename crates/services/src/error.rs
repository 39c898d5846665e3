//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{
    EvaluatorSettingsError, PersonaError, QuestionIndex, SessionStateError,
};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by an `Evaluator`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EvaluatorError {
    #[error("evaluator is not configured")]
    Disabled,
    #[error("evaluator returned an empty response")]
    EmptyResponse,
    #[error("evaluator request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by the quiz flow.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error("no option selected")]
    InvalidSelection,
    #[error("question source is empty")]
    EmptySource,
    #[error("question {index} is out of range for a source of {len} rows")]
    QuestionOutOfRange { index: QuestionIndex, len: usize },
    #[error("quiz already completed")]
    Completed,
    #[error("quiz is not complete: {answered} of {total} answered")]
    NotComplete { answered: u32, total: u32 },
    #[error("only one persona may be selected, got {selected}")]
    TooManyPersonas { selected: usize },
    #[error(transparent)]
    Persona(#[from] PersonaError),
    #[error(transparent)]
    Session(SessionStateError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<SessionStateError> for QuizError {
    fn from(err: SessionStateError) -> Self {
        match err {
            SessionStateError::NotComplete { answered, total } => {
                QuizError::NotComplete { answered, total }
            }
            other => QuizError::Session(other),
        }
    }
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    EvaluatorSettings(#[from] EvaluatorSettingsError),
}
