use thiserror::Error;

use crate::model::{
    EvaluatorSettingsError, PersonaError, QuestionError, QuizSettingsError, SessionStateError,
};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Persona(#[from] PersonaError),
    #[error(transparent)]
    Session(#[from] SessionStateError),
    #[error(transparent)]
    QuizSettings(#[from] QuizSettingsError),
    #[error(transparent)]
    EvaluatorSettings(#[from] EvaluatorSettingsError),
}
