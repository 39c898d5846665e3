//! Grading backends.
//!
//! An evaluator turns a question, the user's pick and the persona voice into
//! free text. Callers never trust that text's shape; it goes through
//! [`quiz_core::ResponseParser`].

mod openai;
mod prompt;

use async_trait::async_trait;
use quiz_core::model::{PersonaId, Question};

use crate::error::EvaluatorError;

pub use openai::{EvaluatorConfig, OpenAiEvaluator, settings_from_env};
pub use prompt::{
    ADVISOR_HEADER, EVALUATION_FAILED_ANSWER, EVALUATION_FAILED_EXPLANATION,
    build_grading_prompt, build_system_instructions, synthetic_failure_response,
};

/// Everything an evaluator needs to grade one answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationRequest {
    pub question: Question,
    pub user_answer: String,
    pub roles: Vec<PersonaId>,
    /// Persona voice, already rendered from the catalog.
    pub system_instructions: String,
}

impl EvaluationRequest {
    #[must_use]
    pub fn grading_prompt(&self) -> String {
        build_grading_prompt(&self.question, &self.user_answer)
    }
}

#[async_trait]
pub trait Evaluator: Send + Sync {
    /// Grade one answer and return the raw response text.
    ///
    /// # Errors
    ///
    /// Returns `EvaluatorError` on transport failures or when no usable text
    /// came back.
    async fn evaluate(&self, request: &EvaluationRequest) -> Result<String, EvaluatorError>;
}
