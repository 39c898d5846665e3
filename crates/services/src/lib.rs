#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod evaluator;
pub mod quiz;

pub use quiz_core::Clock;

pub use app_services::AppServices;
pub use error::{AppServicesError, EvaluatorError, QuizError};
pub use evaluator::{EvaluationRequest, Evaluator, EvaluatorConfig, OpenAiEvaluator};
pub use quiz::{QuizController, QuizLoopService, QuizRun, SubmitOutcome};
