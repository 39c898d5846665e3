mod controller;
mod workflow;

// Public API of the quiz subsystem.
pub use crate::error::QuizError;
pub use controller::{QuizController, SubmitOutcome};
pub use workflow::{QuizLoopService, QuizRun};
