mod evaluation;
mod evaluator_settings;
mod ids;
mod persona;
mod question;
mod quiz_settings;
mod session;

pub use evaluation::{
    CORRECT_ANSWER_UNAVAILABLE, CORRECT_MARKER, EXPLANATION_UNAVAILABLE, EvaluationField,
    EvaluationResult,
};
pub use evaluator_settings::{
    DEFAULT_EVALUATOR_BASE_URL, DEFAULT_EVALUATOR_MODEL, DEFAULT_EVALUATOR_TEMPERATURE,
    EvaluatorSettings, EvaluatorSettingsDraft, EvaluatorSettingsError,
};
pub use ids::{ParseIdError, QuestionIndex, SessionId};
pub use persona::{Persona, PersonaCatalog, PersonaError, PersonaId};
pub use question::{OptionLabel, Question, QuestionBank, QuestionError, QuestionSource};
pub use quiz_settings::{
    DEFAULT_MAX_QUESTIONS, EXTENDED_MAX_QUESTIONS, PersonaSelection, QuizProfile, QuizSettings,
    QuizSettingsDraft, QuizSettingsError,
};
pub use session::{
    AnswerRecord, QuizPhase, QuizProgress, QuizResult, SessionState, SessionStateError,
};
