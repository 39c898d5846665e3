use serde::{Deserialize, Serialize};
use std::fmt;

/// Shown in place of the correct answer when the evaluator did not state one.
pub const CORRECT_ANSWER_UNAVAILABLE: &str = "正解の取得に失敗しました";

/// Shown in place of the explanation when the evaluator did not give one.
pub const EXPLANATION_UNAVAILABLE: &str = "解説の取得に失敗しました";

/// Literal marker the evaluator emits for a correct answer.
pub const CORRECT_MARKER: &str = "RESULT:[CORRECT]";

/// Typed fields extracted from one evaluator response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub is_correct: bool,
    pub user_answer: String,
    pub correct_answer: String,
    pub explanation: String,
}

/// Labelled field of an evaluator response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EvaluationField {
    UserAnswer,
    CorrectAnswer,
    Explanation,
}

impl EvaluationField {
    /// Label text as written by the evaluator.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            EvaluationField::UserAnswer => "あなたの回答",
            EvaluationField::CorrectAnswer => "正解",
            EvaluationField::Explanation => "解説",
        }
    }
}

impl fmt::Display for EvaluationField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EvaluationField::UserAnswer => "user answer",
            EvaluationField::CorrectAnswer => "correct answer",
            EvaluationField::Explanation => "explanation",
        };
        f.write_str(name)
    }
}
