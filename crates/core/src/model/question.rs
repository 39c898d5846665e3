use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::model::ids::QuestionIndex;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt is empty")]
    EmptyPrompt,

    #[error("option {0} is empty")]
    EmptyOption(OptionLabel),
}

//
// ─── OPTION LABELS ────────────────────────────────────────────────────────────
//

/// Column label of an answer option in the question table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionLabel {
    A,
    B,
    C,
}

impl OptionLabel {
    pub const ALL: [OptionLabel; 3] = [OptionLabel::A, OptionLabel::B, OptionLabel::C];

    #[must_use]
    pub fn position(self) -> usize {
        match self {
            OptionLabel::A => 0,
            OptionLabel::B => 1,
            OptionLabel::C => 2,
        }
    }
}

impl fmt::Display for OptionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OptionLabel::A => "A",
            OptionLabel::B => "B",
            OptionLabel::C => "C",
        };
        f.write_str(label)
    }
}

//
// ─── QUESTION ─────────────────────────────────────────────────────────────────
//

/// One row of the question table: a prompt and exactly three options.
///
/// Immutable once built; the quiz flow only ever reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    prompt: String,
    options: [String; 3],
}

impl Question {
    /// Build a question, trimming the prompt and options.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the prompt or any option is blank.
    pub fn new(
        prompt: impl Into<String>,
        options: [impl Into<String>; 3],
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into().trim().to_string();
        if prompt.is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }

        let [a, b, c] = options;
        let options = [
            a.into().trim().to_string(),
            b.into().trim().to_string(),
            c.into().trim().to_string(),
        ];
        for label in OptionLabel::ALL {
            if options[label.position()].is_empty() {
                return Err(QuestionError::EmptyOption(label));
            }
        }

        Ok(Self { prompt, options })
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[String; 3] {
        &self.options
    }

    #[must_use]
    pub fn option(&self, label: OptionLabel) -> &str {
        &self.options[label.position()]
    }

    /// Returns true if `choice` is exactly one of this question's options.
    #[must_use]
    pub fn has_option(&self, choice: &str) -> bool {
        self.options.iter().any(|option| option == choice)
    }
}

//
// ─── QUESTION SOURCE ──────────────────────────────────────────────────────────
//

/// Read-only, positionally indexed table of questions.
pub trait QuestionSource {
    /// Number of rows in the source.
    fn len(&self) -> usize;

    /// The question at `index`, or `None` when out of range.
    fn question(&self, index: QuestionIndex) -> Option<&Question>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory question table loaded once from storage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    #[must_use]
    pub fn from_questions(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    pub fn iter(&self) -> impl Iterator<Item = (QuestionIndex, &Question)> {
        self.questions
            .iter()
            .enumerate()
            .map(|(position, question)| (QuestionIndex::new(position), question))
    }
}

impl QuestionSource for QuestionBank {
    fn len(&self) -> usize {
        self.questions.len()
    }

    fn question(&self, index: QuestionIndex) -> Option<&Question> {
        self.questions.get(index.value())
    }
}
