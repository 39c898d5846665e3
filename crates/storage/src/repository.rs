use async_trait::async_trait;
use quiz_core::model::{Question, QuestionBank, QuestionError, QuestionIndex};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persisted shape of one question row.
///
/// Column names follow the spreadsheet the questions are authored in:
/// a prompt column and three option columns `A`, `B`, `C`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRecord {
    pub position: QuestionIndex,
    pub prompt: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
}

impl QuestionRecord {
    #[must_use]
    pub fn from_question(position: QuestionIndex, question: &Question) -> Self {
        let [option_a, option_b, option_c] = question.options().clone();
        Self {
            position,
            prompt: question.prompt().to_owned(),
            option_a,
            option_b,
            option_c,
        }
    }

    /// Convert the record back into a domain `Question`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the stored prompt or an option is blank.
    pub fn into_question(self) -> Result<Question, QuestionError> {
        Question::new(self.prompt, [self.option_a, self.option_b, self.option_c])
    }
}

/// Repository contract for the question table.
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// Persist or replace the question at `position`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the question cannot be stored.
    async fn upsert_question(
        &self,
        position: QuestionIndex,
        question: &Question,
    ) -> Result<(), StorageError>;

    /// Replace the whole table with `questions`, positioned in order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the table cannot be rewritten.
    async fn replace_all(&self, questions: &[Question]) -> Result<(), StorageError>;

    /// Fetch the question at `position`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_question(&self, position: QuestionIndex) -> Result<Question, StorageError>;

    /// All questions ordered by position.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on read or mapping failures.
    async fn list_questions(&self) -> Result<Vec<Question>, StorageError>;

    /// Number of stored questions.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on read failures.
    async fn count_questions(&self) -> Result<u32, StorageError>;

    /// Load the table as a positional question bank.
    ///
    /// Gaps in stored positions collapse: the bank is indexed densely from 0.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on read or mapping failures.
    async fn load_bank(&self) -> Result<QuestionBank, StorageError> {
        Ok(QuestionBank::from_questions(self.list_questions().await?))
    }
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    questions: Arc<Mutex<BTreeMap<QuestionIndex, Question>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            questions: Arc::new(Mutex::new(BTreeMap::new())),
        }
    }

    /// Repository pre-filled with `questions` at positions `0..n`.
    #[must_use]
    pub fn with_questions(questions: Vec<Question>) -> Self {
        let map = questions
            .into_iter()
            .enumerate()
            .map(|(position, question)| (QuestionIndex::new(position), question))
            .collect();
        Self {
            questions: Arc::new(Mutex::new(map)),
        }
    }
}

#[async_trait]
impl QuestionRepository for InMemoryRepository {
    async fn upsert_question(
        &self,
        position: QuestionIndex,
        question: &Question,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(position, question.clone());
        Ok(())
    }

    async fn replace_all(&self, questions: &[Question]) -> Result<(), StorageError> {
        let mut guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.clear();
        for (position, question) in questions.iter().enumerate() {
            guard.insert(QuestionIndex::new(position), question.clone());
        }
        Ok(())
    }

    async fn get_question(&self, position: QuestionIndex) -> Result<Question, StorageError> {
        let guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.get(&position).cloned().ok_or(StorageError::NotFound)
    }

    async fn list_questions(&self) -> Result<Vec<Question>, StorageError> {
        let guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.values().cloned().collect())
    }

    async fn count_questions(&self) -> Result<u32, StorageError> {
        let guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        u32::try_from(guard.len()).map_err(|_| StorageError::Serialization("count overflow".into()))
    }
}

/// Question storage behind a trait object for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub questions: Arc<dyn QuestionRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let questions: Arc<dyn QuestionRepository> = Arc::new(InMemoryRepository::new());
        Self { questions }
    }
}
