use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

use crate::model::{EvaluationResult, PersonaId, QuestionIndex, SessionId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionStateError {
    #[error("at least one persona must be selected")]
    NoPersonaSelected,

    #[error("max questions must be at least 1")]
    ZeroQuestions,

    #[error("quiz is not complete: {answered} of {total} answered")]
    NotComplete { answered: u32, total: u32 },
}

//
// ─── ANSWER RECORD ─────────────────────────────────────────────────────────────
//

/// Scored answer to one question. Written once, never changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    question_index: QuestionIndex,
    question: String,
    user_answer: String,
    is_correct: bool,
    correct_answer: String,
    explanation: String,
    raw_response: String,
    answered_at: DateTime<Utc>,
}

impl AnswerRecord {
    /// `chosen_option` is the option the user picked, not the evaluator's echo of it.
    #[must_use]
    pub fn new(
        question_index: QuestionIndex,
        question: impl Into<String>,
        chosen_option: impl Into<String>,
        evaluation: &EvaluationResult,
        raw_response: impl Into<String>,
        answered_at: DateTime<Utc>,
    ) -> Self {
        Self {
            question_index,
            question: question.into(),
            user_answer: chosen_option.into(),
            is_correct: evaluation.is_correct,
            correct_answer: evaluation.correct_answer.clone(),
            explanation: evaluation.explanation.clone(),
            raw_response: raw_response.into(),
            answered_at,
        }
    }

    #[must_use]
    pub fn question_index(&self) -> QuestionIndex {
        self.question_index
    }

    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    #[must_use]
    pub fn user_answer(&self) -> &str {
        &self.user_answer
    }

    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.is_correct
    }

    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    #[must_use]
    pub fn raw_response(&self) -> &str {
        &self.raw_response
    }

    #[must_use]
    pub fn answered_at(&self) -> DateTime<Utc> {
        self.answered_at
    }
}

//
// ─── PROGRESS & RESULT ─────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuizPhase {
    InProgress,
    Complete,
}

/// Aggregated view of quiz progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizProgress {
    pub answered: u32,
    pub total: u32,
    pub is_complete: bool,
}

impl QuizProgress {
    /// One-based number of the question being worked on, capped at `total`.
    #[must_use]
    pub fn current_number(&self) -> u32 {
        self.answered.saturating_add(1).min(self.total)
    }

    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.total.saturating_sub(self.answered)
    }

    /// Fraction answered in `0.0..=1.0`.
    #[must_use]
    pub fn ratio(&self) -> f32 {
        if self.total == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let ratio = self.answered as f32 / self.total as f32;
        ratio.clamp(0.0, 1.0)
    }
}

/// Read-only snapshot handed to the result screen when a quiz completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizResult {
    pub session_id: SessionId,
    pub nickname: Option<String>,
    pub total_questions: u32,
    pub correct_count: u32,
    /// Ordered by question index.
    pub answers_history: Vec<AnswerRecord>,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

impl QuizResult {
    /// Score as a whole percentage of `total_questions`.
    #[must_use]
    pub fn percent_correct(&self) -> u32 {
        if self.total_questions == 0 {
            return 0;
        }
        self.correct_count.saturating_mul(100) / self.total_questions
    }
}

//
// ─── SESSION STATE ─────────────────────────────────────────────────────────────
//

/// Progress of one user's quiz.
///
/// `total_attempted` always equals the number of answered questions; both only
/// change together in [`SessionState::record_answer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    id: SessionId,
    nickname: Option<String>,
    max_questions: u32,
    answered_questions: HashSet<QuestionIndex>,
    correct_answers: BTreeMap<QuestionIndex, bool>,
    answers_history: BTreeMap<QuestionIndex, AnswerRecord>,
    total_attempted: u32,
    current_question_index: QuestionIndex,
    selected_roles: Vec<PersonaId>,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl SessionState {
    /// Create a fresh session with all counters at zero.
    ///
    /// # Errors
    ///
    /// Returns `SessionStateError::NoPersonaSelected` if `selected_roles` is empty,
    /// or `SessionStateError::ZeroQuestions` if `max_questions` is 0.
    pub fn new(
        max_questions: u32,
        selected_roles: Vec<PersonaId>,
        start_index: QuestionIndex,
        started_at: DateTime<Utc>,
    ) -> Result<Self, SessionStateError> {
        if max_questions == 0 {
            return Err(SessionStateError::ZeroQuestions);
        }
        if selected_roles.is_empty() {
            return Err(SessionStateError::NoPersonaSelected);
        }

        Ok(Self {
            id: SessionId::new_random(),
            nickname: None,
            max_questions,
            answered_questions: HashSet::new(),
            correct_answers: BTreeMap::new(),
            answers_history: BTreeMap::new(),
            total_attempted: 0,
            current_question_index: start_index,
            selected_roles,
            started_at,
            completed_at: None,
        })
    }

    #[must_use]
    pub fn with_nickname(mut self, nickname: impl Into<String>) -> Self {
        let nickname = nickname.into().trim().to_string();
        self.nickname = (!nickname.is_empty()).then_some(nickname);
        self
    }

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn nickname(&self) -> Option<&str> {
        self.nickname.as_deref()
    }

    /// Nickname for log lines; anonymous sessions log their id.
    #[must_use]
    pub fn log_label(&self) -> String {
        match &self.nickname {
            Some(nickname) => format!("{nickname}#{}", self.id),
            None => format!("#{}", self.id),
        }
    }

    #[must_use]
    pub fn max_questions(&self) -> u32 {
        self.max_questions
    }

    #[must_use]
    pub fn total_attempted(&self) -> u32 {
        self.total_attempted
    }

    #[must_use]
    pub fn answered_questions(&self) -> &HashSet<QuestionIndex> {
        &self.answered_questions
    }

    #[must_use]
    pub fn correct_answers(&self) -> &BTreeMap<QuestionIndex, bool> {
        &self.correct_answers
    }

    #[must_use]
    pub fn answers_history(&self) -> &BTreeMap<QuestionIndex, AnswerRecord> {
        &self.answers_history
    }

    #[must_use]
    pub fn current_question_index(&self) -> QuestionIndex {
        self.current_question_index
    }

    #[must_use]
    pub fn selected_roles(&self) -> &[PersonaId] {
        &self.selected_roles
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn is_answered(&self, index: QuestionIndex) -> bool {
        self.answered_questions.contains(&index)
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.total_attempted >= self.max_questions
    }

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        if self.is_complete() {
            QuizPhase::Complete
        } else {
            QuizPhase::InProgress
        }
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        let count = self.correct_answers.values().filter(|correct| **correct).count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    #[must_use]
    pub fn progress(&self) -> QuizProgress {
        QuizProgress {
            answered: self.total_attempted,
            total: self.max_questions,
            is_complete: self.is_complete(),
        }
    }

    /// Score an answer.
    ///
    /// Returns `false` and leaves every counter untouched when the question was
    /// already scored or the quiz is complete.
    pub fn record_answer(&mut self, record: AnswerRecord) -> bool {
        let index = record.question_index();
        if self.is_answered(index) || self.is_complete() {
            return false;
        }

        let answered_at = record.answered_at();
        self.correct_answers.insert(index, record.is_correct());
        self.answers_history.insert(index, record);
        self.answered_questions.insert(index);
        self.total_attempted = self.total_attempted.saturating_add(1);

        if self.is_complete() {
            self.completed_at = Some(answered_at);
        }
        true
    }

    /// Move the cursor to the next unanswered question after the current one,
    /// wrapping over `source_len`.
    ///
    /// When every question is answered the cursor stays where it is.
    pub fn advance(&mut self, source_len: usize) -> QuestionIndex {
        if source_len == 0 {
            return self.current_question_index;
        }

        let start = self.current_question_index.value() % source_len;
        for step in 1..=source_len {
            let candidate = QuestionIndex::new((start + step) % source_len);
            if !self.is_answered(candidate) {
                self.current_question_index = candidate;
                break;
            }
        }
        self.current_question_index
    }

    /// Keep the cursor in range and off answered questions.
    pub fn skip_answered(&mut self, source_len: usize) -> QuestionIndex {
        if source_len == 0 {
            return self.current_question_index;
        }
        if self.current_question_index.value() >= source_len {
            self.current_question_index =
                QuestionIndex::new(self.current_question_index.value() % source_len);
        }
        if self.is_answered(self.current_question_index) {
            return self.advance(source_len);
        }
        self.current_question_index
    }

    /// Snapshot the finished quiz.
    ///
    /// # Errors
    ///
    /// Returns `SessionStateError::NotComplete` while the quiz is still in progress.
    pub fn finalize(&self) -> Result<QuizResult, SessionStateError> {
        let Some(completed_at) = self.completed_at.filter(|_| self.is_complete()) else {
            return Err(SessionStateError::NotComplete {
                answered: self.total_attempted,
                total: self.max_questions,
            });
        };

        Ok(QuizResult {
            session_id: self.id,
            nickname: self.nickname.clone(),
            total_questions: self.max_questions,
            correct_count: self.correct_count(),
            answers_history: self.answers_history.values().cloned().collect(),
            started_at: self.started_at,
            completed_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    fn roles() -> Vec<PersonaId> {
        vec![PersonaId::new("厳しい先生").unwrap()]
    }

    fn record(index: usize, is_correct: bool) -> AnswerRecord {
        let evaluation = EvaluationResult {
            is_correct,
            user_answer: "A".into(),
            correct_answer: "A".into(),
            explanation: "because".into(),
        };
        AnswerRecord::new(
            QuestionIndex::new(index),
            format!("Q{index}"),
            "A",
            &evaluation,
            "raw",
            fixed_now(),
        )
    }

    fn state(max: u32) -> SessionState {
        SessionState::new(max, roles(), QuestionIndex::new(0), fixed_now()).unwrap()
    }

    #[test]
    fn new_session_requires_persona_and_length() {
        assert_eq!(
            SessionState::new(3, Vec::new(), QuestionIndex::new(0), fixed_now()).unwrap_err(),
            SessionStateError::NoPersonaSelected
        );
        assert_eq!(
            SessionState::new(0, roles(), QuestionIndex::new(0), fixed_now()).unwrap_err(),
            SessionStateError::ZeroQuestions
        );
        let fresh = state(3);
        assert_eq!(fresh.total_attempted(), 0);
        assert_eq!(fresh.phase(), QuizPhase::InProgress);
    }

    #[test]
    fn record_answer_counts_each_question_once() {
        let mut state = state(5);
        assert!(state.record_answer(record(2, true)));
        assert!(!state.record_answer(record(2, false)));

        assert_eq!(state.total_attempted(), 1);
        assert_eq!(state.answered_questions().len(), 1);
        assert_eq!(state.correct_answers().get(&QuestionIndex::new(2)), Some(&true));
        assert!(state.answers_history()[&QuestionIndex::new(2)].is_correct());
    }

    #[test]
    fn completion_is_reached_and_sticks() {
        let mut state = state(2);
        state.record_answer(record(0, true));
        assert!(!state.is_complete());
        state.record_answer(record(1, false));
        assert!(state.is_complete());
        assert!(!state.record_answer(record(2, true)));
        assert!(state.is_complete());
        assert_eq!(state.total_attempted(), 2);
        assert_eq!(state.completed_at(), Some(fixed_now()));
    }

    #[test]
    fn advance_skips_answered_and_wraps() {
        let mut state = state(10);
        state.record_answer(record(1, true));
        state.record_answer(record(2, true));

        assert_eq!(state.advance(4), QuestionIndex::new(3));
        assert_eq!(state.advance(4), QuestionIndex::new(0));
        assert_eq!(state.advance(4), QuestionIndex::new(3));
    }

    #[test]
    fn advance_is_a_no_op_when_everything_is_answered() {
        let mut state = state(10);
        for index in 0..3 {
            state.record_answer(record(index, true));
        }
        assert_eq!(state.advance(3), QuestionIndex::new(0));
        assert_eq!(state.advance(0), QuestionIndex::new(0));
    }

    #[test]
    fn skip_answered_normalizes_out_of_range_cursor() {
        let mut state =
            SessionState::new(5, roles(), QuestionIndex::new(7), fixed_now()).unwrap();
        assert_eq!(state.skip_answered(3), QuestionIndex::new(1));
        state.record_answer(record(1, false));
        assert_eq!(state.skip_answered(3), QuestionIndex::new(2));
    }

    #[test]
    fn finalize_requires_completion() {
        let mut state = state(2).with_nickname(" hanako ");
        assert!(matches!(
            state.finalize(),
            Err(SessionStateError::NotComplete { answered: 0, total: 2 })
        ));

        state.record_answer(record(4, true));
        state.record_answer(record(1, false));
        let result = state.finalize().unwrap();
        assert_eq!(result.total_questions, 2);
        assert_eq!(result.correct_count, 1);
        assert_eq!(result.percent_correct(), 50);
        assert_eq!(result.nickname.as_deref(), Some("hanako"));
        let order: Vec<_> = result
            .answers_history
            .iter()
            .map(AnswerRecord::question_index)
            .collect();
        assert_eq!(order, vec![QuestionIndex::new(1), QuestionIndex::new(4)]);
    }

    #[test]
    fn progress_reports_ratio_and_number() {
        let mut state = state(4);
        state.record_answer(record(0, true));
        let progress = state.progress();
        assert_eq!(progress.current_number(), 2);
        assert_eq!(progress.remaining(), 3);
        assert!((progress.ratio() - 0.25).abs() < f32::EPSILON);
    }
}
