use std::sync::Arc;

use quiz_core::model::{
    AnswerRecord, EvaluationResult, PersonaCatalog, PersonaId, PersonaSelection, Question,
    QuestionIndex, QuestionSource, QuizProgress, QuizResult, QuizSettings, SessionState,
};
use quiz_core::{Clock, ResponseParser};
use rand::Rng;

use crate::error::QuizError;
use crate::evaluator::{
    EvaluationRequest, Evaluator, build_system_instructions, synthetic_failure_response,
};

/// What happened when an answer was submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub question_index: QuestionIndex,
    pub chosen_option: String,
    pub evaluation: EvaluationResult,
    pub raw_response: String,
    /// `false` when the question had already been scored.
    pub recorded: bool,
    /// The evaluator failed and `raw_response` is the synthetic stand-in.
    pub evaluator_failed: bool,
    pub progress: QuizProgress,
}

/// Drives one quiz: question selection, grading, scoring and completion.
///
/// Holds no per-session data; every operation takes the `SessionState` it
/// works on.
#[derive(Clone)]
pub struct QuizController {
    evaluator: Arc<dyn Evaluator>,
    parser: ResponseParser,
    settings: QuizSettings,
    catalog: PersonaCatalog,
    clock: Clock,
}

impl QuizController {
    #[must_use]
    pub fn new(
        evaluator: Arc<dyn Evaluator>,
        settings: QuizSettings,
        catalog: PersonaCatalog,
    ) -> Self {
        Self {
            evaluator,
            parser: ResponseParser::new(settings.parser_options()),
            settings,
            catalog,
            clock: Clock::system(),
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn settings(&self) -> &QuizSettings {
        &self.settings
    }

    #[must_use]
    pub fn catalog(&self) -> &PersonaCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn parser(&self) -> &ResponseParser {
        &self.parser
    }

    /// Create a fresh session over a source of `source_len` questions.
    ///
    /// An empty persona selection falls back to the catalog default. The quiz
    /// length is capped at `source_len` so the quiz can always complete.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::EmptySource` for an empty source,
    /// `QuizError::TooManyPersonas` when the profile allows a single persona,
    /// or `QuizError::Persona` for ids missing from the catalog.
    pub fn start(
        &self,
        nickname: Option<&str>,
        roles: Vec<PersonaId>,
        source_len: usize,
    ) -> Result<SessionState, QuizError> {
        if source_len == 0 {
            return Err(QuizError::EmptySource);
        }
        let roles = self.resolve_roles(roles)?;

        let configured = self.settings.max_questions();
        let available = u32::try_from(source_len).unwrap_or(u32::MAX);
        let max_questions = if configured > available {
            log::warn!(
                "quiz asks for {configured} questions but the source has {available}; capping"
            );
            available
        } else {
            configured
        };

        let start_index = if self.settings.shuffle_start() {
            QuestionIndex::new(rand::rng().random_range(0..source_len))
        } else {
            QuestionIndex::new(0)
        };

        let mut state = SessionState::new(max_questions, roles, start_index, self.clock.now())?;
        if let Some(nickname) = nickname {
            state = state.with_nickname(nickname);
        }

        log::info!(
            "user[{}] started a quiz of {} questions with personas {:?}",
            state.log_label(),
            max_questions,
            state.selected_roles()
        );
        Ok(state)
    }

    fn resolve_roles(&self, roles: Vec<PersonaId>) -> Result<Vec<PersonaId>, QuizError> {
        let mut unique: Vec<PersonaId> = Vec::with_capacity(roles.len());
        for role in roles {
            if !unique.contains(&role) {
                unique.push(role);
            }
        }

        if unique.is_empty() {
            return Ok(vec![self.catalog.default_persona().id.clone()]);
        }
        if self.settings.persona_selection() == PersonaSelection::Single && unique.len() > 1 {
            return Err(QuizError::TooManyPersonas {
                selected: unique.len(),
            });
        }
        for role in &unique {
            self.catalog.instruction(role)?;
        }
        Ok(unique)
    }

    /// The question under the session cursor.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::QuestionOutOfRange` if the cursor is past the source.
    pub fn current_question<'s, S>(
        &self,
        state: &SessionState,
        source: &'s S,
    ) -> Result<&'s Question, QuizError>
    where
        S: QuestionSource + ?Sized,
    {
        let index = state.current_question_index();
        let question = question_at(source, index)?;
        log::info!(
            "user[{}] question shown: row {}, {}",
            state.log_label(),
            index.display_number(),
            question.prompt()
        );
        Ok(question)
    }

    /// Grade `chosen_option` for the question at `question_index` and score it.
    ///
    /// Evaluator failures never surface: they are logged and replaced by the
    /// synthetic failure response. A question already scored is graded again
    /// but leaves every counter untouched (`recorded == false`).
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidSelection` when nothing (or something that is
    /// not an option) was chosen, `QuizError::QuestionOutOfRange` for a bad
    /// index, or `QuizError::Completed` once the quiz is over. None of these
    /// touch `state`.
    pub async fn submit_answer<S>(
        &self,
        state: &mut SessionState,
        source: &S,
        question_index: QuestionIndex,
        chosen_option: Option<&str>,
    ) -> Result<SubmitOutcome, QuizError>
    where
        S: QuestionSource + ?Sized,
    {
        let chosen = chosen_option
            .map(str::trim)
            .filter(|choice| !choice.is_empty())
            .ok_or(QuizError::InvalidSelection)?;
        let question = question_at(source, question_index)?;
        if !question.has_option(chosen) {
            return Err(QuizError::InvalidSelection);
        }
        if state.is_complete() {
            return Err(QuizError::Completed);
        }

        let label = state.log_label();
        let request = EvaluationRequest {
            question: question.clone(),
            user_answer: chosen.to_string(),
            roles: state.selected_roles().to_vec(),
            system_instructions: build_system_instructions(&self.catalog, state.selected_roles()),
        };

        log::info!(
            "user[{label}] evaluation started: {}, answer: {chosen}",
            question.prompt()
        );
        let (raw_response, evaluator_failed) = match self.evaluator.evaluate(&request).await {
            Ok(raw) => {
                log::info!("user[{label}] evaluation finished: {raw:?}");
                (raw, false)
            }
            Err(err) => {
                log::error!("user[{label}] evaluation failed: {err}");
                (synthetic_failure_response(chosen), true)
            }
        };

        let evaluation = self.parser.parse(&raw_response, chosen);
        let attempt_number = state.total_attempted().saturating_add(1);
        let record = AnswerRecord::new(
            question_index,
            question.prompt(),
            chosen,
            &evaluation,
            raw_response.clone(),
            self.clock.now(),
        );
        let recorded = state.record_answer(record);

        if recorded {
            let verdict = if evaluation.is_correct {
                "correct"
            } else {
                "incorrect"
            };
            log::info!("user[{label}] {verdict} on question {attempt_number}, answer: {chosen}");
            if state.is_complete() {
                log::info!(
                    "user[{label}] finished all {} questions, {} correct",
                    state.max_questions(),
                    state.correct_count()
                );
            }
        } else {
            log::debug!(
                "user[{label}] row {} already scored; counters unchanged",
                question_index.display_number()
            );
        }

        Ok(SubmitOutcome {
            question_index,
            chosen_option: chosen.to_string(),
            evaluation,
            raw_response,
            recorded,
            evaluator_failed,
            progress: state.progress(),
        })
    }

    /// Move to the next unanswered question, wrapping around the source.
    pub fn advance<S>(&self, state: &mut SessionState, source: &S) -> QuestionIndex
    where
        S: QuestionSource + ?Sized,
    {
        let from = state.current_question_index();
        let to = state.advance(source.len());
        log::info!(
            "user[{}] next question: row {} -> {}",
            state.log_label(),
            from.display_number(),
            to.display_number()
        );
        to
    }

    /// Skip forward if the cursor sits on an answered or out-of-range row.
    pub fn ensure_unanswered<S>(&self, state: &mut SessionState, source: &S) -> QuestionIndex
    where
        S: QuestionSource + ?Sized,
    {
        state.skip_answered(source.len())
    }

    #[must_use]
    pub fn is_complete(&self, state: &SessionState) -> bool {
        state.is_complete()
    }

    /// Snapshot a completed quiz for the result screen.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NotComplete` while questions remain.
    pub fn finalize(&self, state: &SessionState) -> Result<QuizResult, QuizError> {
        let result = state.finalize()?;
        log::info!(
            "user[{}] result: {}/{} ({}%)",
            state.log_label(),
            result.correct_count,
            result.total_questions,
            result.percent_correct()
        );
        Ok(result)
    }
}

fn question_at<S>(source: &S, index: QuestionIndex) -> Result<&Question, QuizError>
where
    S: QuestionSource + ?Sized,
{
    source
        .question(index)
        .ok_or(QuizError::QuestionOutOfRange {
            index,
            len: source.len(),
        })
}
