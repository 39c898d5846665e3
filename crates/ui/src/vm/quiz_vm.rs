use quiz_core::model::{OptionLabel, Question};
use services::QuizRun;

use super::feedback_vm::{FeedbackDisplay, feedback_or_raw};

pub const GRADING_MESSAGE: &str = "GPT-4が回答を評価しています...";
pub const SELECT_PROMPT: &str = "回答を選択してください";
pub const MISSING_SELECTION_WARNING: &str = "回答を選択してください。";
pub const SUBMIT_LABEL: &str = "回答を確定する";
pub const NEXT_LABEL: &str = "次の問題へ ➡️";
pub const RESULTS_LABEL: &str = "結果を見る🎖️";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub label: OptionLabel,
    pub text: String,
}

/// What the user can do once the question on screen is graded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizNext {
    NextQuestion,
    ShowResults,
}

impl QuizNext {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            QuizNext::NextQuestion => NEXT_LABEL,
            QuizNext::ShowResults => RESULTS_LABEL,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct QuizScreenVm {
    pub heading: String,
    pub prompt: String,
    pub options: Vec<OptionVm>,
    pub progress_label: String,
    /// Progress bar fill in `0.0..=100.0`.
    pub progress_percent: f32,
    pub answered: bool,
    /// The option the user picked, once graded.
    pub chosen_option: Option<String>,
    pub feedback: Option<FeedbackDisplay>,
    pub next: Option<QuizNext>,
}

impl QuizScreenVm {
    #[must_use]
    pub fn is_chosen(&self, option: &str) -> bool {
        self.chosen_option.as_deref() == Some(option)
    }
}

#[must_use]
pub fn map_quiz_screen(run: &QuizRun, question: &Question) -> QuizScreenVm {
    let progress = run.progress();
    let answered = run.awaiting_next();
    // After grading, the counter already includes the question on screen.
    let number = if answered {
        progress.answered.max(1)
    } else {
        progress.current_number()
    };

    let outcome = run
        .last_outcome()
        .filter(|outcome| outcome.question_index == run.current_index());
    let feedback = outcome.map(|outcome| feedback_or_raw(&outcome.evaluation, &outcome.raw_response));
    let chosen_option = outcome.map(|outcome| outcome.chosen_option.clone());

    let next = answered.then(|| {
        if progress.is_complete {
            QuizNext::ShowResults
        } else {
            QuizNext::NextQuestion
        }
    });

    QuizScreenVm {
        heading: format!("問題 {number} / {}", progress.total),
        prompt: question.prompt().to_string(),
        options: OptionLabel::ALL
            .into_iter()
            .map(|label| OptionVm {
                label,
                text: question.option(label).to_string(),
            })
            .collect(),
        progress_label: format!("{} / {}", progress.answered, progress.total),
        progress_percent: progress.ratio() * 100.0,
        answered,
        chosen_option,
        feedback,
        next,
    }
}
