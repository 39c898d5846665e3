use dioxus::prelude::*;
use services::QuizError;

use crate::vm::MISSING_SELECTION_WARNING;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    NoQuestions,
    NoSelection,
    NotFinished,
    Unknown,
}

impl ViewError {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            ViewError::NoQuestions => "問題が登録されていません。先に問題を読み込んでください。",
            ViewError::NoSelection => MISSING_SELECTION_WARNING,
            ViewError::NotFinished => "まだ全ての問題に回答していません。",
            ViewError::Unknown => "エラーが発生しました。もう一度お試しください。",
        }
    }
}

impl From<QuizError> for ViewError {
    fn from(err: QuizError) -> Self {
        log::warn!("quiz operation failed: {err}");
        match err {
            QuizError::EmptySource => ViewError::NoQuestions,
            QuizError::InvalidSelection => ViewError::NoSelection,
            QuizError::NotComplete { .. } => ViewError::NotFinished,
            _ => ViewError::Unknown,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Error(ViewError),
}

#[must_use]
pub fn view_state_from_resource<T: Clone>(
    resource: &Resource<Result<T, ViewError>>,
) -> ViewState<T> {
    match resource.state().cloned() {
        UseResourceState::Pending => ViewState::Loading,
        UseResourceState::Ready => match resource.value().read().as_ref() {
            Some(Ok(data)) => ViewState::Ready(data.clone()),
            Some(Err(err)) => ViewState::Error(*err),
            None => ViewState::Error(ViewError::Unknown),
        },
        UseResourceState::Paused | UseResourceState::Stopped => ViewState::Idle,
    }
}
