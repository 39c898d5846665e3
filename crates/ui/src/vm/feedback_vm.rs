//! Display model for one graded answer.
//!
//! Formatting goes through [`render_feedback`]; screens call
//! [`feedback_or_raw`], which falls back to the untouched evaluator text when
//! formatting fails.

use quiz_core::model::{EvaluationField, EvaluationResult};

use thiserror::Error;

use super::markdown_vm::{explanation_markdown, markdown_to_html};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Incorrect,
}

impl Verdict {
    #[must_use]
    pub fn from_correct(is_correct: bool) -> Self {
        if is_correct {
            Self::Correct
        } else {
            Self::Incorrect
        }
    }
}

/// Banner shown right after grading.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerdictBannerVm {
    pub verdict: Verdict,
    pub class: &'static str,
    pub icon: &'static str,
    pub title: &'static str,
    pub badge: Option<&'static str>,
}

#[must_use]
pub fn verdict_banner(verdict: Verdict) -> VerdictBannerVm {
    match verdict {
        Verdict::Correct => VerdictBannerVm {
            verdict,
            class: "verdict verdict-correct",
            icon: "🎉",
            title: "正解です！",
            badge: Some("+1 point"),
        },
        Verdict::Incorrect => VerdictBannerVm {
            verdict,
            class: "verdict verdict-incorrect",
            icon: "💫",
            title: "惜しいですね",
            badge: None,
        },
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedbackVm {
    pub banner: VerdictBannerVm,
    pub user_answer: String,
    pub correct_answer: String,
    pub explanation_html: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FeedbackDisplay {
    Formatted(FeedbackVm),
    /// Formatting failed; show the evaluator's text as-is.
    Raw {
        banner: VerdictBannerVm,
        text: String,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum RenderError {
    #[error("{0} is empty")]
    EmptyField(EvaluationField),
    /// Markup stripped the explanation down to nothing.
    #[error("explanation rendered to empty markup")]
    EmptyMarkup,
}

/// Format a parsed evaluation for display.
///
/// # Errors
///
/// Returns `RenderError` when a field has nothing displayable.
pub fn render_feedback(evaluation: &EvaluationResult) -> Result<FeedbackVm, RenderError> {
    let user_answer = single_line(EvaluationField::UserAnswer, &evaluation.user_answer)?;
    let correct_answer = single_line(EvaluationField::CorrectAnswer, &evaluation.correct_answer)?;

    let markdown = explanation_markdown(&evaluation.explanation);
    if markdown.is_empty() {
        return Err(RenderError::EmptyField(EvaluationField::Explanation));
    }
    let explanation_html = markdown_to_html(&markdown);
    if is_blank_markup(&explanation_html) {
        return Err(RenderError::EmptyMarkup);
    }

    Ok(FeedbackVm {
        banner: verdict_banner(Verdict::from_correct(evaluation.is_correct)),
        user_answer,
        correct_answer,
        explanation_html,
    })
}

/// Formatted feedback, or the raw response when formatting fails.
#[must_use]
pub fn feedback_or_raw(evaluation: &EvaluationResult, raw_response: &str) -> FeedbackDisplay {
    match render_feedback(evaluation) {
        Ok(vm) => FeedbackDisplay::Formatted(vm),
        Err(err) => {
            log::error!("could not format evaluation ({err}); showing raw response");
            FeedbackDisplay::Raw {
                banner: verdict_banner(Verdict::from_correct(evaluation.is_correct)),
                text: raw_response.trim().to_string(),
            }
        }
    }
}

fn single_line(field: EvaluationField, value: &str) -> Result<String, RenderError> {
    let joined = value.split_whitespace().collect::<Vec<_>>().join(" ");
    if joined.is_empty() {
        return Err(RenderError::EmptyField(field));
    }
    Ok(joined)
}

fn is_blank_markup(html: &str) -> bool {
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            c if !in_tag && !c.is_whitespace() => return false,
            _ => {}
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evaluation(explanation: &str) -> EvaluationResult {
        EvaluationResult {
            is_correct: true,
            user_answer: "ESTAの申請".into(),
            correct_answer: " ESTAの\n申請 ".into(),
            explanation: explanation.into(),
        }
    }

    #[test]
    fn formats_correct_answer_with_bonus_badge() {
        let vm = render_feedback(&evaluation("**正解**です。\nよく知っていますね")).unwrap();
        assert_eq!(vm.banner.title, "正解です！");
        assert_eq!(vm.banner.badge, Some("+1 point"));
        assert_eq!(vm.correct_answer, "ESTAの 申請");
        assert!(vm.explanation_html.contains("<strong>正解</strong>"));
        assert_eq!(vm.explanation_html.matches("<p>").count(), 2);
    }

    #[test]
    fn incorrect_banner_has_no_badge() {
        let banner = verdict_banner(Verdict::Incorrect);
        assert_eq!(banner.title, "惜しいですね");
        assert!(banner.badge.is_none());
    }

    #[test]
    fn unrenderable_explanation_falls_back_to_raw_text() {
        let raw = "RESULT:[CORRECT]\n解説: <script>alert(1)</script>";
        let eval = evaluation("<script>alert(1)</script>");
        assert_eq!(render_feedback(&eval), Err(RenderError::EmptyMarkup));

        match feedback_or_raw(&eval, raw) {
            FeedbackDisplay::Raw { banner, text } => {
                assert_eq!(banner.verdict, Verdict::Correct);
                assert_eq!(text, raw);
            }
            FeedbackDisplay::Formatted(_) => panic!("expected raw fallback"),
        }
    }

    #[test]
    fn blank_fields_are_render_errors() {
        let mut eval = evaluation("ok");
        eval.user_answer = "  ".into();
        assert_eq!(
            render_feedback(&eval),
            Err(RenderError::EmptyField(EvaluationField::UserAnswer))
        );
        eval.user_answer = "a".into();
        eval.explanation = "\n \n".into();
        assert_eq!(
            render_feedback(&eval),
            Err(RenderError::EmptyField(EvaluationField::Explanation))
        );
    }

    #[test]
    fn render_errors_describe_the_failed_field() {
        let err = RenderError::EmptyField(EvaluationField::CorrectAnswer);
        assert_eq!(err.to_string(), format!("{} is empty", EvaluationField::CorrectAnswer));
        assert_eq!(
            RenderError::EmptyMarkup.to_string(),
            "explanation rendered to empty markup"
        );
        let boxed: Box<dyn std::error::Error> = Box::new(RenderError::EmptyMarkup);
        assert!(boxed.source().is_none());
    }
}
