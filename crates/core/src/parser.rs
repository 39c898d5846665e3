//! Best-effort extraction of typed fields from the evaluator's free-text reply.
//!
//! The evaluator is asked to answer in a fixed layout:
//!
//! ```text
//! RESULT:[CORRECT]
//! あなたの回答: B
//! 正解: B
//! 解説: ...
//! ```
//!
//! Models drift from that layout, so the parser is a tolerant line scanner:
//! unknown lines are ignored, every field has a default, and nothing here
//! can fail.

use serde::{Deserialize, Serialize};

use crate::model::{
    CORRECT_ANSWER_UNAVAILABLE, CORRECT_MARKER, EXPLANATION_UNAVAILABLE, EvaluationField,
    EvaluationResult,
};

const RESULT_PREFIX: &str = "RESULT:";
const EXPLANATION_SEPARATOR: &str = "\n";

/// How a labelled line is recognised.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LabelMatch {
    /// Split at the first colon; the key only has to contain the label.
    #[default]
    FirstColon,
    /// The line must start with the label immediately followed by a colon.
    Prefix,
}

/// What to show when the explanation is missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExplanationFallback {
    /// A fixed "not available" sentence.
    Sentinel,
    /// The whole raw response.
    #[default]
    RawResponse,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserOptions {
    pub label_match: LabelMatch,
    pub explanation_fallback: ExplanationFallback,
}

/// Parsed result plus the fields that had to be defaulted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseReport {
    pub result: EvaluationResult,
    pub missing: Vec<EvaluationField>,
}

impl ParseReport {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Capture {
    Labels,
    Explanation,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResponseParser {
    options: ParserOptions,
}

impl ResponseParser {
    #[must_use]
    pub fn new(options: ParserOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub fn options(&self) -> ParserOptions {
        self.options
    }

    /// Parse `raw`, logging a warning for every defaulted field.
    ///
    /// `fallback_user_answer` is the option the user actually picked.
    #[must_use]
    pub fn parse(&self, raw: &str, fallback_user_answer: &str) -> EvaluationResult {
        let report = self.parse_with_report(raw, fallback_user_answer);
        for field in &report.missing {
            log::warn!("evaluator response has no {field}, using default; response: {raw:?}");
        }
        report.result
    }

    /// Same as [`ResponseParser::parse`] without logging.
    #[must_use]
    pub fn parse_with_report(&self, raw: &str, fallback_user_answer: &str) -> ParseReport {
        let is_correct = raw.contains(CORRECT_MARKER);

        let mut user_answer: Option<String> = None;
        let mut correct_answer: Option<String> = None;
        let mut explanation: Vec<&str> = Vec::new();
        let mut capture = Capture::Labels;

        for line in raw.lines().map(str::trim).filter(|line| !line.is_empty()) {
            if line.starts_with(RESULT_PREFIX) {
                continue;
            }
            if capture == Capture::Explanation {
                explanation.push(line);
                continue;
            }

            let Some((field, value)) = self.match_label(line) else {
                continue;
            };
            match field {
                EvaluationField::UserAnswer => user_answer = non_empty(value),
                EvaluationField::CorrectAnswer => correct_answer = non_empty(value),
                EvaluationField::Explanation => {
                    if !value.is_empty() {
                        explanation.push(value);
                    }
                    capture = Capture::Explanation;
                }
            }
        }

        let mut missing = Vec::new();

        let user_answer = user_answer.unwrap_or_else(|| {
            missing.push(EvaluationField::UserAnswer);
            fallback_user_answer.to_string()
        });
        let correct_answer = correct_answer.unwrap_or_else(|| {
            missing.push(EvaluationField::CorrectAnswer);
            CORRECT_ANSWER_UNAVAILABLE.to_string()
        });
        let explanation = if explanation.is_empty() {
            missing.push(EvaluationField::Explanation);
            self.explanation_fallback(raw)
        } else {
            explanation.join(EXPLANATION_SEPARATOR)
        };

        ParseReport {
            result: EvaluationResult {
                is_correct,
                user_answer,
                correct_answer,
                explanation,
            },
            missing,
        }
    }

    fn match_label<'a>(&self, line: &'a str) -> Option<(EvaluationField, &'a str)> {
        match self.options.label_match {
            LabelMatch::FirstColon => {
                let (key, value) = line.split_once([':', '：'])?;
                let field = [
                    EvaluationField::UserAnswer,
                    EvaluationField::CorrectAnswer,
                    EvaluationField::Explanation,
                ]
                .into_iter()
                .find(|field| key.contains(field.label()))?;
                Some((field, value.trim()))
            }
            LabelMatch::Prefix => [
                EvaluationField::UserAnswer,
                EvaluationField::CorrectAnswer,
                EvaluationField::Explanation,
            ]
            .into_iter()
            .find_map(|field| {
                let rest = line.strip_prefix(field.label())?.trim_start();
                let value = rest.strip_prefix(':').or_else(|| rest.strip_prefix('：'))?;
                Some((field, value.trim()))
            }),
        }
    }

    fn explanation_fallback(&self, raw: &str) -> String {
        let raw = raw.trim();
        match self.options.explanation_fallback {
            ExplanationFallback::RawResponse if !raw.is_empty() => raw.to_string(),
            ExplanationFallback::RawResponse | ExplanationFallback::Sentinel => {
                EXPLANATION_UNAVAILABLE.to_string()
            }
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentinel_parser(label_match: LabelMatch) -> ResponseParser {
        ResponseParser::new(ParserOptions {
            label_match,
            explanation_fallback: ExplanationFallback::Sentinel,
        })
    }

    #[test]
    fn parses_well_formed_response() {
        let raw = "RESULT:[CORRECT]\nあなたの回答: B\n正解: B\n解説: Because reasons";
        let parsed = ResponseParser::default().parse(raw, "A");
        assert_eq!(
            parsed,
            EvaluationResult {
                is_correct: true,
                user_answer: "B".into(),
                correct_answer: "B".into(),
                explanation: "Because reasons".into(),
            }
        );
    }

    #[test]
    fn unrelated_text_falls_back_to_defaults() {
        let raw = "some unrelated text";

        let with_raw = ResponseParser::default().parse_with_report(raw, "A");
        assert!(!with_raw.result.is_correct);
        assert_eq!(with_raw.result.user_answer, "A");
        assert_eq!(with_raw.result.correct_answer, CORRECT_ANSWER_UNAVAILABLE);
        assert_eq!(with_raw.result.explanation, raw);
        assert_eq!(
            with_raw.missing,
            vec![
                EvaluationField::UserAnswer,
                EvaluationField::CorrectAnswer,
                EvaluationField::Explanation,
            ]
        );

        let with_sentinel = sentinel_parser(LabelMatch::FirstColon).parse(raw, "A");
        assert_eq!(with_sentinel.explanation, EXPLANATION_UNAVAILABLE);
    }

    #[test]
    fn parsing_is_repeatable() {
        let parser = ResponseParser::default();
        let raw = "RESULT:[INCORRECT]\n正解: C\n解説: line one\nline two";
        assert_eq!(parser.parse(raw, "A"), parser.parse(raw, "A"));
    }

    #[test]
    fn incorrect_marker_is_not_correct() {
        let raw = "RESULT:[INCORRECT]\nあなたの回答: A\n正解: C\n解説: no";
        let parsed = ResponseParser::default().parse(raw, "A");
        assert!(!parsed.is_correct);
        assert_eq!(parsed.correct_answer, "C");
    }

    #[test]
    fn explanation_collects_following_lines() {
        let raw = "RESULT:[INCORRECT]\nあなたの回答: A\n正解: C\n解説: first\n\nsecond: with colon\nRESULT:[INCORRECT]\n正解: ignored";
        let parsed = ResponseParser::default().parse(raw, "A");
        assert_eq!(parsed.explanation, "first\nsecond: with colon\n正解: ignored");
        assert_eq!(parsed.correct_answer, "C");
    }

    #[test]
    fn explanation_may_start_on_next_line() {
        let raw = "RESULT:[CORRECT]\n解説:\n  indented body  ";
        let parsed = ResponseParser::default().parse(raw, "B");
        assert_eq!(parsed.explanation, "indented body");
    }

    #[test]
    fn first_colon_accepts_decorated_keys_and_full_width_colon() {
        let raw = "RESULT:[CORRECT]\r\n**あなたの回答**：B\r\n- 正解: B\r\n解説：ok";
        let report = ResponseParser::default().parse_with_report(raw, "A");
        assert!(report.is_complete());
        assert_eq!(report.result.user_answer, "B");
        assert_eq!(report.result.correct_answer, "B");
        assert_eq!(report.result.explanation, "ok");
    }

    #[test]
    fn prefix_mode_requires_bare_labels() {
        let raw = "RESULT:[CORRECT]\n**あなたの回答**: B\n正解：B\n解説: ok";
        let report = sentinel_parser(LabelMatch::Prefix).parse_with_report(raw, "A");
        assert_eq!(report.result.user_answer, "A");
        assert_eq!(report.result.correct_answer, "B");
        assert_eq!(report.result.explanation, "ok");
        assert_eq!(report.missing, vec![EvaluationField::UserAnswer]);

        let spaced = "RESULT:[CORRECT]\nあなたの回答 :B\n正解 ： B\n解説 : 入国カードは機内で記入";
        let report = sentinel_parser(LabelMatch::Prefix).parse_with_report(spaced, "A");
        assert_eq!(report.result.user_answer, "B");
        assert_eq!(report.result.correct_answer, "B");
        assert_eq!(report.result.explanation, "入国カードは機内で記入");
        assert!(report.missing.is_empty());
    }

    #[test]
    fn empty_label_values_count_as_missing() {
        let raw = "あなたの回答:\n正解:   \n";
        let report = sentinel_parser(LabelMatch::FirstColon).parse_with_report(raw, "C");
        assert_eq!(report.result.user_answer, "C");
        assert_eq!(report.result.correct_answer, CORRECT_ANSWER_UNAVAILABLE);
        assert_eq!(report.result.explanation, EXPLANATION_UNAVAILABLE);
    }

    #[test]
    fn empty_response_uses_sentinel_even_in_raw_mode() {
        let parsed = ResponseParser::default().parse("   ", "A");
        assert_eq!(parsed.explanation, EXPLANATION_UNAVAILABLE);
        assert!(!parsed.is_correct);
    }
}
