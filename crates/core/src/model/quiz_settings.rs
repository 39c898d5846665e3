use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::parser::{ExplanationFallback, LabelMatch, ParserOptions};

/// Number of questions in a quiz unless a profile says otherwise.
pub const DEFAULT_MAX_QUESTIONS: u32 = 15;

/// Quiz length of the extended profile.
pub const EXTENDED_MAX_QUESTIONS: u32 = 20;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizSettingsError {
    #[error("max questions must be at least 1")]
    ZeroQuestions,

    #[error("unknown quiz profile: {0}")]
    UnknownProfile(String),
}

/// How many personas a user may pick for one session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PersonaSelection {
    #[default]
    Single,
    Multiple,
}

/// Named configuration profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuizProfile {
    #[default]
    Standard,
    Extended,
}

impl fmt::Display for QuizProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuizProfile::Standard => f.write_str("standard"),
            QuizProfile::Extended => f.write_str("extended"),
        }
    }
}

impl FromStr for QuizProfile {
    type Err = QuizSettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "extended" => Ok(Self::Extended),
            other => Err(QuizSettingsError::UnknownProfile(other.to_string())),
        }
    }
}

/// Validated quiz configuration shared by every session of a deployment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizSettings {
    max_questions: u32,
    persona_selection: PersonaSelection,
    parser: ParserOptions,
    shuffle_start: bool,
}

#[derive(Clone, Debug, Default)]
pub struct QuizSettingsDraft {
    pub max_questions: Option<u32>,
    pub persona_selection: PersonaSelection,
    pub label_match: LabelMatch,
    pub explanation_fallback: ExplanationFallback,
    pub shuffle_start: bool,
}

impl QuizSettingsDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a named profile.
    #[must_use]
    pub fn from_profile(profile: QuizProfile) -> Self {
        match profile {
            QuizProfile::Standard => Self {
                max_questions: Some(DEFAULT_MAX_QUESTIONS),
                persona_selection: PersonaSelection::Single,
                label_match: LabelMatch::FirstColon,
                explanation_fallback: ExplanationFallback::RawResponse,
                shuffle_start: false,
            },
            QuizProfile::Extended => Self {
                max_questions: Some(EXTENDED_MAX_QUESTIONS),
                persona_selection: PersonaSelection::Multiple,
                label_match: LabelMatch::Prefix,
                explanation_fallback: ExplanationFallback::Sentinel,
                shuffle_start: false,
            },
        }
    }

    /// Validate the draft.
    ///
    /// # Errors
    ///
    /// Returns `QuizSettingsError::ZeroQuestions` if `max_questions` is 0.
    pub fn validate(self) -> Result<QuizSettings, QuizSettingsError> {
        let max_questions = self.max_questions.unwrap_or(DEFAULT_MAX_QUESTIONS);
        if max_questions == 0 {
            return Err(QuizSettingsError::ZeroQuestions);
        }

        Ok(QuizSettings {
            max_questions,
            persona_selection: self.persona_selection,
            parser: ParserOptions {
                label_match: self.label_match,
                explanation_fallback: self.explanation_fallback,
            },
            shuffle_start: self.shuffle_start,
        })
    }
}

impl QuizSettings {
    /// 15 questions, one persona, lenient labels, raw text when the explanation is missing.
    #[must_use]
    pub fn standard() -> Self {
        Self::from_profile(QuizProfile::Standard)
    }

    /// 20 questions, several personas, strict labels, sentinel explanation.
    #[must_use]
    pub fn extended() -> Self {
        Self::from_profile(QuizProfile::Extended)
    }

    #[must_use]
    pub fn from_profile(profile: QuizProfile) -> Self {
        let draft = QuizSettingsDraft::from_profile(profile);
        Self {
            max_questions: draft.max_questions.unwrap_or(DEFAULT_MAX_QUESTIONS),
            persona_selection: draft.persona_selection,
            parser: ParserOptions {
                label_match: draft.label_match,
                explanation_fallback: draft.explanation_fallback,
            },
            shuffle_start: draft.shuffle_start,
        }
    }

    #[must_use]
    pub fn max_questions(&self) -> u32 {
        self.max_questions
    }

    #[must_use]
    pub fn persona_selection(&self) -> PersonaSelection {
        self.persona_selection
    }

    #[must_use]
    pub fn parser_options(&self) -> ParserOptions {
        self.parser
    }

    #[must_use]
    pub fn shuffle_start(&self) -> bool {
        self.shuffle_start
    }
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profiles_differ_in_length_and_parser_strictness() {
        let standard = QuizSettings::standard();
        let extended = QuizSettings::extended();
        assert_eq!(standard.max_questions(), 15);
        assert_eq!(extended.max_questions(), 20);
        assert_eq!(standard.parser_options().label_match, LabelMatch::FirstColon);
        assert_eq!(extended.parser_options().label_match, LabelMatch::Prefix);
        assert_eq!(extended.persona_selection(), PersonaSelection::Multiple);
    }

    #[test]
    fn zero_questions_is_rejected() {
        let draft = QuizSettingsDraft {
            max_questions: Some(0),
            ..QuizSettingsDraft::new()
        };
        assert_eq!(draft.validate().unwrap_err(), QuizSettingsError::ZeroQuestions);
    }

    #[test]
    fn profile_parses_case_insensitively() {
        assert_eq!(" Extended ".parse::<QuizProfile>().unwrap(), QuizProfile::Extended);
        assert!("short".parse::<QuizProfile>().is_err());
    }

    #[test]
    fn draft_override_keeps_profile_parser() {
        let settings = QuizSettingsDraft {
            max_questions: Some(3),
            ..QuizSettingsDraft::from_profile(QuizProfile::Extended)
        }
        .validate()
        .unwrap();
        assert_eq!(settings.max_questions(), 3);
        assert_eq!(
            settings.parser_options().explanation_fallback,
            ExplanationFallback::Sentinel
        );
    }
}
