use thiserror::Error;
use url::Url;

pub const DEFAULT_EVALUATOR_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_EVALUATOR_MODEL: &str = "gpt-4";
pub const DEFAULT_EVALUATOR_TEMPERATURE: f32 = 0.5;

/// Connection settings for the grading service.
///
/// A missing API key means grading is disabled; every submission then
/// receives the synthetic failure response.
#[derive(Clone, Debug, PartialEq)]
pub struct EvaluatorSettings {
    api_key: Option<String>,
    model: String,
    base_url: String,
    temperature: f32,
}

#[derive(Clone, Debug, Default)]
pub struct EvaluatorSettingsDraft {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub temperature: Option<f32>,
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EvaluatorSettingsError {
    #[error("invalid base URL")]
    InvalidBaseUrl,
    #[error("temperature must be between 0 and 2, got {0}")]
    InvalidTemperature(f32),
}

impl EvaluatorSettingsDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and normalize the draft.
    ///
    /// # Errors
    ///
    /// Returns `EvaluatorSettingsError` if the base URL is present but invalid,
    /// or the temperature is out of range.
    pub fn validate(self) -> Result<EvaluatorSettings, EvaluatorSettingsError> {
        let api_key = normalize_optional(self.api_key);
        let model = normalize_optional(self.model)
            .unwrap_or_else(|| DEFAULT_EVALUATOR_MODEL.to_string());
        let base_url = normalize_optional(self.base_url)
            .unwrap_or_else(|| DEFAULT_EVALUATOR_BASE_URL.to_string());
        let temperature = self.temperature.unwrap_or(DEFAULT_EVALUATOR_TEMPERATURE);

        if Url::parse(&base_url).is_err() {
            return Err(EvaluatorSettingsError::InvalidBaseUrl);
        }
        if !(0.0..=2.0).contains(&temperature) {
            return Err(EvaluatorSettingsError::InvalidTemperature(temperature));
        }

        Ok(EvaluatorSettings {
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
            temperature,
        })
    }
}

impl EvaluatorSettings {
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }
}

impl Default for EvaluatorSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_EVALUATOR_MODEL.to_string(),
            base_url: DEFAULT_EVALUATOR_BASE_URL.to_string(),
            temperature: DEFAULT_EVALUATOR_TEMPERATURE,
        }
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_key_disables_grading() {
        let settings = EvaluatorSettingsDraft {
            api_key: Some("   ".into()),
            ..EvaluatorSettingsDraft::new()
        }
        .validate()
        .unwrap();
        assert!(!settings.is_enabled());
        assert_eq!(settings.model(), DEFAULT_EVALUATOR_MODEL);
        assert_eq!(settings.base_url(), DEFAULT_EVALUATOR_BASE_URL);
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let settings = EvaluatorSettingsDraft {
            api_key: Some("sk-test".into()),
            base_url: Some("http://localhost:8080/v1/".into()),
            ..EvaluatorSettingsDraft::new()
        }
        .validate()
        .unwrap();
        assert_eq!(settings.base_url(), "http://localhost:8080/v1");
        assert_eq!(settings.api_key(), Some("sk-test"));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let bad_url = EvaluatorSettingsDraft {
            base_url: Some("not a url".into()),
            ..EvaluatorSettingsDraft::new()
        };
        assert!(matches!(
            bad_url.validate(),
            Err(EvaluatorSettingsError::InvalidBaseUrl)
        ));

        let bad_temp = EvaluatorSettingsDraft {
            temperature: Some(3.5),
            ..EvaluatorSettingsDraft::new()
        };
        assert!(matches!(
            bad_temp.validate(),
            Err(EvaluatorSettingsError::InvalidTemperature(_))
        ));
    }
}
