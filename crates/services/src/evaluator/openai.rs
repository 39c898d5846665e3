use std::env;

use async_trait::async_trait;
use quiz_core::model::{EvaluatorSettings, EvaluatorSettingsDraft, EvaluatorSettingsError};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{EvaluationRequest, Evaluator};
use crate::error::EvaluatorError;

/// Resolved connection details for an OpenAI-compatible chat endpoint.
#[derive(Clone, Debug)]
pub struct EvaluatorConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
}

impl EvaluatorConfig {
    /// `None` when the settings carry no API key.
    #[must_use]
    pub fn from_settings(settings: &EvaluatorSettings) -> Option<Self> {
        let api_key = settings.api_key()?.to_string();
        Some(Self {
            base_url: settings.base_url().to_string(),
            api_key,
            model: settings.model().to_string(),
            temperature: settings.temperature(),
        })
    }

    /// Read `QUIZ_AI_API_KEY`, `QUIZ_AI_BASE_URL` and `QUIZ_AI_MODEL`.
    ///
    /// # Errors
    ///
    /// Returns `EvaluatorSettingsError` if `QUIZ_AI_BASE_URL` is not a valid URL.
    pub fn from_env() -> Result<Option<Self>, EvaluatorSettingsError> {
        let settings = settings_from_env()?;
        Ok(Self::from_settings(&settings))
    }
}

/// Evaluator settings from the process environment.
///
/// # Errors
///
/// Returns `EvaluatorSettingsError` if a present value fails validation.
pub fn settings_from_env() -> Result<EvaluatorSettings, EvaluatorSettingsError> {
    EvaluatorSettingsDraft {
        api_key: env::var("QUIZ_AI_API_KEY").ok(),
        base_url: env::var("QUIZ_AI_BASE_URL").ok(),
        model: env::var("QUIZ_AI_MODEL").ok(),
        temperature: None,
    }
    .validate()
}

/// Grades answers through `POST {base_url}/chat/completions`.
#[derive(Clone)]
pub struct OpenAiEvaluator {
    client: Client,
    config: Option<EvaluatorConfig>,
}

impl OpenAiEvaluator {
    #[must_use]
    pub fn new(config: Option<EvaluatorConfig>) -> Self {
        if config.is_none() {
            log::warn!("no evaluator API key configured; every answer will be marked as failed");
        }
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn from_settings(settings: &EvaluatorSettings) -> Self {
        Self::new(EvaluatorConfig::from_settings(settings))
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }
}

#[async_trait]
impl Evaluator for OpenAiEvaluator {
    async fn evaluate(&self, request: &EvaluationRequest) -> Result<String, EvaluatorError> {
        let config = self.config.as_ref().ok_or(EvaluatorError::Disabled)?;

        let url = format!("{}/chat/completions", config.base_url.trim_end_matches('/'));
        let payload = ChatRequest {
            model: config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: request.system_instructions.clone(),
                },
                ChatMessage {
                    role: "user",
                    content: request.grading_prompt(),
                },
            ],
            temperature: config.temperature,
        };

        let response = self
            .client
            .post(url)
            .bearer_auth(&config.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(EvaluatorError::HttpStatus(response.status()));
        }

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(EvaluatorError::EmptyResponse)?;

        Ok(content.trim().to_string())
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{PersonaId, Question};

    fn request() -> EvaluationRequest {
        EvaluationRequest {
            question: Question::new("q", ["a", "b", "c"]).unwrap(),
            user_answer: "a".into(),
            roles: vec![PersonaId::new("お笑い芸人").unwrap()],
            system_instructions: "be funny".into(),
        }
    }

    #[test]
    fn config_requires_api_key() {
        assert!(EvaluatorConfig::from_settings(&EvaluatorSettings::default()).is_none());

        let settings = EvaluatorSettingsDraft {
            api_key: Some("sk-test".into()),
            ..EvaluatorSettingsDraft::new()
        }
        .validate()
        .unwrap();
        let config = EvaluatorConfig::from_settings(&settings).unwrap();
        assert_eq!(config.model, "gpt-4");
        assert!((config.temperature - 0.5).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn disabled_evaluator_reports_disabled() {
        let evaluator = OpenAiEvaluator::new(None);
        assert!(!evaluator.enabled());
        assert!(matches!(
            evaluator.evaluate(&request()).await,
            Err(EvaluatorError::Disabled)
        ));
    }

    #[test]
    fn chat_payload_carries_system_and_user_messages() {
        let req = request();
        let payload = ChatRequest {
            model: "gpt-4".into(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: req.system_instructions.clone(),
                },
                ChatMessage {
                    role: "user",
                    content: req.grading_prompt(),
                },
            ],
            temperature: 0.5,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][0]["content"], "be funny");
        assert_eq!(json["messages"][1]["role"], "user");

        let body: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"RESULT:[CORRECT]"}}]}"#,
        )
        .unwrap();
        assert_eq!(
            body.choices[0].message.content.as_deref(),
            Some("RESULT:[CORRECT]")
        );
    }
}
