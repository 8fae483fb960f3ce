//! OpenAI chat completions generator.

use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use serde::Deserialize;
use serde_json::json;

use crate::error::{FeedmarkError, Result};

use super::prompts;
use super::provider::{
    BatchRequest, FeedbackGenerator, GeneratorConfig, GeneratorResponse, SingleRequest,
};
use super::transport::{api_key_from_env, Transport};

const COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";
const API_KEY_VAR: &str = "OPENAI_API_KEY";
const DEFAULT_MODEL: &str = "gpt-4o";

/// Generator backed by GPT models.
pub struct OpenAIGenerator {
    transport: Transport,
    config: GeneratorConfig,
}

impl OpenAIGenerator {
    /// Create a generator with the given API key and `gpt-4o`.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(api_key, GeneratorConfig::default().with_model(DEFAULT_MODEL))
    }

    /// Create a generator with the given API key and configuration.
    pub fn with_config(api_key: impl Into<String>, config: GeneratorConfig) -> Result<Self> {
        let bearer = format!("Bearer {}", api_key.into());
        let transport =
            Transport::new("openai", Duration::from_secs(60))?.with_header(AUTHORIZATION, &bearer)?;

        Ok(Self { transport, config })
    }

    /// Create a generator keyed from `OPENAI_API_KEY`.
    pub fn from_env() -> Result<Self> {
        Self::from_env_with_config(GeneratorConfig::default().with_model(DEFAULT_MODEL))
    }

    /// Create a generator keyed from `OPENAI_API_KEY` with custom configuration.
    pub fn from_env_with_config(config: GeneratorConfig) -> Result<Self> {
        Self::with_config(api_key_from_env(API_KEY_VAR)?, config)
    }

    fn complete(&self, user_prompt: &str) -> Result<GeneratorResponse> {
        let body = json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "messages": prompts::chat_messages(user_prompt),
        });

        let reply: CompletionReply = self.transport.post(COMPLETIONS_URL, &body)?;
        reply.first_text().map(GeneratorResponse::new)
    }
}

impl FeedbackGenerator for OpenAIGenerator {
    fn generate_single(&self, request: &SingleRequest) -> Result<GeneratorResponse> {
        self.complete(&prompts::single_prompt(request))
    }

    fn generate_batch(&self, request: &BatchRequest) -> Result<GeneratorResponse> {
        self.complete(&prompts::batch_prompt(request))
    }

    fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    fn name(&self) -> &str {
        "openai"
    }
}

#[derive(Debug, Deserialize)]
struct CompletionReply {
    choices: Vec<Choice>,
}

impl CompletionReply {
    fn first_text(self) -> Result<String> {
        self.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| FeedmarkError::Generator("openai reply had no choices".to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_model() {
        let generator = OpenAIGenerator::new("test-key").unwrap();
        assert_eq!(generator.config().model, DEFAULT_MODEL);
        assert_eq!(generator.name(), "openai");
    }

    #[test]
    fn test_first_choice_text() {
        let reply: CompletionReply = serde_json::from_str(
            r#"{"choices": [
                {"message": {"role": "assistant", "content": "Nice."}},
                {"message": {"role": "assistant", "content": "Ignored."}}
            ]}"#,
        )
        .unwrap();
        assert_eq!(reply.first_text().unwrap(), "Nice.");
    }

    #[test]
    fn test_empty_choices_is_generator_error() {
        let reply: CompletionReply = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(matches!(reply.first_text(), Err(FeedmarkError::Generator(_))));
    }
}
