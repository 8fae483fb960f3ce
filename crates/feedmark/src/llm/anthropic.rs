//! Anthropic Messages API generator.

use std::time::Duration;

use reqwest::header::HeaderName;
use serde::Deserialize;
use serde_json::json;

use crate::error::{FeedmarkError, Result};

use super::prompts;
use super::provider::{
    BatchRequest, FeedbackGenerator, GeneratorConfig, GeneratorResponse, SingleRequest,
};
use super::transport::{api_key_from_env, Transport};

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";
const API_KEY_VAR: &str = "ANTHROPIC_API_KEY";

/// Generator backed by Claude models.
pub struct AnthropicGenerator {
    transport: Transport,
    config: GeneratorConfig,
}

impl AnthropicGenerator {
    /// Create a generator with the given API key and default model.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(api_key, GeneratorConfig::default())
    }

    /// Create a generator with the given API key and configuration.
    pub fn with_config(api_key: impl Into<String>, config: GeneratorConfig) -> Result<Self> {
        let transport = Transport::new("anthropic", Duration::from_secs(60))?
            .with_header(HeaderName::from_static("x-api-key"), &api_key.into())?
            .with_header(HeaderName::from_static("anthropic-version"), API_VERSION)?;

        Ok(Self { transport, config })
    }

    /// Create a generator keyed from `ANTHROPIC_API_KEY`.
    pub fn from_env() -> Result<Self> {
        Self::from_env_with_config(GeneratorConfig::default())
    }

    /// Create a generator keyed from `ANTHROPIC_API_KEY` with custom configuration.
    pub fn from_env_with_config(config: GeneratorConfig) -> Result<Self> {
        Self::with_config(api_key_from_env(API_KEY_VAR)?, config)
    }

    fn complete(&self, user_prompt: &str) -> Result<GeneratorResponse> {
        let body = json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "system": prompts::system_prompt(),
            "messages": [{ "role": "user", "content": user_prompt }],
        });

        let reply: MessagesReply = self.transport.post(MESSAGES_URL, &body)?;
        reply.text().map(GeneratorResponse::new)
    }
}

impl FeedbackGenerator for AnthropicGenerator {
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
        "anthropic"
    }
}

#[derive(Debug, Deserialize)]
struct MessagesReply {
    content: Vec<ReplyBlock>,
}

impl MessagesReply {
    /// Text blocks joined in order; non-text blocks are skipped.
    fn text(self) -> Result<String> {
        let text: Vec<String> = self
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .map(|block| block.text)
            .collect();

        if text.is_empty() {
            return Err(FeedmarkError::Generator(
                "anthropic reply had no text blocks".to_string(),
            ));
        }
        Ok(text.concat())
    }
}

#[derive(Debug, Deserialize)]
struct ReplyBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}
