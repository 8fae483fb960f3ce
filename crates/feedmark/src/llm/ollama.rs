//! Ollama generator for locally served models.
//!
//! No API key is needed. The server defaults to `localhost:11434` and can be
//! moved with `OLLAMA_HOST`.

use std::time::Duration;

use serde::Deserialize;
use serde_json::json;

use crate::error::{FeedmarkError, Result};

use super::prompts;
use super::provider::{
    BatchRequest, FeedbackGenerator, GeneratorConfig, GeneratorResponse, SingleRequest,
};
use super::transport::Transport;

const DEFAULT_HOST: &str = "http://localhost:11434";
const HOST_VAR: &str = "OLLAMA_HOST";
const DEFAULT_MODEL: &str = "llama3.2";

/// Generator backed by a local Ollama server.
pub struct OllamaGenerator {
    transport: Transport,
    chat_url: String,
    config: GeneratorConfig,
}

impl OllamaGenerator {
    /// Create a generator for `llama3.2` (`ollama pull llama3.2`).
    pub fn new() -> Result<Self> {
        Self::with_model(DEFAULT_MODEL)
    }

    /// Create a generator for a specific pulled model.
    pub fn with_model(model: impl Into<String>) -> Result<Self> {
        Self::with_config(GeneratorConfig::default().with_model(model))
    }

    /// Create a generator with custom configuration.
    pub fn with_config(config: GeneratorConfig) -> Result<Self> {
        let host = std::env::var(HOST_VAR).unwrap_or_else(|_| DEFAULT_HOST.to_string());

        Ok(Self {
            // Local models answer slower than hosted APIs.
            transport: Transport::new("ollama", Duration::from_secs(120))?,
            chat_url: chat_url(&host),
            config,
        })
    }

    fn complete(&self, user_prompt: &str) -> Result<GeneratorResponse> {
        let body = json!({
            "model": self.config.model,
            "stream": false,
            "options": {
                "temperature": self.config.temperature,
                "num_predict": self.config.max_tokens,
            },
            "messages": prompts::chat_messages(user_prompt),
        });

        let reply: ChatReply = self
            .transport
            .post(&self.chat_url, &body)
            .map_err(|e| self.with_hint(e))?;
        Ok(GeneratorResponse::new(reply.message.content))
    }

    /// Point at the usual fix for the two common local failures.
    fn with_hint(&self, err: FeedmarkError) -> FeedmarkError {
        match err {
            FeedmarkError::Generator(msg) if msg.contains("could not connect") => {
                FeedmarkError::Generator(format!("{} (is `ollama serve` running?)", msg))
            }
            FeedmarkError::Generator(msg) if msg.contains("not found") => FeedmarkError::Generator(
                format!("{} (try `ollama pull {}`)", msg, self.config.model),
            ),
            other => other,
        }
    }
}

impl FeedbackGenerator for OllamaGenerator {
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
        "ollama"
    }
}

fn chat_url(host: &str) -> String {
    format!("{}/api/chat", host.trim_end_matches('/'))
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_url_from_host() {
        assert_eq!(chat_url("http://gpu-box:11434/"), "http://gpu-box:11434/api/chat");
        assert_eq!(chat_url(DEFAULT_HOST), "http://localhost:11434/api/chat");
    }

    #[test]
    fn test_parse_chat_reply() {
        let reply: ChatReply = serde_json::from_str(
            r#"{"model": "llama3.2", "message": {"role": "assistant", "content": "Clear."}, "done": true}"#,
        )
        .unwrap();
        assert_eq!(reply.message.content, "Clear.");
    }

    #[test]
    fn test_hints_for_local_failures() {
        let generator = OllamaGenerator::with_model("mistral").unwrap();

        let missing = generator.with_hint(FeedmarkError::Generator(
            "ollama returned 404 Not Found: model \"mistral\" not found".to_string(),
        ));
        assert!(missing.to_string().contains("ollama pull mistral"));

        let down = generator.with_hint(FeedmarkError::Generator(
            "ollama could not connect: refused".to_string(),
        ));
        assert!(down.to_string().contains("ollama serve"));
    }
}
