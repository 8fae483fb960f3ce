//! CLI command implementations.

pub mod annotate;
pub mod batch;
pub mod review;

use std::path::{Path, PathBuf};

use feedmark::{
    AnthropicGenerator, Feedmark, GeneratorConfig, MockGenerator, OllamaGenerator,
    OpenAIGenerator,
};
use tracing::debug;

use crate::cli::LlmProviderChoice;

/// Generator selection from the global flags.
pub struct GeneratorChoice {
    pub provider: LlmProviderChoice,
    pub model: Option<String>,
}

impl GeneratorChoice {
    /// Build an engine wired to the chosen generator.
    pub fn engine(&self) -> Result<Feedmark, Box<dyn std::error::Error>> {
        debug!(provider = %self.provider, model = ?self.model, "building feedback engine");
        let feedmark = Feedmark::new();

        let feedmark = match self.provider {
            LlmProviderChoice::Mock => feedmark.with_generator(MockGenerator::new()),
            LlmProviderChoice::Anthropic => feedmark.with_generator(
                AnthropicGenerator::from_env_with_config(self.config("claude-sonnet-4-20250514"))?,
            ),
            LlmProviderChoice::OpenAI => feedmark
                .with_generator(OpenAIGenerator::from_env_with_config(self.config("gpt-4o"))?),
            LlmProviderChoice::Ollama => {
                feedmark.with_generator(OllamaGenerator::with_config(self.config("llama3.2"))?)
            }
        };

        Ok(feedmark)
    }

    fn config(&self, default_model: &str) -> GeneratorConfig {
        let model = self.model.as_deref().unwrap_or(default_model);
        GeneratorConfig::default().with_model(model)
    }
}

/// Read a text input, naming the file when it is missing.
pub fn read_input(path: &Path) -> Result<String, Box<dyn std::error::Error>> {
    if !path.exists() {
        return Err(format!("File not found: {}", path.display()).into());
    }
    Ok(std::fs::read_to_string(path)?)
}

/// `<stem>.feedback.html` next to `input`.
pub fn default_report_path(input: &Path) -> PathBuf {
    let mut p = input.to_path_buf();
    let stem = p.file_stem().unwrap_or_default().to_string_lossy().into_owned();
    p.set_file_name(format!("{}.feedback.html", stem));
    p
}
