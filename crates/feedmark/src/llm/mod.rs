//! Feedback generator integration.
//!
//! A [`FeedbackGenerator`] turns a submission (or a whole upload) into the raw
//! text that the [`feedback`](crate::feedback) and [`batch`](crate::batch)
//! modules parse.
//!
//! # Supported Providers
//!
//! - **Anthropic** - Claude models via API (requires `ANTHROPIC_API_KEY`)
//! - **OpenAI** - GPT models via API (requires `OPENAI_API_KEY`)
//! - **Ollama** - Local models, no API key needed (honours `OLLAMA_HOST`)
//! - **Mock** - Deterministic responses for tests and offline use
//!
//! # Example
//!
//! ```no_run
//! use feedmark::{Feedmark, OllamaGenerator};
//!
//! let feedmark = Feedmark::new().with_generator(OllamaGenerator::new().unwrap());
//! ```

mod anthropic;
mod mock;
mod ollama;
mod openai;
mod prompts;
mod provider;
mod transport;

pub use anthropic::AnthropicGenerator;
pub use mock::MockGenerator;
pub use ollama::OllamaGenerator;
pub use openai::OpenAIGenerator;
pub use provider::{
    BatchRequest, FeedbackGenerator, GeneratorConfig, GeneratorResponse, SingleRequest,
};
