//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Feedmark: inline feedback annotation for student writing
#[derive(Parser)]
#[command(name = "feedmark")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Feedback generator to use
    #[arg(long, global = true, default_value = "mock")]
    pub llm: LlmProviderChoice,

    /// Model to use (provider-specific, e.g., "gpt-4o", "llama3.2")
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Get feedback on one piece of writing and annotate it
    Review {
        /// Path to the student's writing
        #[arg(short, long)]
        writing: PathBuf,

        /// Path to the marking criteria
        #[arg(short, long)]
        criteria: PathBuf,

        /// Path to the learning outcome
        #[arg(long)]
        outcome: Option<PathBuf>,

        /// Output path for the HTML report (default: <writing>.feedback.html)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Get feedback for every row of an uploaded CSV/TSV file
    Batch {
        /// Path to the uploaded file (owner id, question, response)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Path to the marking criteria
        #[arg(short, long)]
        criteria: PathBuf,

        /// Output path for the HTML report (default: <file>.feedback.html)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the outcome as JSON instead of writing a report
        #[arg(long)]
        json: bool,
    },

    /// Annotate writing with a saved feedback document, without a generator
    Annotate {
        /// Path to the feedback document
        #[arg(short, long)]
        feedback: PathBuf,

        /// Path to the student's writing
        #[arg(short, long)]
        writing: PathBuf,

        /// Output path for the HTML report (default: print annotated markup)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Feedback generator choice
#[derive(Clone, Debug, Default)]
pub enum LlmProviderChoice {
    /// Anthropic Claude API (requires ANTHROPIC_API_KEY)
    Anthropic,
    /// OpenAI GPT API (requires OPENAI_API_KEY)
    OpenAI,
    /// Ollama local models (requires Ollama running)
    Ollama,
    /// Mock generator for testing
    #[default]
    Mock,
}

impl std::str::FromStr for LlmProviderChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "anthropic" | "claude" => Ok(LlmProviderChoice::Anthropic),
            "openai" | "gpt" => Ok(LlmProviderChoice::OpenAI),
            "ollama" | "local" => Ok(LlmProviderChoice::Ollama),
            "mock" | "test" => Ok(LlmProviderChoice::Mock),
            _ => Err(format!(
                "Unknown provider: {}. Use: anthropic, openai, ollama, or mock.",
                s
            )),
        }
    }
}

impl std::fmt::Display for LlmProviderChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LlmProviderChoice::Anthropic => write!(f, "anthropic"),
            LlmProviderChoice::OpenAI => write!(f, "openai"),
            LlmProviderChoice::Ollama => write!(f, "ollama"),
            LlmProviderChoice::Mock => write!(f, "mock"),
        }
    }
}
