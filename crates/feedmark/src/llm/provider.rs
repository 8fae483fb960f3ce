//! Feedback generator trait and request/response types.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Input for feedback on a single piece of writing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SingleRequest {
    /// Learning outcome the writing should demonstrate.
    #[serde(default)]
    pub learning_outcome: String,

    /// Criteria the writing is marked against.
    #[serde(default)]
    pub marking_criteria: String,

    /// The student's writing, as text or markup.
    pub student_writing: String,
}

impl SingleRequest {
    /// Create a request for the given writing.
    pub fn new(student_writing: impl Into<String>) -> Self {
        Self {
            student_writing: student_writing.into(),
            ..Default::default()
        }
    }

    /// Set the learning outcome.
    pub fn with_learning_outcome(mut self, outcome: impl Into<String>) -> Self {
        self.learning_outcome = outcome.into();
        self
    }

    /// Set the marking criteria.
    pub fn with_marking_criteria(mut self, criteria: impl Into<String>) -> Self {
        self.marking_criteria = criteria.into();
        self
    }
}

/// Input for feedback on a whole uploaded file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRequest {
    /// Raw text of the uploaded file, header included.
    pub csv_text: String,

    /// Marking criteria applied to every row.
    pub criteria: String,
}

impl BatchRequest {
    /// Create a batch request.
    pub fn new(csv_text: impl Into<String>, criteria: impl Into<String>) -> Self {
        Self {
            csv_text: csv_text.into(),
            criteria: criteria.into(),
        }
    }
}

/// What the generator sends back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorResponse {
    /// Feedback document (single) or bulk response (batch).
    pub message: String,
}

impl GeneratorResponse {
    /// Wrap a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Configuration for feedback generators.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Model to use (e.g., "claude-sonnet-4-20250514").
    pub model: String,

    /// Maximum tokens in response.
    pub max_tokens: usize,

    /// Temperature for generation (0.0-1.0).
    pub temperature: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            model: "claude-sonnet-4-20250514".to_string(),
            max_tokens: 4096,
            temperature: 0.3,
        }
    }
}

impl GeneratorConfig {
    /// Same configuration with a different model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

/// Trait for feedback generators.
///
/// Implementations must be thread-safe (Send + Sync) so one generator can be
/// shared by every review. A call either returns the whole response or an
/// error; there is no partial output and no retry.
pub trait FeedbackGenerator: Send + Sync {
    /// Produce a feedback document for one piece of writing.
    ///
    /// The document tags spans of the writing with `**Original Text:**` /
    /// `**Improvement:**` markers.
    fn generate_single(&self, request: &SingleRequest) -> Result<GeneratorResponse>;

    /// Produce one bulk response covering every data row of an upload, one
    /// paragraph per row, paragraphs separated by a blank line.
    fn generate_batch(&self, request: &BatchRequest) -> Result<GeneratorResponse>;

    /// Get the configuration for this generator.
    fn config(&self) -> &GeneratorConfig;

    /// Get the name of this generator (for logging/debugging).
    fn name(&self) -> &str;
}
