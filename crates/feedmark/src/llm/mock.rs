//! Mock generator for testing.

use crate::batch::RowReader;
use crate::error::{FeedmarkError, Result};

use super::provider::{
    BatchRequest, FeedbackGenerator, GeneratorConfig, GeneratorResponse, SingleRequest,
};

/// Longest passage the mock quotes back as an original.
const MAX_QUOTED_WORDS: usize = 4;

/// Generator that returns predictable responses for testing.
///
/// By default it derives feedback from the request: the first words of each
/// sentence become originals, and each data row of a batch gets one
/// paragraph. Canned responses or a forced failure can be configured.
pub struct MockGenerator {
    config: GeneratorConfig,
    single_response: Option<String>,
    batch_response: Option<String>,
    failure: Option<String>,
}

impl MockGenerator {
    /// Create a new mock generator.
    pub fn new() -> Self {
        Self {
            config: GeneratorConfig::default().with_model("mock"),
            single_response: None,
            batch_response: None,
            failure: None,
        }
    }

    /// Always answer single requests with `message`.
    pub fn with_single_response(mut self, message: impl Into<String>) -> Self {
        self.single_response = Some(message.into());
        self
    }

    /// Always answer batch requests with `message`.
    pub fn with_batch_response(mut self, message: impl Into<String>) -> Self {
        self.batch_response = Some(message.into());
        self
    }

    /// Fail every request as a transport error would.
    pub fn failing(mut self, reason: impl Into<String>) -> Self {
        self.failure = Some(reason.into());
        self
    }

    fn check_failure(&self) -> Result<()> {
        match &self.failure {
            Some(reason) => Err(FeedmarkError::Generator(reason.clone())),
            None => Ok(()),
        }
    }
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedbackGenerator for MockGenerator {
    fn generate_single(&self, request: &SingleRequest) -> Result<GeneratorResponse> {
        self.check_failure()?;
        if let Some(ref message) = self.single_response {
            return Ok(GeneratorResponse::new(message.clone()));
        }

        let mut message = String::from("The writing addresses the task. See the notes below.\n\n");
        for passage in quotable_passages(&request.student_writing) {
            message.push_str(&format!(
                "**Original Text:** \"{}\" <endoforiginal>\n\
                 **Improvement:** Consider rephrasing \"{}\" more precisely. <endofimprovement>\n\n",
                passage, passage
            ));
        }
        message.push_str("Overall: keep going.");

        Ok(GeneratorResponse::new(message))
    }

    fn generate_batch(&self, request: &BatchRequest) -> Result<GeneratorResponse> {
        self.check_failure()?;
        if let Some(ref message) = self.batch_response {
            return Ok(GeneratorResponse::new(message.clone()));
        }

        let rows = RowReader::new()
            .read_str(&request.csv_text)
            .map_err(|e| FeedmarkError::Generator(format!("mock could not read upload: {}", e)))?;

        let paragraphs: Vec<String> = rows
            .iter()
            .map(|row| {
                format!(
                    "Student {} answered \"{}\" with {} words.",
                    row.owner_id,
                    row.question,
                    row.response.split_whitespace().count()
                )
            })
            .collect();

        Ok(GeneratorResponse::new(paragraphs.join("\n\n")))
    }

    fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Leading words of each sentence, skipping anything that cannot be quoted.
fn quotable_passages(writing: &str) -> Vec<String> {
    writing
        .split(['.', '!', '?', '\n'])
        .filter(|sentence| !sentence.contains(['"', '<', '>']))
        .map(|sentence| {
            sentence
                .split_whitespace()
                .take(MAX_QUOTED_WORDS)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|passage| !passage.is_empty())
        .collect()
}
