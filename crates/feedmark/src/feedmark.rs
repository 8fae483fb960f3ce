//! Main Feedmark struct and public API.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::annotate::{AnnotatedContent, Annotator};
use crate::batch::{
    BatchDistributor, BatchRecord, RowReader, RowReaderConfig, TabularRow, UploadMetadata,
};
use crate::error::{FeedmarkError, Result};
use crate::feedback::{AnnotationPair, FeedbackParser};
use crate::llm::{BatchRequest, FeedbackGenerator, SingleRequest};

/// Configuration for Feedmark.
#[derive(Debug, Clone, Default)]
pub struct FeedmarkConfig {
    /// Row reader configuration for batch uploads.
    pub rows: RowReaderConfig,
}

/// Result of reviewing one piece of writing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewOutcome {
    /// Narrative feedback with the pair markers removed.
    pub feedback: String,
    /// Pairs extracted from the feedback document.
    pub pairs: Vec<AnnotationPair>,
    /// The student's writing with highlights applied, sanitized.
    pub annotated: AnnotatedContent,
    /// Name of the generator that produced the feedback.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generator: Option<String>,
    /// When the outcome was produced.
    pub generated_at: DateTime<Utc>,
}

/// Result of reviewing a batch upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchOutcome {
    /// Metadata about the uploaded file, when it came from disk.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload: Option<UploadMetadata>,
    /// Distinct questions in first-seen order.
    pub questions: Vec<String>,
    /// Records grouped by owner, in first-seen owner order.
    pub records: IndexMap<u64, Vec<BatchRecord>>,
    /// Name of the generator that produced the feedback.
    pub generator: String,
    /// When the outcome was produced.
    pub generated_at: DateTime<Utc>,
}

impl BatchOutcome {
    /// Total number of records across all owners.
    pub fn record_count(&self) -> usize {
        self.records.values().map(Vec::len).sum()
    }

    /// Number of records that received no feedback segment.
    pub fn missing_feedback(&self) -> usize {
        self.records
            .values()
            .flatten()
            .filter(|r| !r.has_feedback())
            .count()
    }

    /// Pretty-printed JSON for machine consumers.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// The main review engine.
pub struct Feedmark {
    config: FeedmarkConfig,
    parser: FeedbackParser,
    annotator: Annotator,
    rows: RowReader,
    generator: Option<Arc<dyn FeedbackGenerator>>,
}

impl Feedmark {
    /// Create a new Feedmark instance with default configuration.
    pub fn new() -> Self {
        Self::with_config(FeedmarkConfig::default())
    }

    /// Create a Feedmark instance with custom configuration.
    pub fn with_config(config: FeedmarkConfig) -> Self {
        let rows = RowReader::with_config(config.rows.clone());

        Self {
            config,
            parser: FeedbackParser::new(),
            annotator: Annotator::new(),
            rows,
            generator: None,
        }
    }

    /// Set the feedback generator.
    pub fn with_generator(mut self, generator: impl FeedbackGenerator + 'static) -> Self {
        self.generator = Some(Arc::new(generator));
        self
    }

    /// Set a shared feedback generator.
    pub fn with_shared_generator(mut self, generator: Arc<dyn FeedbackGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &FeedmarkConfig {
        &self.config
    }

    fn generator(&self) -> Result<&dyn FeedbackGenerator> {
        self.generator
            .as_deref()
            .ok_or_else(|| FeedmarkError::Config("No feedback generator configured".to_string()))
    }

    /// Ask the generator for feedback on one piece of writing and annotate it.
    ///
    /// A generator failure is returned as-is; no partial outcome is produced.
    pub fn review(&self, request: &SingleRequest) -> Result<ReviewOutcome> {
        let generator = self.generator()?;

        let response = generator.generate_single(request).inspect_err(|e| {
            warn!(generator = generator.name(), error = %e, "feedback generation failed");
        })?;

        let mut outcome = self.review_offline(&response.message, &request.student_writing)?;
        outcome.generator = Some(generator.name().to_string());
        Ok(outcome)
    }

    /// Parse a feedback document that is already available and annotate
    /// `student_writing` with it.
    pub fn review_offline(&self, document: &str, student_writing: &str) -> Result<ReviewOutcome> {
        let parsed = self.parser.parse(document);
        let annotated = self.annotator.annotate(student_writing, &parsed.pairs)?;

        debug!(
            pairs = parsed.pairs.len(),
            highlights = annotated.highlight_count(),
            "reviewed submission"
        );

        Ok(ReviewOutcome {
            feedback: parsed.cleaned,
            pairs: parsed.pairs,
            annotated,
            generator: None,
            generated_at: Utc::now(),
        })
    }

    /// Ask the generator for feedback on an uploaded file's text.
    pub fn review_batch(&self, csv_text: &str, criteria: &str) -> Result<BatchOutcome> {
        let rows = self.rows.read_str(csv_text)?;
        self.distribute(rows, csv_text, criteria, None)
    }

    /// Read an uploaded file from disk and ask the generator for feedback.
    pub fn review_batch_file(
        &self,
        path: impl AsRef<Path>,
        criteria: &str,
    ) -> Result<BatchOutcome> {
        let upload = self.rows.read_file(path)?;
        self.distribute(upload.rows, &upload.text, criteria, Some(upload.metadata))
    }

    fn distribute(
        &self,
        rows: Vec<TabularRow>,
        csv_text: &str,
        criteria: &str,
        upload: Option<UploadMetadata>,
    ) -> Result<BatchOutcome> {
        if rows.is_empty() {
            return Err(FeedmarkError::EmptyData("Upload has no data rows".to_string()));
        }

        let generator = self.generator()?;
        let response = generator
            .generate_batch(&BatchRequest::new(csv_text, criteria))
            .inspect_err(|e| {
                warn!(generator = generator.name(), error = %e, "batch feedback generation failed");
            })?;

        let questions = BatchDistributor::questions(&rows);
        let records = BatchDistributor::distribute(&response.message, &rows);

        Ok(BatchOutcome {
            upload,
            questions,
            records: BatchDistributor::group_by_owner(records),
            generator: generator.name().to_string(),
            generated_at: Utc::now(),
        })
    }
}

impl Default for Feedmark {
    fn default() -> Self {
        Self::new()
    }
}
