//! Feedmark: inline feedback annotation for student writing.
//!
//! A feedback generator returns a free-form document in which specific
//! passages of the student's writing are tagged with suggested improvements.
//! Feedmark extracts those (original, improvement) pairs, strips the markers
//! from the narrative, and rewrites the student's writing so each quoted
//! passage becomes a highlighted span carrying its improvement. For bulk
//! uploads, one combined response is split and handed out to the uploaded
//! rows by position.
//!
//! # Core Principles
//!
//! - **Positional**: pairs and batch segments are matched by order, never by content
//! - **Total parsing**: malformed markers reduce output, they never fail a parse
//! - **Sanitized output**: annotated markup passes an allow-list before it is shown
//!
//! # Example
//!
//! ```
//! use feedmark::Feedmark;
//!
//! let document = "Nice start.\n\
//!     **Original Text:** \"cat\" <endoforiginal>\n\
//!     **Improvement:** Try \"feline\". <endofimprovement>";
//!
//! let outcome = Feedmark::new().review_offline(document, "The cat sat.").unwrap();
//!
//! assert_eq!(outcome.feedback, "Nice start.");
//! assert_eq!(outcome.annotated.highlight_count(), 1);
//! ```

pub mod annotate;
pub mod batch;
pub mod error;
pub mod feedback;
pub mod llm;
pub mod report;
pub mod role;

mod feedmark;

pub use crate::feedmark::{BatchOutcome, Feedmark, FeedmarkConfig, ReviewOutcome};
pub use annotate::{sanitize, AnnotatedContent, Annotator};
pub use batch::{
    BatchDistributor, BatchRecord, RowReader, RowReaderConfig, TabularRow, Upload, UploadMetadata,
};
pub use error::{FeedmarkError, Result, FEEDBACK_UNAVAILABLE};
pub use feedback::{AnnotationPair, FeedbackParser, ParsedFeedback};
pub use llm::{
    AnthropicGenerator, BatchRequest, FeedbackGenerator, GeneratorConfig, GeneratorResponse,
    MockGenerator, OllamaGenerator, OpenAIGenerator, SingleRequest,
};
pub use role::{Role, RoleResolver};
