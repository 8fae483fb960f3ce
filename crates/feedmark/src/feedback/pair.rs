//! Original/improvement pairs.

use serde::{Deserialize, Serialize};

/// One original span of student text and the improvement suggested for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationPair {
    /// Literal text to find in the student's writing. Never empty when
    /// produced by the parser.
    pub original: String,

    /// Suggested improvement. May be empty.
    pub improvement: String,
}

impl AnnotationPair {
    /// Create a new pair.
    pub fn new(original: impl Into<String>, improvement: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            improvement: improvement.into(),
        }
    }

    /// Whether the pair can be used for annotation.
    pub fn is_valid(&self) -> bool {
        !self.original.is_empty()
    }
}
