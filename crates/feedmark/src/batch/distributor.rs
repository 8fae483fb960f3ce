//! Positional fan-out of a bulk response across uploaded rows.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::rows::TabularRow;

/// Separator between per-row segments in a bulk response.
pub const SEGMENT_DELIMITER: &str = "\n\n";

/// A row together with the feedback segment assigned to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchRecord {
    #[serde(flatten)]
    pub row: TabularRow,

    /// `None` when the bulk response ran out of segments before this row,
    /// `Some("")` when the segment exists but is empty.
    pub feedback: Option<String>,
}

impl BatchRecord {
    /// Owner of the underlying row.
    pub fn owner_id(&self) -> u64 {
        self.row.owner_id
    }

    /// Whether a feedback segment was assigned.
    pub fn has_feedback(&self) -> bool {
        self.feedback.is_some()
    }
}

/// Splits bulk responses and assigns segments to rows by position.
///
/// No reconciliation by question text or owner is attempted: the i-th
/// segment always belongs to the i-th row.
pub struct BatchDistributor;

impl BatchDistributor {
    /// Split a bulk response on blank lines. Segments are returned verbatim.
    pub fn segments(bulk: &str) -> Vec<&str> {
        bulk.split(SEGMENT_DELIMITER).collect()
    }

    /// Assign the i-th segment to the i-th row.
    ///
    /// Rows past the last segment get no feedback; segments past the last
    /// row are discarded.
    pub fn distribute(bulk: &str, rows: &[TabularRow]) -> Vec<BatchRecord> {
        let segments = Self::segments(bulk);

        if segments.len() != rows.len() {
            debug!(
                segments = segments.len(),
                rows = rows.len(),
                "segment count does not match row count"
            );
        }

        let mut segments = segments.into_iter();
        rows.iter()
            .map(|row| BatchRecord {
                row: row.clone(),
                feedback: segments.next().map(str::to_string),
            })
            .collect()
    }

    /// Group records by owner, keeping first-seen owner order and row order.
    pub fn group_by_owner(records: Vec<BatchRecord>) -> IndexMap<u64, Vec<BatchRecord>> {
        let mut groups: IndexMap<u64, Vec<BatchRecord>> = IndexMap::new();
        for record in records {
            groups.entry(record.owner_id()).or_default().push(record);
        }
        groups
    }

    /// Distinct questions in first-seen order.
    pub fn questions(rows: &[TabularRow]) -> Vec<String> {
        rows.iter()
            .map(|row| row.question.clone())
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect()
    }
}
