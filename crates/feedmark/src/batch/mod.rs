//! Batch feedback: uploaded rows and the bulk generator response.
//!
//! A batch upload is a delimited file whose rows are
//! `owner id, question, response`, preceded by a header row. The generator
//! answers with one bulk document; [`BatchDistributor`] splits it on blank
//! lines and hands the i-th paragraph to the i-th row.

mod distributor;
mod rows;

pub use distributor::{BatchDistributor, BatchRecord, SEGMENT_DELIMITER};
pub use rows::{RowReader, RowReaderConfig, TabularRow, Upload, UploadMetadata};
