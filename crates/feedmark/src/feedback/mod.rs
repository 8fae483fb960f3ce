//! Feedback document parsing.
//!
//! A feedback document is the raw text returned by the feedback generator for
//! one submission. It mixes a free-form narrative with tagged blocks:
//!
//! ```text
//! **Original Text:** "the cat sat" <endoforiginal>
//! **Improvement:** Use a more vivid verb. <endofimprovement>
//! ```
//!
//! Originals and improvements are scanned independently and paired by
//! position. The narrative left after removing both block kinds is the
//! cleaned feedback shown to the reader.

mod pair;
mod parser;

pub use pair::AnnotationPair;
pub use parser::{FeedbackParser, ParsedFeedback};
