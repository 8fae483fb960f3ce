//! Inline annotation of student writing.
//!
//! [`Annotator`] folds a sequence of [`AnnotationPair`](crate::AnnotationPair)s
//! over the student's text, wrapping every case-insensitive literal match of
//! each original in a highlight span that carries the improvement in a
//! `data-y-content` attribute. Each pair rewrites the output of the previous
//! one, so later pairs can match inside markup inserted by earlier pairs.
//!
//! The rewritten markup is only handed out after it has passed through
//! [`sanitize`], which restricts it to the highlight wrapper and a small set
//! of benign formatting elements.

mod renderer;
mod sanitize;

pub use renderer::{AnnotatedContent, Annotator, HIGHLIGHT_ATTRIBUTE, HIGHLIGHT_CLASS};
pub use sanitize::{sanitize, ALLOWED_TAGS};
