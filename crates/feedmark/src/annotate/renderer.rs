//! Sequential highlight rewriting.

use std::fmt;

use regex::{Captures, RegexBuilder};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{FeedmarkError, Result};
use crate::feedback::AnnotationPair;

use super::sanitize::sanitize;

/// CSS class carried by every highlight wrapper.
pub const HIGHLIGHT_CLASS: &str = "highlight-button";

/// Attribute holding the improvement text on a highlight wrapper.
pub const HIGHLIGHT_ATTRIBUTE: &str = "data-y-content";

/// Sanitized, annotated markup ready for live rendering.
///
/// The only way to build one is through [`sanitize`], including when it is
/// deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct AnnotatedContent(String);

impl AnnotatedContent {
    /// Sanitize arbitrary markup into annotated content.
    pub fn from_markup(markup: &str) -> Self {
        Self(sanitize(markup))
    }

    /// The sanitized markup.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the sanitized markup.
    pub fn into_string(self) -> String {
        self.0
    }

    /// Number of highlight wrappers in the content.
    pub fn highlight_count(&self) -> usize {
        self.0
            .matches(&format!("class=\"{}\"", HIGHLIGHT_CLASS))
            .count()
    }
}

impl From<String> for AnnotatedContent {
    fn from(markup: String) -> Self {
        Self::from_markup(&markup)
    }
}

impl From<AnnotatedContent> for String {
    fn from(content: AnnotatedContent) -> Self {
        content.0
    }
}

impl fmt::Display for AnnotatedContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Wraps literal occurrences of original text in highlight spans.
#[derive(Debug, Clone, Copy, Default)]
pub struct Annotator;

impl Annotator {
    /// Create a new annotator.
    pub fn new() -> Self {
        Self
    }

    /// Apply every pair to `base` and sanitize the result.
    pub fn annotate(&self, base: &str, pairs: &[AnnotationPair]) -> Result<AnnotatedContent> {
        let markup = self.rewrite(base, pairs)?;
        Ok(AnnotatedContent::from_markup(&markup))
    }

    /// Apply every pair to `base` without sanitizing.
    ///
    /// Pairs are applied in order and each one rewrites the output of the
    /// previous one. No occurrence is skipped for already being inside a
    /// wrapper, so an original that appears in earlier wrapper markup or
    /// metadata is wrapped again.
    pub fn rewrite(&self, base: &str, pairs: &[AnnotationPair]) -> Result<String> {
        if let Some(index) = pairs.iter().position(|pair| !pair.is_valid()) {
            return Err(FeedmarkError::InvalidPair { index });
        }

        let rewritten = pairs
            .iter()
            .try_fold(base.to_string(), |content, pair| highlight(&content, pair))?;

        debug!(pairs = pairs.len(), "applied annotation pairs");
        Ok(rewritten)
    }
}

/// Wrap every case-insensitive literal match of `pair.original` in `content`.
///
/// Case is compared with Unicode simple case folding, so `key` also matches
/// `\u{212A}ey` (Kelvin sign) and `set` matches `\u{17F}et` (long s).
fn highlight(content: &str, pair: &AnnotationPair) -> Result<String> {
    let matcher = RegexBuilder::new(&regex::escape(&pair.original))
        .case_insensitive(true)
        .build()?;

    let open = format!(
        "<span class=\"{}\" {}=\"{}\">",
        HIGHLIGHT_CLASS,
        HIGHLIGHT_ATTRIBUTE,
        escape_attribute(&pair.improvement)
    );

    let mut replaced = 0usize;
    let rewritten = matcher.replace_all(content, |caps: &Captures| {
        replaced += 1;
        format!("{}{}</span>", open, &caps[0])
    });

    trace!(original = %pair.original, replaced, "highlighted original text");
    Ok(rewritten.into_owned())
}

/// Escape text for a double-quoted attribute value.
fn escape_attribute(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(original: &str, improvement: &str) -> AnnotationPair {
        AnnotationPair::new(original, improvement)
    }

    #[test]
    fn test_no_pairs_returns_base() {
        let annotated = Annotator::new().annotate("The cat sat.", &[]).unwrap();
        assert_eq!(annotated.as_str(), "The cat sat.");
        assert_eq!(annotated.highlight_count(), 0);
    }

    #[test]
    fn test_single_pair_wraps_match() {
        let annotated = Annotator::new()
            .annotate("The cat sat.", &[pair("cat", "feline")])
            .unwrap();

        assert_eq!(
            annotated.as_str(),
            "The <span class=\"highlight-button\" data-y-content=\"feline\">cat</span> sat."
        );
        assert_eq!(annotated.highlight_count(), 1);
    }

    #[test]
    fn test_match_is_case_insensitive_and_preserves_text() {
        let out = Annotator::new()
            .rewrite("Cat and CAT", &[pair("cat", "x")])
            .unwrap();
        assert_eq!(
            out,
            "<span class=\"highlight-button\" data-y-content=\"x\">Cat</span> and \
             <span class=\"highlight-button\" data-y-content=\"x\">CAT</span>"
        );
    }

    #[test]
    fn test_case_folding_is_unicode_simple_folding() {
        let rewriter = Annotator::new();

        // Non-ASCII letters fold with their case partners.
        let accented = rewriter.rewrite("CAFÉ", &[pair("café", "x")]).unwrap();
        assert!(accented.contains(">CAFÉ</span>"));

        // Kelvin sign and long s fold to k and s.
        let kelvin = rewriter.rewrite("\u{212A}ey", &[pair("key", "x")]).unwrap();
        assert!(kelvin.contains(">\u{212A}ey</span>"));
        let long_s = rewriter.rewrite("\u{17F}et", &[pair("set", "x")]).unwrap();
        assert!(long_s.contains(">\u{17F}et</span>"));
    }

    #[test]
    fn test_every_occurrence_is_wrapped() {
        let annotated = Annotator::new()
            .annotate("to be or not to be", &[pair("be", "exist")])
            .unwrap();
        assert_eq!(annotated.highlight_count(), 2);
    }

    #[test]
    fn test_unmatched_original_is_noop() {
        let out = Annotator::new()
            .rewrite("nothing here", &[pair("absent", "x")])
            .unwrap();
        assert_eq!(out, "nothing here");
    }

    #[test]
    fn test_metacharacters_match_literally() {
        let out = Annotator::new()
            .rewrite("a.b*c and axbbbc", &[pair("a.b*c", "fix")])
            .unwrap();
        assert_eq!(
            out,
            "<span class=\"highlight-button\" data-y-content=\"fix\">a.b*c</span> and axbbbc"
        );
    }

    #[test]
    fn test_full_reserved_set_matches_literally() {
        let original = r".*+?^${}()|[]\";
        let base = format!("before {} after", original);
        let out = Annotator::new().rewrite(&base, &[pair(original, "y")]).unwrap();
        assert!(out.contains(&format!(">{}</span>", original)));
        assert!(out.starts_with("before <span"));
    }

    #[test]
    fn test_empty_original_rejected_before_any_rewrite() {
        let err = Annotator::new()
            .rewrite("abc", &[pair("a", "x"), pair("", "y")])
            .unwrap_err();
        assert!(matches!(err, FeedmarkError::InvalidPair { index: 1 }));
    }

    #[test]
    fn test_repeated_original_cascades_into_markup() {
        let out = Annotator::new()
            .rewrite("a a", &[pair("a", "x"), pair("a", "y")])
            .unwrap();

        // Each first-pass wrapper holds six `a`s: sp(a)n, cl(a)ss, d(a)t(a),
        // the visible text and the closing sp(a)n. The second pass wraps all
        // of them.
        assert_eq!(out.matches("data-y-content=\"x\"").count(), 0);
        assert_eq!(out.matches("data-y-content=\"y\"").count(), 12);
        assert!(out.matches("<span").count() > 2);
    }

    #[test]
    fn test_later_pair_matches_inside_earlier_metadata() {
        let out = Annotator::new()
            .rewrite("my cat", &[pair("cat", "the feline"), pair("feline", "kitty")])
            .unwrap();

        assert!(out.contains(
            "data-y-content=\"the <span class=\"highlight-button\" data-y-content=\"kitty\">feline</span>\""
        ));
    }

    #[test]
    fn test_improvement_is_not_a_replacement_template() {
        let out = Annotator::new()
            .rewrite("cost", &[pair("cost", "$0 or $& or ${1}")])
            .unwrap();
        assert!(out.contains("data-y-content=\"$0 or $&amp; or ${1}\""));
    }

    #[test]
    fn test_improvement_quotes_are_escaped() {
        let annotated = Annotator::new()
            .annotate("word", &[pair("word", "say \"term\" <b>")])
            .unwrap();
        assert!(annotated
            .as_str()
            .contains("data-y-content=\"say &quot;term&quot; &lt;b&gt;\""));
    }

    #[test]
    fn test_script_in_base_is_removed() {
        let annotated = Annotator::new()
            .annotate("hi<script>alert('cat')</script> cat", &[pair("cat", "x")])
            .unwrap();
        assert!(!annotated.as_str().contains("script"));
        assert!(!annotated.as_str().contains("alert"));
        assert_eq!(annotated.highlight_count(), 1);
    }

    #[test]
    fn test_deserialize_sanitizes() {
        let content: AnnotatedContent =
            serde_json::from_str("\"<b onclick=\\\"x()\\\">hi</b>\"").unwrap();
        assert_eq!(content.as_str(), "<b>hi</b>");
    }
}
