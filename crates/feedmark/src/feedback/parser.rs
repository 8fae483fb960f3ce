//! Marker extraction and narrative cleaning.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::pair::AnnotationPair;

// =============================================================================
// MARKER GRAMMARS
// =============================================================================
// The same patterns drive extraction and deletion, so only well-formed
// markers are ever removed from the narrative.

/// `**Original Text:** "<span>" <endoforiginal>`, label matched case-insensitively.
static ORIGINAL_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\*\*Original Text:\*\*\s*"([^"]+)"\s*<endoforiginal>"#).unwrap()
});

/// `**Improvement:** <free text> <endofimprovement>`, non-greedy across lines.
static IMPROVEMENT_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\*\*Improvement:\*\*\s*(.*?)<endofimprovement>").unwrap()
});

/// Result of parsing one feedback document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedFeedback {
    /// Pairs in marker order, truncated to the shorter marker list.
    pub pairs: Vec<AnnotationPair>,

    /// Narrative with every well-formed marker removed, trimmed.
    pub cleaned: String,
}

impl ParsedFeedback {
    /// Whether the document contained any usable pairs.
    pub fn has_pairs(&self) -> bool {
        !self.pairs.is_empty()
    }
}

/// Parses feedback documents produced by the generator.
///
/// Parsing never fails. Missing or malformed markers only reduce the number
/// of pairs found and remain verbatim in the cleaned narrative.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeedbackParser;

impl FeedbackParser {
    /// Create a new parser.
    pub fn new() -> Self {
        Self
    }

    /// Parse a document into pairs and a cleaned narrative.
    pub fn parse(&self, document: &str) -> ParsedFeedback {
        let originals = Self::originals(document);
        let improvements = Self::improvements(document);

        debug!(
            originals = originals.len(),
            improvements = improvements.len(),
            "scanned feedback markers"
        );

        if originals.len() != improvements.len() {
            debug!(
                dropped = originals.len().abs_diff(improvements.len()),
                "unbalanced marker counts, dropping trailing entries"
            );
        }

        // zip stops at the shorter list
        let pairs = originals
            .into_iter()
            .zip(improvements)
            .map(|(original, improvement)| AnnotationPair::new(original, improvement))
            .collect();

        ParsedFeedback {
            pairs,
            cleaned: Self::clean(document),
        }
    }

    /// All quoted original spans, in document order.
    pub fn originals(document: &str) -> Vec<String> {
        ORIGINAL_MARKER
            .captures_iter(document)
            .map(|caps| caps[1].to_string())
            .collect()
    }

    /// All improvement spans, in document order, each trimmed.
    pub fn improvements(document: &str) -> Vec<String> {
        IMPROVEMENT_MARKER
            .captures_iter(document)
            .map(|caps| caps[1].trim().to_string())
            .collect()
    }

    /// Remove every well-formed marker and trim the remainder.
    pub fn clean(document: &str) -> String {
        let without_originals = ORIGINAL_MARKER.replace_all(document, "");
        let without_improvements = IMPROVEMENT_MARKER.replace_all(&without_originals, "");
        without_improvements.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(original: &str, improvement: &str) -> String {
        format!(
            "**Original Text:** \"{}\" <endoforiginal>\n**Improvement:** {} <endofimprovement>\n",
            original, improvement
        )
    }

    #[test]
    fn test_parse_well_formed_blocks_in_order() {
        let doc = format!(
            "Overall a solid answer.\n\n{}{}{}Keep practising.",
            block("teh", "Spelling: the"),
            block("alot", "Write 'a lot'"),
            block("very very", "Avoid repetition")
        );

        let parsed = FeedbackParser::new().parse(&doc);

        assert_eq!(
            parsed.pairs,
            vec![
                AnnotationPair::new("teh", "Spelling: the"),
                AnnotationPair::new("alot", "Write 'a lot'"),
                AnnotationPair::new("very very", "Avoid repetition"),
            ]
        );
        assert!(!parsed.cleaned.contains("**Original Text:**"));
        assert!(!parsed.cleaned.contains("**Improvement:**"));
        assert!(!parsed.cleaned.contains("<endoforiginal>"));
        assert!(!parsed.cleaned.contains("<endofimprovement>"));
        assert!(parsed.cleaned.starts_with("Overall a solid answer."));
        assert!(parsed.cleaned.ends_with("Keep practising."));
    }

    #[test]
    fn test_unbalanced_counts_truncate_to_shorter() {
        let doc = "**Original Text:** \"one\" <endoforiginal>\n\
                   **Original Text:** \"two\" <endoforiginal>\n\
                   **Original Text:** \"three\" <endoforiginal>\n\
                   **Improvement:** first <endofimprovement>\n\
                   **Improvement:** second <endofimprovement>";

        let parsed = FeedbackParser::new().parse(doc);

        assert_eq!(parsed.pairs.len(), 2);
        assert_eq!(parsed.pairs[0], AnnotationPair::new("one", "first"));
        assert_eq!(parsed.pairs[1], AnnotationPair::new("two", "second"));
    }

    #[test]
    fn test_pairing_is_positional_not_proximal() {
        // Both improvements come before both originals.
        let doc = "**Improvement:** A <endofimprovement>\n\
                   **Improvement:** B <endofimprovement>\n\
                   **Original Text:** \"x\" <endoforiginal>\n\
                   **Original Text:** \"y\" <endoforiginal>";

        let parsed = FeedbackParser::new().parse(doc);

        assert_eq!(parsed.pairs[0], AnnotationPair::new("x", "A"));
        assert_eq!(parsed.pairs[1], AnnotationPair::new("y", "B"));
    }

    #[test]
    fn test_no_markers_returns_trimmed_input() {
        let parsed = FeedbackParser::new().parse("  \n Just a narrative.\n\n ");
        assert!(parsed.pairs.is_empty());
        assert!(!parsed.has_pairs());
        assert_eq!(parsed.cleaned, "Just a narrative.");
    }

    #[test]
    fn test_original_label_is_case_insensitive() {
        let originals = FeedbackParser::originals("**ORIGINAL TEXT:** \"abc\" <ENDOFORIGINAL>");
        assert_eq!(originals, vec!["abc"]);
    }

    #[test]
    fn test_improvement_label_is_case_sensitive() {
        let improvements = FeedbackParser::improvements("**improvement:** abc <endofimprovement>");
        assert!(improvements.is_empty());
    }

    #[test]
    fn test_improvement_spans_lines_and_is_trimmed() {
        let doc = "**Improvement:**\n  Line one.\n  Line two.\n<endofimprovement>";
        assert_eq!(
            FeedbackParser::improvements(doc),
            vec!["Line one.\n  Line two."]
        );
    }

    #[test]
    fn test_improvement_is_non_greedy() {
        let doc = "**Improvement:** a <endofimprovement> middle **Improvement:** b <endofimprovement>";
        assert_eq!(FeedbackParser::improvements(doc), vec!["a", "b"]);
        assert_eq!(FeedbackParser::clean(doc), "middle");
    }

    #[test]
    fn test_empty_quotes_are_not_an_original() {
        let doc = "**Original Text:** \"\" <endoforiginal>";
        assert!(FeedbackParser::originals(doc).is_empty());
        assert_eq!(FeedbackParser::clean(doc), doc);
    }

    #[test]
    fn test_missing_terminator_leaves_marker_in_narrative() {
        let doc = "Intro\n**Original Text:** \"abc\"\n**Improvement:** better <endofimprovement>";
        let parsed = FeedbackParser::new().parse(doc);

        // Improvement still parsed, but there is no original to pair with.
        assert_eq!(FeedbackParser::improvements(doc), vec!["better"]);
        assert!(parsed.pairs.is_empty());
        assert_eq!(parsed.cleaned, "Intro\n**Original Text:** \"abc\"");
    }

    #[test]
    fn test_empty_improvement_is_kept() {
        let doc = "**Original Text:** \"abc\" <endoforiginal>**Improvement:**<endofimprovement>";
        let parsed = FeedbackParser::new().parse(doc);
        assert_eq!(parsed.pairs, vec![AnnotationPair::new("abc", "")]);
        assert_eq!(parsed.cleaned, "");
    }
}
