//! Standalone HTML reports for review outcomes.
//!
//! Narrative feedback is markdown and is rendered with pulldown-cmark. Raw
//! HTML inside the narrative is shown as text, never interpreted. Annotated
//! writing is already sanitized and is embedded as-is.

use pulldown_cmark::{Event, Options, Parser};

use crate::annotate::{HIGHLIGHT_ATTRIBUTE, HIGHLIGHT_CLASS};
use crate::feedmark::{BatchOutcome, ReviewOutcome};

/// Placeholder shown for a record that received no feedback segment.
pub const NO_FEEDBACK: &str = "No feedback";

/// Render a markdown narrative to an HTML fragment.
pub fn render_narrative_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(markdown, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });

    let mut html = String::new();
    pulldown_cmark::html::push_html(&mut html, parser);
    html
}

/// Full page for a single review: annotated writing beside the narrative.
pub fn review_report_html(outcome: &ReviewOutcome) -> String {
    let mut body = String::new();

    body.push_str("<section class=\"writing\">\n<h2>Your writing</h2>\n<div class=\"annotated\">");
    body.push_str(outcome.annotated.as_str());
    body.push_str("</div>\n</section>\n");

    body.push_str("<section class=\"feedback\">\n<h2>Feedback</h2>\n");
    body.push_str(&render_narrative_html(&outcome.feedback));
    body.push_str("</section>\n");

    page("Feedback", &body, &footer(outcome.generator.as_deref(), outcome))
}

/// Full page for a batch: one table per owner, one row per question.
pub fn batch_report_html(outcome: &BatchOutcome) -> String {
    let mut body = String::new();

    body.push_str(&format!(
        "<p class=\"summary\">{} students, {} questions, {} responses</p>\n",
        outcome.records.len(),
        outcome.questions.len(),
        outcome.record_count()
    ));

    for (owner, records) in &outcome.records {
        body.push_str(&format!("<section class=\"student\">\n<h2>Student {}</h2>\n", owner));
        body.push_str("<table>\n<thead><tr><th>Question</th><th>Response</th><th>Feedback</th></tr></thead>\n<tbody>\n");

        for record in records {
            let feedback = match &record.feedback {
                Some(text) => escape_html(text),
                None => format!("<em class=\"missing\">{}</em>", NO_FEEDBACK),
            };
            body.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                escape_html(&record.row.question),
                escape_html(&record.row.response),
                feedback
            ));
        }

        body.push_str("</tbody>\n</table>\n</section>\n");
    }

    let footer = format!(
        "Generated by {} at {}",
        escape_html(&outcome.generator),
        outcome.generated_at.format("%Y-%m-%d %H:%M UTC")
    );
    page("Batch feedback", &body, &footer)
}

fn footer(generator: Option<&str>, outcome: &ReviewOutcome) -> String {
    let when = outcome.generated_at.format("%Y-%m-%d %H:%M UTC");
    match generator {
        Some(name) => format!("Generated by {} at {}", escape_html(name), when),
        None => format!("Generated at {}", when),
    }
}

fn page(title: &str, body: &str, footer: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
body {{ font-family: system-ui, sans-serif; max-width: 60rem; margin: 2rem auto; line-height: 1.6; color: #1f2937; }}
.annotated {{ white-space: pre-wrap; }}
.{class} {{ background: #fef3c7; border-bottom: 2px solid #f59e0b; cursor: help; position: relative; }}
.{class}:hover::after {{ content: attr({attr}); position: absolute; left: 0; top: 1.6em; z-index: 1; width: 20rem; padding: 0.5rem; background: #111827; color: #f9fafb; border-radius: 4px; white-space: normal; }}
table {{ border-collapse: collapse; width: 100%; }}
th, td {{ border: 1px solid #d1d5db; padding: 0.4rem 0.6rem; text-align: left; vertical-align: top; }}
.missing {{ color: #9ca3af; }}
footer {{ margin-top: 2rem; font-size: 0.85rem; color: #6b7280; }}
</style>
</head>
<body>
<h1>{title}</h1>
{body}<footer>{footer}</footer>
</body>
</html>
"#,
        title = escape_html(title),
        class = HIGHLIGHT_CLASS,
        attr = HIGHLIGHT_ATTRIBUTE,
        body = body,
        footer = footer,
    )
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::{BatchDistributor, TabularRow};
    use crate::Feedmark;
    use chrono::Utc;

    #[test]
    fn test_narrative_markdown() {
        let html = render_narrative_html("**Strong** opening.\n\n- one\n- ~~two~~\n");
        assert!(html.contains("<strong>Strong</strong>"));
        assert!(html.contains("<li>one</li>"));
        assert!(html.contains("<del>two</del>"));
    }

    #[test]
    fn test_narrative_tables() {
        let html = render_narrative_html("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.contains("<table>"));
        assert!(html.contains("<td>1</td>"));
    }

    #[test]
    fn test_narrative_raw_html_is_text() {
        let html = render_narrative_html("Hi <script>alert(1)</script> there\n\n<div onclick=\"x\">block</div>\n");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<div onclick"));
    }

    #[test]
    fn test_review_report_embeds_annotation() {
        let outcome = Feedmark::new()
            .review_offline(
                "Nice.\n**Original Text:** \"cat\" <endoforiginal>\n**Improvement:** feline <endofimprovement>",
                "The cat sat.",
            )
            .unwrap();

        let html = review_report_html(&outcome);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("data-y-content=\"feline\">cat</span>"));
        assert!(html.contains("<p>Nice.</p>"));
        assert!(html.contains("Generated at"));
    }

    #[test]
    fn test_batch_report_placeholder_for_missing_feedback() {
        let rows = vec![
            TabularRow::new(1, "Q1", "a < b"),
            TabularRow::new(1, "Q2", "ok"),
        ];
        let records = BatchDistributor::distribute("Good point.", &rows);
        let outcome = BatchOutcome {
            upload: None,
            questions: BatchDistributor::questions(&rows),
            records: BatchDistributor::group_by_owner(records),
            generator: "mock".to_string(),
            generated_at: Utc::now(),
        };

        let html = batch_report_html(&outcome);
        assert!(html.contains("<h2>Student 1</h2>"));
        assert!(html.contains("a &lt; b"));
        assert!(html.contains("<td>Good point.</td>"));
        assert!(html.contains("<em class=\"missing\">No feedback</em>"));
        assert!(html.contains("1 students, 2 questions, 2 responses"));
    }
}
