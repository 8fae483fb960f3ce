//! Prompt templates for feedback generation.

use serde_json::{json, Value};

use super::provider::{BatchRequest, SingleRequest};

/// Placeholder used when an optional section was left blank.
const NOT_PROVIDED: &str = "Not provided";

fn or_placeholder(text: &str) -> &str {
    if text.trim().is_empty() {
        NOT_PROVIDED
    } else {
        text
    }
}

/// Build the prompt for feedback on a single piece of writing.
pub fn single_prompt(request: &SingleRequest) -> String {
    format!(
        r#"Give feedback on this student writing.

## Learning Outcome
{}

## Marking Criteria
{}

## Student Writing
{}

## Task
Write a short overall assessment against the learning outcome and marking
criteria. Then, for each specific passage that should be improved, add a
block in exactly this form:

**Original Text:** "<exact passage copied from the student writing>" <endoforiginal>
**Improvement:** <what to change and why> <endofimprovement>

Rules for the blocks:
- Copy the original passage character for character; do not paraphrase it.
- The original passage must not contain double quotes.
- Every Original Text block must be followed by its Improvement block."#,
        or_placeholder(&request.learning_outcome),
        or_placeholder(&request.marking_criteria),
        request.student_writing
    )
}

/// Build the prompt for feedback on a whole uploaded file.
pub fn batch_prompt(request: &BatchRequest) -> String {
    format!(
        r#"Give feedback on every student response in this file.

## Marking Criteria
{}

## File
The first line is a header. Each following line is: student id, question, response.

```
{}
```

## Task
Write exactly one paragraph of feedback per data row, in the same order as
the rows. Separate paragraphs with a single blank line and do not use blank
lines anywhere else. Do not add headings, numbering or any text before the
first paragraph or after the last."#,
        or_placeholder(&request.criteria),
        request.csv_text.trim_end()
    )
}

/// System prompt for all feedback generation.
pub fn system_prompt() -> &'static str {
    r#"You are an experienced teacher helping to mark student work.

Guidelines:
- Be specific, encouraging and honest
- Tie every comment to the marking criteria
- Quote the student's own words when pointing at a problem
- Follow the requested output format exactly; it is parsed by software"#
}

/// System and user turns in the chat-completions message shape.
pub fn chat_messages(user_prompt: &str) -> Value {
    json!([
        { "role": "system", "content": system_prompt() },
        { "role": "user", "content": user_prompt }
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_prompt_includes_inputs_and_markers() {
        let request = SingleRequest::new("Teh cat sat.")
            .with_learning_outcome("Write clearly")
            .with_marking_criteria("Spelling");

        let prompt = single_prompt(&request);

        assert!(prompt.contains("Teh cat sat."));
        assert!(prompt.contains("Write clearly"));
        assert!(prompt.contains("Spelling"));
        assert!(prompt.contains("<endoforiginal>"));
        assert!(prompt.contains("<endofimprovement>"));
    }

    #[test]
    fn test_blank_sections_get_placeholder() {
        let prompt = single_prompt(&SingleRequest::new("text"));
        assert_eq!(prompt.matches(NOT_PROVIDED).count(), 2);
    }

    #[test]
    fn test_batch_prompt_includes_file() {
        let prompt = batch_prompt(&BatchRequest::new("id,q,r\n1,Q,A\n", "Accuracy"));
        assert!(prompt.contains("1,Q,A"));
        assert!(prompt.contains("Accuracy"));
        assert!(prompt.contains("blank line"));
    }

    #[test]
    fn test_chat_messages_shape() {
        let messages = chat_messages("hello");
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[1]["role"], "user");
        assert_eq!(messages[1]["content"], "hello");
    }
}
