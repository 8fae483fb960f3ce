//! Fuzz target for feedback parsing and annotation.
//!
//! Splits the input into a feedback document and a piece of writing, then
//! checks that:
//! 1. Parsing never panics
//! 2. Annotation succeeds for every parsed pair
//! 3. Annotated output is a fixed point of the sanitizer

#![no_main]

use feedmark::{sanitize, FeedbackParser, Feedmark};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 4_096 {
        return;
    }

    let input = String::from_utf8_lossy(data).into_owned();
    let (document, writing) = input.split_once('\u{0}').unwrap_or((input.as_str(), input.as_str()));

    // Each cascading pair can multiply the output size
    if FeedbackParser::new().parse(document).pairs.len() > 4 {
        return;
    }

    let outcome = Feedmark::new()
        .review_offline(document, writing)
        .expect("parsed pairs always have a non-empty original");

    let markup = outcome.annotated.as_str();
    assert_eq!(sanitize(markup), markup);
});
