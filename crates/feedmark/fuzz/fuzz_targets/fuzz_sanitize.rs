//! Fuzz target for the markup sanitizer.
//!
//! The sanitizer must never panic and must be idempotent.

#![no_main]

use feedmark::sanitize;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let input = String::from_utf8_lossy(data);

    let once = sanitize(&input);
    let twice = sanitize(&once);
    assert_eq!(once, twice);

    assert!(!once.to_ascii_lowercase().contains("<script"));
});
