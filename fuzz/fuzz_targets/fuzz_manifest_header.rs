//! Fuzz target for SKILL.md header validation.
//!
//! Validation must return a verdict for any input, never panic. Slicing
//! around the delimiter scan is the interesting part for non-ASCII input.

#![no_main]

use libfuzzer_sys::fuzz_target;
use skillpack_bundle::validate_manifest_content;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        let _ = validate_manifest_content(content);
    }
});
