//! Response parser. Splits free-form generation output into résumé and cover letter.
//!
//! Matching is on the first occurrence of each literal marker. When the cover
//! letter marker is missing, the whole output becomes the tailored résumé and
//! only the cover letter keeps its sentinel. Consumers rely on the exact sentinel
//! strings, so the asymmetry is kept as is.

use serde::Serialize;

pub const TAILORED_RESUME_MARKER: &str = "TAILORED RESUME:";
pub const COVER_LETTER_MARKER: &str = "COVER LETTER:";

pub const MISSING_RESUME_SENTINEL: &str = "Could not extract tailored resume.";
pub const MISSING_COVER_LETTER_SENTINEL: &str = "Could not extract cover letter.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedGeneration {
    pub tailored_resume: String,
    pub cover_letter: String,
}

impl Default for ParsedGeneration {
    fn default() -> Self {
        Self {
            tailored_resume: MISSING_RESUME_SENTINEL.to_string(),
            cover_letter: MISSING_COVER_LETTER_SENTINEL.to_string(),
        }
    }
}

/// Total: never fails, every input yields both fields.
pub fn parse_generation(raw: &str) -> ParsedGeneration {
    let mut parsed = ParsedGeneration::default();

    match raw.split_once(COVER_LETTER_MARKER) {
        Some((before, cover_letter)) => {
            parsed.cover_letter = cover_letter.trim().to_string();
            parsed.tailored_resume = match before.split_once(TAILORED_RESUME_MARKER) {
                Some((_, resume)) => resume.trim().to_string(),
                None => before.trim().to_string(),
            };
        }
        // Untrimmed on purpose: the raw output is passed through verbatim.
        None => parsed.tailored_resume = raw.to_string(),
    }

    parsed
}
