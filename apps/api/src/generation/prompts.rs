// Prompt construction for the tailoring call.
// The section markers are load-bearing: `parser` splits the output on them.

use crate::generation::parser::{COVER_LETTER_MARKER, TAILORED_RESUME_MARKER};

/// Characters of résumé text embedded in the prompt.
pub const RESUME_PROMPT_CHARS: usize = 3000;
/// Characters of job-description text embedded in the prompt.
pub const JD_PROMPT_CHARS: usize = 2000;

/// Tailoring prompt template. Replace `{resume}` and `{job_description}` before sending.
pub const TAILORING_PROMPT_TEMPLATE: &str = "\
You are an expert career coach and professional resume writer.

Below is a candidate's resume and a job description. Do two things:
1. Rewrite the resume so it is tailored to the job description. Emphasise the \
experience and skills that match the role. Do not invent experience the candidate does not have.
2. Write a concise, professional cover letter for this role based on the candidate's resume.

Format your answer EXACTLY like this, with both section headings on their own lines:

{resume_marker}
<the tailored resume>

{cover_letter_marker}
<the cover letter>

RESUME:
{resume}

JOB DESCRIPTION:
{job_description}
";

/// First `max_chars` Unicode scalar values of `text`.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Builds the tailoring prompt with both inputs truncated to their prompt budgets.
pub fn build_prompt(resume_text: &str, job_description: &str) -> String {
    TAILORING_PROMPT_TEMPLATE
        .replace("{resume_marker}", TAILORED_RESUME_MARKER)
        .replace("{cover_letter_marker}", COVER_LETTER_MARKER)
        // Inputs last so braces inside user text are never treated as placeholders.
        .replacen(
            "{job_description}",
            truncate_chars(job_description, JD_PROMPT_CHARS),
            1,
        )
        .replacen("{resume}", truncate_chars(resume_text, RESUME_PROMPT_CHARS), 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars_counts_scalars_not_bytes() {
        assert_eq!(truncate_chars("résumé", 3), "rés");
        assert_eq!(truncate_chars("short", 100), "short");
        assert_eq!(truncate_chars("", 5), "");
        assert_eq!(truncate_chars("abc", 0), "");
    }

    #[test]
    fn test_prompt_contains_markers_and_inputs() {
        let prompt = build_prompt("Rust engineer", "Hiring Rust devs");
        assert!(prompt.contains(TAILORED_RESUME_MARKER));
        assert!(prompt.contains(COVER_LETTER_MARKER));
        assert!(prompt.contains("Rust engineer"));
        assert!(prompt.contains("Hiring Rust devs"));
        assert!(!prompt.contains("{resume}"));
        assert!(!prompt.contains("{job_description}"));
    }

    #[test]
    fn test_prompt_truncates_inputs() {
        let resume = "r".repeat(RESUME_PROMPT_CHARS + 500);
        let jd = "j".repeat(JD_PROMPT_CHARS + 500);
        let prompt = build_prompt(&resume, &jd);
        assert!(prompt.contains(&"r".repeat(RESUME_PROMPT_CHARS)));
        assert!(!prompt.contains(&"r".repeat(RESUME_PROMPT_CHARS + 1)));
        assert!(prompt.contains(&"j".repeat(JD_PROMPT_CHARS)));
        assert!(!prompt.contains(&"j".repeat(JD_PROMPT_CHARS + 1)));
    }

    #[test]
    fn test_placeholder_text_in_resume_is_left_alone() {
        let prompt = build_prompt("Skills: {job_description}", "Backend role");
        assert!(prompt.contains("Skills: {job_description}"));
        assert!(prompt.contains("Backend role"));
    }
}
