// The LLM-orchestration core: sanitize → profile → legacy match → enhanced
// analysis → report → merge. All LLM calls go through llm_client — no direct
// Gemini calls here.

pub mod handlers;
pub mod job_analyzer;
pub mod matcher;
pub mod orchestrator;
pub mod profiler;
pub mod prompts;
pub mod report;
pub mod sanitize;
pub mod schemas;
pub mod skill_extractor;

/// Truncates a string to at most `max` characters (not bytes), preserving
/// UTF-8 boundaries. Every pipeline stage bounds its prompt input with this.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Replaces non-ASCII characters with spaces. Resume text arrives from
/// document extraction with ligatures and control characters that only waste
/// model tokens.
pub fn scrub_non_ascii(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_ascii() { c } else { ' ' })
        .collect()
}
