//! Skill Extractor — the legacy tier. One plain completion asking for a flat
//! JSON array of skill strings. Parse failure soft-fails to an empty list:
//! this tier is itself the fallback below the richer profiler, so there is
//! nothing further to fall back to except "no skills".

use tracing::warn;

use super::{scrub_non_ascii, truncate_chars};
use crate::analysis::prompts::SKILL_EXTRACT_PROMPT;
use crate::errors::AppError;
use crate::llm_client::{self, TextModel};

/// Input cap for the legacy extraction prompt.
pub const MAX_RESUME_CHARS: usize = 15_000;

/// Extracts a flat list of skills from resume free text.
///
/// Transport/API failure is a hard error (no meaningful fallback exists below
/// this tier); a malformed JSON response degrades to an empty list.
pub async fn extract_skills(
    resume_text: &str,
    model: &dyn TextModel,
) -> Result<Vec<String>, AppError> {
    let clean = scrub_non_ascii(resume_text);
    let clean = truncate_chars(&clean, MAX_RESUME_CHARS);
    let prompt = SKILL_EXTRACT_PROMPT.replace("{resume_text}", clean);

    let response = model
        .complete(&prompt)
        .await
        .map_err(|e| AppError::UpstreamModel(format!("Skill extraction failed: {e}")))?;

    match llm_client::parse_json::<Vec<String>>(&response) {
        Ok(skills) => Ok(normalize_skills(skills)),
        Err(e) => {
            warn!("Failed to parse skills JSON, returning empty list: {e}");
            Ok(Vec::new())
        }
    }
}

/// Drops empty/whitespace-only entries.
pub fn normalize_skills(skills: Vec<String>) -> Vec<String> {
    skills
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_drops_blank_entries() {
        let skills = vec![
            "Rust".to_string(),
            "  ".to_string(),
            String::new(),
            " SQL ".to_string(),
        ];
        assert_eq!(
            normalize_skills(skills),
            vec!["Rust".to_string(), "SQL".to_string()]
        );
    }

    #[test]
    fn test_normalize_empty_input() {
        assert!(normalize_skills(Vec::new()).is_empty());
    }
}
