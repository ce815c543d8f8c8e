//! Report Synthesizer — condenses (profile, job analysis) into a
//! decision-oriented report. The most token-constrained stage: both inputs
//! are already-large structured objects, so each is truncated to a fixed
//! budget of serialized JSON and the output token count is capped. Parse
//! failure here is `ReportGeneration`, distinct from a schema violation —
//! these failures are more often a cut-off response than a wrong shape.

use serde::{Deserialize, Serialize};

use super::truncate_chars;
use crate::analysis::job_analyzer::JobAnalysis;
use crate::analysis::profiler::ResumeProfile;
use crate::analysis::prompts::REPORT_PROMPT;
use crate::analysis::schemas::comprehensive_report_schema;
use crate::errors::AppError;
use crate::llm_client::{self, LlmError, TextModel};

/// Serialized-JSON budget per input object.
pub const MAX_INPUT_CHARS: usize = 5_000;
/// Output token cap, preventing truncated (unparseable) JSON.
pub const MAX_OUTPUT_TOKENS: u32 = 8_192;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Apply,
    #[default]
    Consider,
    Skip,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExecutiveSummary {
    pub recommendation: Verdict,
    pub match_score: f64,
    pub key_strengths: Vec<String>,
    pub major_concerns: Vec<String>,
    pub one_line_advice: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DetailedAnalysis {
    pub fit_assessment: String,
    pub career_impact: String,
    pub compensation_analysis: String,
    pub skill_gap_analysis: String,
    pub interview_preparation: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActionItems {
    pub before_applying: Vec<String>,
    pub application_tips: Vec<String>,
    pub interview_prep: Vec<String>,
    pub skills_to_improve: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AlternativeOptions {
    pub similar_roles: Vec<String>,
    pub better_fit_companies: Vec<String>,
    pub skill_building_path: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Timeline {
    pub immediate_actions: Vec<String>,
    pub short_term: Vec<String>,
    pub long_term: Vec<String>,
}

/// Condensed, decision-oriented report. List sizes are bounded by prompt
/// instruction (≤3 per category), not post-filtering.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComprehensiveReport {
    pub executive_summary: ExecutiveSummary,
    pub detailed_analysis: DetailedAnalysis,
    pub action_items: ActionItems,
    pub alternative_options: AlternativeOptions,
    pub timeline: Timeline,
}

/// Synthesizes the final report from the profile and the job analysis.
pub async fn synthesize_report(
    profile: &ResumeProfile,
    job_analysis: &JobAnalysis,
    model: &dyn TextModel,
) -> Result<ComprehensiveReport, AppError> {
    let resume_json = serde_json::to_string(profile)
        .map_err(|e| AppError::ReportGeneration(format!("Failed to serialize profile: {e}")))?;
    let job_json = serde_json::to_string(job_analysis)
        .map_err(|e| AppError::ReportGeneration(format!("Failed to serialize analysis: {e}")))?;

    let prompt = REPORT_PROMPT
        .replace("{resume_summary}", truncate_chars(&resume_json, MAX_INPUT_CHARS))
        .replace("{job_summary}", truncate_chars(&job_json, MAX_INPUT_CHARS));
    let schema = comprehensive_report_schema();

    let response = model
        .complete_structured(&prompt, Some(&schema), Some(MAX_OUTPUT_TOKENS))
        .await
        .map_err(|e| match e {
            LlmError::Parse(e) => {
                AppError::ReportGeneration(format!("Failed to parse comprehensive report: {e}"))
            }
            other => AppError::UpstreamModel(format!("Report generation call failed: {other}")),
        })?;

    llm_client::parse_json::<ComprehensiveReport>(&response).map_err(|e| {
        AppError::ReportGeneration(format!("Failed to parse comprehensive report: {e}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_serde_uppercase() {
        assert_eq!(
            serde_json::from_str::<Verdict>(r#""APPLY""#).unwrap(),
            Verdict::Apply
        );
        assert_eq!(
            serde_json::from_str::<Verdict>(r#""SKIP""#).unwrap(),
            Verdict::Skip
        );
        assert_eq!(serde_json::to_string(&Verdict::Consider).unwrap(), r#""CONSIDER""#);
    }

    #[test]
    fn test_report_deserializes_with_defaults() {
        let json = r#"{
            "executiveSummary": {
                "recommendation": "CONSIDER",
                "matchScore": 64,
                "keyStrengths": ["Python depth", "AWS production experience"],
                "majorConcerns": ["No Kubernetes"],
                "oneLineAdvice": "Close the Kubernetes gap before applying."
            },
            "actionItems": {
                "beforeApplying": ["Finish a small k8s deployment project"]
            }
        }"#;

        let report: ComprehensiveReport = serde_json::from_str(json).unwrap();
        assert_eq!(report.executive_summary.recommendation, Verdict::Consider);
        assert_eq!(report.executive_summary.key_strengths.len(), 2);
        assert!(report.alternative_options.similar_roles.is_empty());
        assert!(report.timeline.immediate_actions.is_empty());
    }
}
