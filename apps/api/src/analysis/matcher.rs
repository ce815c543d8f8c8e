//! Legacy skill-gap match — the always-available tier. One JSON-mode
//! completion over (sanitized job HTML, flat skill list). Every field
//! defaults at parse time so older clients always see the full legacy shape.

use serde::{Deserialize, Serialize};

use crate::analysis::prompts::LEGACY_MATCH_PROMPT;
use crate::analysis::sanitize::sanitize_job_html;
use crate::errors::AppError;
use crate::llm_client::{self, TextModel};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Recommendations {
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub interview_tips: Vec<String>,
    pub application_advice: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryMatch {
    pub matched: Vec<String>,
    pub missing: Vec<String>,
    pub partial: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillsByCategory {
    pub technical: CategoryMatch,
    pub soft: CategoryMatch,
    pub tools: CategoryMatch,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobInsights {
    pub company_type: Option<String>,
    pub work_type: Option<String>,
    pub seniority_level: Option<String>,
    pub urgency: Option<String>,
    pub competitive_factors: Vec<String>,
    pub red_flags: Vec<String>,
    pub opportunities: Vec<String>,
}

fn unknown() -> String {
    "unknown".to_string()
}

/// Legacy analysis output. `match_percentage` is the one score older
/// clients key off; it is required in the persisted record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SkillGapAnalysis {
    pub job_required_skills: Vec<String>,
    pub job_preferred_skills: Vec<String>,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub partial_skills: Vec<String>,
    pub match_percentage: f64,
    pub recommendations: Recommendations,
    pub skills_by_category: SkillsByCategory,
    #[serde(default = "unknown")]
    pub experience_level: String,
    pub job_insights: JobInsights,
}

impl Default for SkillGapAnalysis {
    fn default() -> Self {
        SkillGapAnalysis {
            job_required_skills: Vec::new(),
            job_preferred_skills: Vec::new(),
            matched_skills: Vec::new(),
            missing_skills: Vec::new(),
            partial_skills: Vec::new(),
            match_percentage: 0.0,
            recommendations: Recommendations::default(),
            skills_by_category: SkillsByCategory::default(),
            experience_level: unknown(),
            job_insights: JobInsights::default(),
        }
    }
}

/// Runs the legacy skill-gap match. Sanitizes the job HTML internally.
/// Failure here is terminal for the pipeline: there is no tier below.
pub async fn analyze_skill_gap(
    job_html: &str,
    resume_skills: &[String],
    model: &dyn TextModel,
) -> Result<SkillGapAnalysis, AppError> {
    let clean_html = sanitize_job_html(job_html);
    let skills_json = serde_json::to_string(resume_skills)
        .map_err(|e| AppError::UpstreamModel(format!("Failed to serialize skills: {e}")))?;
    let prompt = LEGACY_MATCH_PROMPT
        .replace("{job_html}", &clean_html)
        .replace("{resume_skills}", &skills_json);

    // JSON mode without a server-side schema: the legacy shape predates
    // structured generation, so parsing defaults every missing field instead.
    let response = model
        .complete_structured(&prompt, None, None)
        .await
        .map_err(|e| AppError::UpstreamModel(format!("Skill-gap analysis failed: {e}")))?;

    llm_client::parse_json::<SkillGapAnalysis>(&response)
        .map_err(|e| AppError::UpstreamModel(format!("Failed to parse analysis results: {e}")))
}
