//! Job Analyzer — one schema-constrained completion combining the sanitized
//! job HTML and the serialized resume profile. Produces the six match
//! sub-scores plus the apply recommendation. Same all-or-nothing conformance
//! contract as the profiler: a single percentage cannot explain a
//! recommendation, so each axis (skill, experience, location, compensation,
//! culture) is scored individually for the report and UI layers.

use serde::{Deserialize, Serialize};

use crate::analysis::prompts::JOB_ANALYSIS_PROMPT;
use crate::analysis::profiler::ResumeProfile;
use crate::analysis::schemas::job_analysis_schema;
use crate::errors::AppError;
use crate::llm_client::{self, TextModel};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobDetails {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub department: Option<String>,
    pub industry: Option<String>,
    pub company_size: Option<String>,
    pub company_type: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequirementSkills {
    pub mandatory: Vec<String>,
    pub preferred: Vec<String>,
    pub nice_to_have: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Requirements {
    pub experience_required: Option<String>,
    pub experience_years: Option<f64>,
    pub education: Option<String>,
    pub skills: RequirementSkills,
    pub certifications: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkType {
    Remote,
    Hybrid,
    Onsite,
}

impl WorkType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkType::Remote => "remote",
            WorkType::Hybrid => "hybrid",
            WorkType::Onsite => "onsite",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobCharacteristics {
    pub work_type: Option<WorkType>,
    pub employment_type: Option<String>,
    pub work_schedule: Option<String>,
    pub travel_required: bool,
    pub team_size: Option<String>,
    pub reporting_structure: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Compensation {
    pub salary_range: Option<String>,
    pub currency: Option<String>,
    /// Defaults to paid; the analyzer flags unpaid roles explicitly
    /// (important for internships).
    pub is_paid: bool,
    pub compensation_type: Option<String>,
    pub benefits: Vec<String>,
    pub bonuses: Vec<String>,
}

impl Default for Compensation {
    fn default() -> Self {
        Compensation {
            salary_range: None,
            currency: None,
            is_paid: true,
            compensation_type: None,
            benefits: Vec::new(),
            bonuses: Vec::new(),
        }
    }
}

/// Six-dimensional match scores, each 0–100. `overall_match` is optional
/// here because the model may omit it; the orchestrator's merge guarantees
/// it in the persisted record by falling back to the legacy percentage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchAnalysis {
    pub overall_match: Option<f64>,
    pub skill_match: Option<f64>,
    pub experience_match: Option<f64>,
    pub location_match: Option<f64>,
    pub compensation_match: Option<f64>,
    pub culture_match: Option<f64>,
    pub matched_requirements: Vec<String>,
    pub missing_requirements: Vec<String>,
    pub overqualified_areas: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationPriority {
    High,
    #[default]
    Medium,
    Low,
}

impl ApplicationPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationPriority::High => "high",
            ApplicationPriority::Medium => "medium",
            ApplicationPriority::Low => "low",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Recommendation {
    pub should_apply: bool,
    pub confidence: Option<f64>,
    pub application_priority: ApplicationPriority,
    pub reasons_to_apply: Vec<String>,
    pub concerns_to_address: Vec<String>,
    pub preparation_tips: Vec<String>,
    pub interview_focus: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CareerGrowth {
    pub growth_potential: Option<String>,
    pub skill_development: Vec<String>,
    pub career_path: Vec<String>,
    pub learning_opportunities: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RiskAssessment {
    pub risk_level: Option<String>,
    pub risk_factors: Vec<String>,
    pub mitigation_strategies: Vec<String>,
}

/// Structured match assessment of one (job posting, resume profile) pair.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobAnalysis {
    pub job_details: JobDetails,
    pub requirements: Requirements,
    pub job_characteristics: JobCharacteristics,
    pub compensation: Compensation,
    pub match_analysis: MatchAnalysis,
    pub recommendation: Recommendation,
    pub career_growth: CareerGrowth,
    pub risk_assessment: RiskAssessment,
}

/// Analyzes a sanitized job posting against a resume profile.
/// The caller sanitizes the HTML; this stage only bounds and prompts.
pub async fn analyze_job(
    sanitized_html: &str,
    profile: &ResumeProfile,
    model: &dyn TextModel,
) -> Result<JobAnalysis, AppError> {
    let profile_json = serde_json::to_string_pretty(profile)
        .map_err(|e| AppError::UpstreamModel(format!("Failed to serialize profile: {e}")))?;
    let prompt = JOB_ANALYSIS_PROMPT
        .replace("{job_html}", sanitized_html)
        .replace("{resume_profile}", &profile_json);
    let schema = job_analysis_schema();

    let response = model
        .complete_structured(&prompt, Some(&schema), None)
        .await
        .map_err(|e| AppError::UpstreamModel(format!("Job analysis failed: {e}")))?;

    llm_client::parse_json::<JobAnalysis>(&response)
        .map_err(|e| AppError::UpstreamModel(format!("Job analysis did not conform: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_job_analysis_deserializes() {
        let json = r#"{
            "jobDetails": {"title": "Backend Engineer", "company": "Acme"},
            "requirements": {
                "experienceYears": 3,
                "skills": {
                    "mandatory": ["Python", "Django"],
                    "preferred": ["Kubernetes"],
                    "niceToHave": ["Terraform"]
                }
            },
            "jobCharacteristics": {"workType": "remote", "travelRequired": false},
            "compensation": {"isPaid": true, "salaryRange": "$120k-$150k"},
            "matchAnalysis": {
                "overallMatch": 78,
                "skillMatch": 85,
                "locationMatch": 100,
                "missingRequirements": ["Kubernetes"]
            },
            "recommendation": {
                "shouldApply": true,
                "confidence": 80,
                "applicationPriority": "high"
            },
            "careerGrowth": {"growthPotential": "high"},
            "riskAssessment": {"riskLevel": "low"}
        }"#;

        let analysis: JobAnalysis = serde_json::from_str(json).unwrap();
        assert_eq!(
            analysis.job_characteristics.work_type,
            Some(WorkType::Remote)
        );
        assert_eq!(analysis.match_analysis.overall_match, Some(78.0));
        assert!(analysis.recommendation.should_apply);
        assert_eq!(
            analysis.recommendation.application_priority,
            ApplicationPriority::High
        );
        assert_eq!(analysis.requirements.skills.nice_to_have, vec!["Terraform"]);
    }

    #[test]
    fn test_empty_object_defaults_every_field() {
        let analysis: JobAnalysis = serde_json::from_str("{}").unwrap();
        assert!(analysis.match_analysis.overall_match.is_none());
        assert!(analysis.compensation.is_paid);
        assert!(!analysis.recommendation.should_apply);
        assert_eq!(
            analysis.recommendation.application_priority,
            ApplicationPriority::Medium
        );
    }

    #[test]
    fn test_invalid_work_type_is_rejected() {
        let json = r#"{"jobCharacteristics": {"workType": "moonbase"}}"#;
        assert!(serde_json::from_str::<JobAnalysis>(json).is_err());
    }
}
