//! Resume Profiler — turns resume free text into a structured,
//! schema-validated profile. All-or-nothing: downstream stages depend on
//! every field key existing, so a non-conforming model response fails the
//! stage rather than yielding a partial profile.

use serde::{Deserialize, Serialize};

use super::{scrub_non_ascii, truncate_chars};
use crate::analysis::prompts::PROFILE_PROMPT;
use crate::analysis::schemas::resume_profile_schema;
use crate::errors::AppError;
use crate::llm_client::{self, TextModel};

/// Input cap for the profiling prompt.
pub const MAX_RESUME_CHARS: usize = 20_000;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub name: Option<String>,
    pub location: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub linked_in: Option<String>,
    pub github: Option<String>,
    pub portfolio: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CareerBand {
    Fresher,
    #[default]
    Junior,
    #[serde(rename = "mid-level")]
    MidLevel,
    Senior,
    Lead,
    Executive,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CareerLevel {
    pub experience_years: f64,
    pub level: CareerBand,
    pub is_fresher: bool,
    pub career_progression: String,
}

/// The nine skill categories. Every array defaults to empty, never absent,
/// once the profile is validated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SkillCategories {
    pub technical: Vec<String>,
    pub programming: Vec<String>,
    pub frameworks: Vec<String>,
    pub tools: Vec<String>,
    pub databases: Vec<String>,
    pub cloud: Vec<String>,
    pub soft: Vec<String>,
    pub languages: Vec<String>,
    pub certifications: Vec<String>,
}

impl SkillCategories {
    /// Flattens all categories into the legacy flat skill list, dropping
    /// blank entries. Order follows category declaration order.
    pub fn flatten(&self) -> Vec<String> {
        [
            &self.technical,
            &self.programming,
            &self.frameworks,
            &self.tools,
            &self.databases,
            &self.cloud,
            &self.soft,
            &self.languages,
            &self.certifications,
        ]
        .into_iter()
        .flatten()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectQuality {
    Excellent,
    Good,
    #[default]
    Average,
    Basic,
    Poor,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplexityLevel {
    #[default]
    Basic,
    Intermediate,
    Advanced,
    Expert,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectAnalysis {
    pub total_projects: u32,
    pub has_good_projects: bool,
    pub project_quality: ProjectQuality,
    pub project_types: Vec<String>,
    pub technologies_used: Vec<String>,
    pub complexity_level: ComplexityLevel,
    pub has_team_projects: bool,
    pub has_open_source: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Education {
    pub degree: Option<String>,
    pub field: Option<String>,
    pub university: Option<String>,
    pub gpa: Option<String>,
    pub graduation_year: Option<i32>,
    pub additional_courses: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReadinessLevel {
    #[serde(rename = "job-ready")]
    JobReady,
    #[default]
    #[serde(rename = "needs-improvement")]
    NeedsImprovement,
    #[serde(rename = "requires-training")]
    RequiresTraining,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CareerFit {
    /// Ordered, most suitable first.
    pub suitable_roles: Vec<String>,
    pub primary_domain: String,
    pub secondary_domains: Vec<String>,
    pub readiness_level: ReadinessLevel,
    pub strength_areas: Vec<String>,
    pub improvement_areas: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkPreferences {
    pub preferred_location: Option<String>,
    pub open_to_remote: bool,
    pub willing_to_relocate: bool,
    pub internship_experience: bool,
    pub full_time_ready: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SalaryInsights {
    pub estimated_range: Option<String>,
    pub currency: Option<String>,
    pub factors_considered: Vec<String>,
}

/// Structured profile of one resume text. Immutable per generation: a new
/// profile supersedes the prior one on the owning resume record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeProfile {
    pub personal_info: PersonalInfo,
    pub career_level: CareerLevel,
    pub skills: SkillCategories,
    pub project_analysis: ProjectAnalysis,
    pub education: Education,
    pub career_fit: CareerFit,
    pub work_preferences: WorkPreferences,
    pub salary_insights: SalaryInsights,
}

/// Profiles resume free text with one schema-constrained completion.
pub async fn profile_resume(
    resume_text: &str,
    model: &dyn TextModel,
) -> Result<ResumeProfile, AppError> {
    let clean = scrub_non_ascii(resume_text);
    let clean = truncate_chars(&clean, MAX_RESUME_CHARS);
    let prompt = PROFILE_PROMPT.replace("{resume_text}", clean);
    let schema = resume_profile_schema();

    let response = model
        .complete_structured(&prompt, Some(&schema), None)
        .await
        .map_err(|e| AppError::UpstreamModel(format!("Resume profiling failed: {e}")))?;

    llm_client::parse_json::<ResumeProfile>(&response)
        .map_err(|e| AppError::UpstreamModel(format!("Resume profile did not conform: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_yields_all_nine_skill_keys() {
        // Presence invariant: every array exists (empty) after validation,
        // even when the model omitted the whole skills object.
        let profile: ResumeProfile = serde_json::from_str("{}").unwrap();
        let s = &profile.skills;
        for category in [
            &s.technical,
            &s.programming,
            &s.frameworks,
            &s.tools,
            &s.databases,
            &s.cloud,
            &s.soft,
            &s.languages,
            &s.certifications,
        ] {
            assert!(category.is_empty());
        }
        let as_json = serde_json::to_value(&profile).unwrap();
        assert_eq!(as_json["skills"].as_object().unwrap().len(), 9);
    }

    #[test]
    fn test_full_profile_deserializes() {
        let json = r#"{
            "personalInfo": {"name": "Ada", "github": "https://github.com/ada"},
            "careerLevel": {
                "experienceYears": 5,
                "level": "senior",
                "isFresher": false,
                "careerProgression": "steady growth"
            },
            "skills": {
                "technical": ["Distributed systems"],
                "programming": ["Python"],
                "frameworks": ["Django"],
                "cloud": ["AWS"]
            },
            "projectAnalysis": {
                "totalProjects": 4,
                "hasGoodProjects": true,
                "projectQuality": "good",
                "complexityLevel": "advanced"
            },
            "careerFit": {
                "suitableRoles": ["Backend Engineer", "Platform Engineer"],
                "primaryDomain": "backend",
                "readinessLevel": "job-ready"
            }
        }"#;

        let profile: ResumeProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.career_level.level, CareerBand::Senior);
        assert!((profile.career_level.experience_years - 5.0).abs() < f64::EPSILON);
        assert_eq!(profile.project_analysis.project_quality, ProjectQuality::Good);
        assert_eq!(
            profile.project_analysis.complexity_level,
            ComplexityLevel::Advanced
        );
        assert_eq!(profile.career_fit.readiness_level, ReadinessLevel::JobReady);
        assert_eq!(profile.career_fit.suitable_roles[0], "Backend Engineer");
    }

    #[test]
    fn test_flatten_concatenates_and_filters() {
        let skills = SkillCategories {
            programming: vec!["Python".to_string(), " ".to_string()],
            frameworks: vec!["Django".to_string()],
            cloud: vec!["AWS".to_string()],
            ..Default::default()
        };
        assert_eq!(skills.flatten(), vec!["Python", "Django", "AWS"]);
    }

    #[test]
    fn test_mid_level_band_serde_name() {
        let band: CareerBand = serde_json::from_str(r#""mid-level""#).unwrap();
        assert_eq!(band, CareerBand::MidLevel);
    }

    #[test]
    fn test_unknown_career_band_is_rejected() {
        // All-or-nothing: a value outside the enum fails the stage.
        assert!(serde_json::from_str::<CareerBand>(r#""wizard""#).is_err());
    }
}
