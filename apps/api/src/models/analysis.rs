use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::analysis::job_analyzer::{
    CareerGrowth, Compensation, JobCharacteristics, JobDetails, MatchAnalysis, Recommendation,
    Requirements,
};
use crate::analysis::matcher::{JobInsights, Recommendations, SkillsByCategory};
use crate::analysis::report::ComprehensiveReport;

/// Single-slot analysis record: at most one per user, replaced wholesale on
/// every job analysis. Legacy columns are always populated; enhanced columns
/// are nullable companions filled only when the enhanced tier succeeded.
/// `overall_match` is always present (model score or legacy fallback).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AnalysisRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub job_title: String,
    pub company: String,
    pub location: String,
    pub job_url: Option<String>,
    pub job_html: String,

    // Legacy tier (required)
    pub matched_skills: Json<Vec<String>>,
    pub missing_skills: Json<Vec<String>>,
    pub partial_skills: Json<Vec<String>>,
    pub match_percentage: f64,
    pub recommendations: Json<Recommendations>,
    pub skills_by_category: Json<SkillsByCategory>,
    pub experience_level: Option<String>,
    pub job_required_skills: Json<Vec<String>>,
    pub job_preferred_skills: Json<Vec<String>>,
    pub job_insights: Json<JobInsights>,
    pub resume_skill_count: i32,

    // Enhanced tier (nullable companions)
    pub job_details: Option<Json<JobDetails>>,
    pub requirements: Option<Json<Requirements>>,
    pub job_characteristics: Option<Json<JobCharacteristics>>,
    pub compensation: Option<Json<Compensation>>,
    pub match_analysis: Option<Json<MatchAnalysis>>,
    pub recommendation: Option<Json<Recommendation>>,
    pub career_growth: Option<Json<CareerGrowth>>,
    pub risk_assessment: Option<Json<RiskAssessmentColumn>>,
    pub comprehensive_report: Option<Json<ComprehensiveReport>>,

    // Quick-decision projections of the enhanced tier
    pub overall_match: f64,
    pub should_apply: Option<bool>,
    pub application_priority: Option<String>,
    pub confidence: Option<f64>,
    pub work_type: Option<String>,
    pub employment_type: Option<String>,
    pub is_paid: Option<bool>,

    pub analyzed_at: DateTime<Utc>,
}

pub type RiskAssessmentColumn = crate::analysis::job_analyzer::RiskAssessment;

impl AnalysisRow {
    /// Whether the enhanced tier populated this record.
    pub fn has_enhanced_data(&self) -> bool {
        self.job_details.is_some() || self.comprehensive_report.is_some()
    }
}
