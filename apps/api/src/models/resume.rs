use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::analysis::profiler::SkillCategories;

/// Single-slot resume record: at most one per user. Holds the raw extracted
/// text, the legacy flat skill list, and the most recent profile's sections
/// flattened onto nullable JSON columns.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub original_name: String,
    pub file_size: i64,
    pub mime_type: String,
    pub extracted_text: String,
    /// Legacy flat skill list, kept for backward compatibility with older
    /// clients. Empty until resume analysis runs.
    pub extracted_skills: Json<Vec<String>>,
    pub personal_info: Option<Json<Value>>,
    pub career_level: Option<Json<Value>>,
    pub skills_analysis: Option<Json<SkillCategories>>,
    pub project_analysis: Option<Json<Value>>,
    pub education: Option<Json<Value>>,
    pub career_fit: Option<Json<Value>>,
    pub work_preferences: Option<Json<Value>>,
    pub salary_insights: Option<Json<Value>>,
    pub uploaded_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ResumeRow {
    /// Whether any profile section has been populated by the profiler.
    pub fn has_profile(&self) -> bool {
        self.personal_info.is_some() || self.career_level.is_some()
    }
}

/// Insert parameters for a freshly uploaded resume.
#[derive(Debug)]
pub struct NewResume {
    pub user_id: Uuid,
    pub original_name: String,
    pub file_size: i64,
    pub mime_type: String,
    pub extracted_text: String,
}
