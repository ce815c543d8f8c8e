use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::analysis::orchestrator::{self, SkillSource};
use crate::analysis::{profiler, skill_extractor};
use crate::auth::AuthUser;
use crate::crypto::decode_credential;
use crate::errors::AppError;
use crate::llm_client::GeminiClient;
use crate::models::analysis::AnalysisRow;
use crate::models::resume::ResumeRow;
use crate::state::AppState;
use crate::storage::{self, JobMeta};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeJobRequest {
    #[serde(default)]
    pub job_html: String,
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub job_url: Option<String>,
}

/// Loads the caller's user record and resume slot concurrently, then checks
/// the preconditions every analysis endpoint shares: a resume with extracted
/// text on file and a configured Gemini key.
async fn load_analysis_context(
    state: &AppState,
    user_id: uuid::Uuid,
) -> Result<(ResumeRow, GeminiClient), AppError> {
    let (user, resume) = tokio::try_join!(
        storage::get_user(&state.db, user_id),
        storage::get_user_resume(&state.db, user_id),
    )?;
    let user = user.ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    let resume = resume.ok_or_else(|| AppError::PreconditionMissing {
        message: "No resume found. Please upload your resume first.".to_string(),
        action: Some("upload_resume_required"),
    })?;
    if resume.extracted_text.trim().is_empty() {
        return Err(AppError::precondition(
            "Resume has no extracted text. Please re-upload your resume.",
        ));
    }
    let api_key = user
        .gemini_api_key
        .as_deref()
        .ok_or_else(|| AppError::PreconditionMissing {
            message: "Gemini API key not configured. Please add your API key first.".to_string(),
            action: Some("configure_api_key_required"),
        })?;

    let model = GeminiClient::new(
        state.http.clone(),
        state.config.gemini_api_base.clone(),
        decode_credential(api_key),
    );
    Ok((resume, model))
}

/// POST /api/analysis/job
pub async fn handle_analyze_job(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(req): Json<AnalyzeJobRequest>,
) -> Result<Json<Value>, AppError> {
    if req.job_html.trim().is_empty() {
        return Err(AppError::Validation("jobHtml is required".to_string()));
    }
    if req.job_title.trim().is_empty() || req.company.trim().is_empty() {
        return Err(AppError::Validation(
            "jobTitle and company are required".to_string(),
        ));
    }

    let (resume, model) = load_analysis_context(&state, user_id).await?;

    let resolved = orchestrator::resolve_skills(
        &resume.extracted_skills.0,
        resume.skills_analysis.as_ref().map(|j| &j.0),
        &resume.extracted_text,
        &model,
    )
    .await?;
    // On-demand extraction is worth caching for the next analysis.
    if resolved.source == SkillSource::LegacyExtraction {
        storage::update_resume_skills(&state.db, resume.id, &resolved.skills).await?;
    }

    info!(
        "Starting job analysis for '{}' at '{}' ({} resume skills)",
        req.job_title,
        req.company,
        resolved.skills.len()
    );

    let outcome = orchestrator::run_job_analysis(
        &resume.extracted_text,
        &resolved.skills,
        &req.job_html,
        &model,
    )
    .await?;

    let meta = JobMeta {
        job_title: req.job_title,
        company: req.company,
        location: req.location,
        job_url: req.job_url,
        job_html: req.job_html,
    };
    let row = storage::replace_analysis(
        &state.db,
        user_id,
        &meta,
        &outcome,
        resolved.skills.len() as i32,
    )
    .await?;

    // The profile write-back rides on the enhanced tier: a fresh profile is
    // only trusted when the whole bundle came back intact.
    if let Some(enhanced) = &outcome.enhanced {
        storage::update_resume_profile(&state.db, resume.id, &enhanced.resume_profile).await?;
    }

    Ok(Json(legacy_analysis_response(&row)))
}

/// POST /api/resume/analyze
///
/// Profiler-first: the comprehensive profile yields both the categorized
/// skills and the flat list. If profiling fails, the legacy extractor is the
/// fallback so the user still ends up with a usable skill list.
pub async fn handle_analyze_resume(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Value>, AppError> {
    let (resume, model) = load_analysis_context(&state, user_id).await?;

    match profiler::profile_resume(&resume.extracted_text, &model).await {
        Ok(profile) => {
            let skills = skill_extractor::normalize_skills(profile.skills.flatten());
            storage::update_resume_skills(&state.db, resume.id, &skills).await?;
            storage::update_resume_profile(&state.db, resume.id, &profile).await?;
            info!(
                "Comprehensive resume analysis completed: {} skills, level {:?}",
                skills.len(),
                profile.career_level.level
            );
            Ok(Json(json!({
                "message": "Resume analyzed successfully",
                "skills": skills,
                "skillCount": skills.len(),
                "analysisType": "comprehensive",
                "hasComprehensiveProfile": true,
                "comprehensiveData": {
                    "careerLevel": profile.career_level,
                    "suitableRoles": profile.career_fit.suitable_roles,
                    "readinessLevel": profile.career_fit.readiness_level,
                    "primaryDomain": profile.career_fit.primary_domain,
                }
            })))
        }
        Err(e) => {
            warn!("Comprehensive profiling failed, falling back to skill extraction: {e}");
            let skills = skill_extractor::extract_skills(&resume.extracted_text, &model).await?;
            storage::update_resume_skills(&state.db, resume.id, &skills).await?;
            Ok(Json(json!({
                "message": "Resume analyzed successfully",
                "skills": skills,
                "skillCount": skills.len(),
                "analysisType": "basic",
                "hasComprehensiveProfile": false,
            })))
        }
    }
}

/// GET /api/analysis/latest
pub async fn handle_latest_analysis(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Value>, AppError> {
    let row = storage::get_latest_analysis(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("No analysis found".to_string()))?;
    Ok(Json(legacy_analysis_response(&row)))
}

/// GET /api/analysis/comprehensive
pub async fn handle_comprehensive_analysis(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Value>, AppError> {
    let row = storage::get_latest_analysis(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("No analysis found".to_string()))?;
    if !row.has_enhanced_data() {
        return Err(AppError::NotFound(
            "No comprehensive analysis available. The latest analysis has legacy data only."
                .to_string(),
        ));
    }
    Ok(Json(json!({
        "jobTitle": row.job_title,
        "company": row.company,
        "location": row.location,
        "jobUrl": row.job_url,
        "overallMatch": row.overall_match,
        "jobDetails": row.job_details,
        "requirements": row.requirements,
        "jobCharacteristics": row.job_characteristics,
        "compensation": row.compensation,
        "matchAnalysis": row.match_analysis,
        "recommendation": row.recommendation,
        "careerGrowth": row.career_growth,
        "riskAssessment": row.risk_assessment,
        "comprehensiveReport": row.comprehensive_report,
        "analyzedAt": row.analyzed_at,
    })))
}

/// GET /api/resume/profile
pub async fn handle_resume_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Value>, AppError> {
    let resume = storage::get_user_resume(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("No resume found".to_string()))?;

    // Presence is decided once here; clients branch on the flag, not on
    // which nested fields happen to be null.
    if !resume.has_profile() {
        return Ok(Json(json!({
            "hasProfile": false,
            "message": "No comprehensive profile yet. Run resume analysis first.",
        })));
    }
    Ok(Json(json!({
        "hasProfile": true,
        "personalInfo": resume.personal_info,
        "careerLevel": resume.career_level,
        "skillsAnalysis": resume.skills_analysis,
        "projectAnalysis": resume.project_analysis,
        "education": resume.education,
        "careerFit": resume.career_fit,
        "workPreferences": resume.work_preferences,
        "salaryInsights": resume.salary_insights,
        "updatedAt": resume.updated_at,
    })))
}

/// Legacy-shaped analysis payload plus the `analysisContext` block that tells
/// clients whether the enhanced columns are worth a follow-up fetch.
fn legacy_analysis_response(row: &AnalysisRow) -> Value {
    json!({
        "id": row.id,
        "jobTitle": row.job_title,
        "company": row.company,
        "location": row.location,
        "jobUrl": row.job_url,
        "jobRequiredSkills": row.job_required_skills.0,
        "jobPreferredSkills": row.job_preferred_skills.0,
        "matchedSkills": row.matched_skills.0,
        "missingSkills": row.missing_skills.0,
        "partialSkills": row.partial_skills.0,
        "matchPercentage": row.match_percentage,
        "recommendations": row.recommendations.0,
        "skillsByCategory": row.skills_by_category.0,
        "experienceLevel": row.experience_level,
        "jobInsights": row.job_insights.0,
        "overallMatch": row.overall_match,
        "analyzedAt": row.analyzed_at,
        "analysisContext": {
            "hasEnhancedData": row.has_enhanced_data(),
            "resumeSkillCount": row.resume_skill_count,
            "shouldApply": row.should_apply,
            "applicationPriority": row.application_priority,
            "workType": row.work_type,
            "isPaid": row.is_paid,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::matcher::{JobInsights, Recommendations, SkillsByCategory};
    use chrono::Utc;
    use sqlx::types::Json;
    use uuid::Uuid;

    fn legacy_only_row() -> AnalysisRow {
        AnalysisRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            job_title: "Backend Engineer".to_string(),
            company: "Acme".to_string(),
            location: "Remote".to_string(),
            job_url: None,
            job_html: "<p>job</p>".to_string(),
            matched_skills: Json(vec!["Python".to_string()]),
            missing_skills: Json(vec!["Kubernetes".to_string()]),
            partial_skills: Json(Vec::new()),
            match_percentage: 72.0,
            recommendations: Json(Recommendations::default()),
            skills_by_category: Json(SkillsByCategory::default()),
            experience_level: Some("senior".to_string()),
            job_required_skills: Json(vec!["Python".to_string(), "Kubernetes".to_string()]),
            job_preferred_skills: Json(vec!["Terraform".to_string()]),
            job_insights: Json(JobInsights {
                seniority_level: Some("senior".to_string()),
                ..Default::default()
            }),
            resume_skill_count: 3,
            job_details: None,
            requirements: None,
            job_characteristics: None,
            compensation: None,
            match_analysis: None,
            recommendation: None,
            career_growth: None,
            risk_assessment: None,
            comprehensive_report: None,
            overall_match: 72.0,
            should_apply: None,
            application_priority: None,
            confidence: None,
            work_type: None,
            employment_type: None,
            is_paid: None,
            analyzed_at: Utc::now(),
        }
    }

    #[test]
    fn test_legacy_response_carries_job_skill_lists_and_insights() {
        let body = legacy_analysis_response(&legacy_only_row());

        assert_eq!(body["jobRequiredSkills"], json!(["Python", "Kubernetes"]));
        assert_eq!(body["jobPreferredSkills"], json!(["Terraform"]));
        assert_eq!(body["jobInsights"]["seniorityLevel"], json!("senior"));
        assert_eq!(body["analysisContext"]["resumeSkillCount"], json!(3));
        assert_eq!(body["analysisContext"]["hasEnhancedData"], json!(false));
    }

    #[test]
    fn test_legacy_response_core_fields() {
        let body = legacy_analysis_response(&legacy_only_row());

        assert_eq!(body["matchedSkills"], json!(["Python"]));
        assert_eq!(body["missingSkills"], json!(["Kubernetes"]));
        assert_eq!(body["matchPercentage"], json!(72.0));
        assert_eq!(body["overallMatch"], json!(72.0));
        assert_eq!(body["experienceLevel"], json!("senior"));
    }
}
