//! Storage — typed CRUD over the single-slot user records.
//!
//! Resume and Analysis are single-slot: at most one row per user. Replacing
//! one is a delete+insert inside a single transaction so a concurrent reader
//! never observes a momentarily-absent record.

use chrono::{Duration, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::analysis::orchestrator::PipelineOutcome;
use crate::analysis::profiler::ResumeProfile;
use crate::errors::AppError;
use crate::models::analysis::AnalysisRow;
use crate::models::resume::{NewResume, ResumeRow};
use crate::models::user::{ApiTokenRow, UserRow};

// ── Users ───────────────────────────────────────────────────────────────────

pub async fn get_user(pool: &PgPool, id: Uuid) -> Result<Option<UserRow>, AppError> {
    let user = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

/// Creates a user. The UNIQUE constraint on `email` is the authority on
/// duplicates: a concurrent duplicate insert surfaces the same validation
/// error as a plain one, not a database error.
pub async fn create_user(pool: &PgPool, email: &str, name: &str) -> Result<UserRow, AppError> {
    let result = sqlx::query_as::<_, UserRow>(
        "INSERT INTO users (id, email, name) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(name)
    .fetch_one(pool)
    .await;

    match result {
        Ok(user) => Ok(user),
        Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Err(AppError::Validation(
            "A user with this email already exists".to_string(),
        )),
        Err(e) => Err(e.into()),
    }
}

pub async fn update_user_gemini_key(
    pool: &PgPool,
    user_id: Uuid,
    encoded_key: &str,
) -> Result<(), AppError> {
    sqlx::query("UPDATE users SET gemini_api_key = $1, updated_at = now() WHERE id = $2")
        .bind(encoded_key)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(())
}

// ── API tokens (identity collaborator) ──────────────────────────────────────

const TOKEN_TTL_DAYS: i64 = 30;

/// Issues a fresh opaque bearer token for a user.
pub async fn issue_token(pool: &PgPool, user_id: Uuid) -> Result<String, AppError> {
    let token = format!(
        "{}{}",
        Uuid::new_v4().simple(),
        Uuid::new_v4().simple()
    );
    sqlx::query("INSERT INTO api_tokens (token, user_id, expires_at) VALUES ($1, $2, $3)")
        .bind(&token)
        .bind(user_id)
        .bind(Utc::now() + Duration::days(TOKEN_TTL_DAYS))
        .execute(pool)
        .await?;
    Ok(token)
}

/// Resolves a bearer token to a user id, honoring expiry. Expired rows are
/// deleted on sight so the table does not accumulate dead tokens.
pub async fn verify_token(pool: &PgPool, token: &str) -> Result<Option<Uuid>, AppError> {
    let row = sqlx::query_as::<_, ApiTokenRow>("SELECT * FROM api_tokens WHERE token = $1")
        .bind(token)
        .fetch_optional(pool)
        .await?;
    match row {
        Some(row) if row.is_expired(Utc::now()) => {
            sqlx::query("DELETE FROM api_tokens WHERE token = $1")
                .bind(token)
                .execute(pool)
                .await?;
            Ok(None)
        }
        Some(row) => Ok(Some(row.user_id)),
        None => Ok(None),
    }
}

// ── Resumes (single-slot) ───────────────────────────────────────────────────

pub async fn get_user_resume(pool: &PgPool, user_id: Uuid) -> Result<Option<ResumeRow>, AppError> {
    let resume = sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(resume)
}

/// Replaces the user's resume slot: delete+insert in one transaction.
pub async fn replace_resume(pool: &PgPool, new: NewResume) -> Result<ResumeRow, AppError> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM resumes WHERE user_id = $1")
        .bind(new.user_id)
        .execute(&mut *tx)
        .await?;

    let resume = sqlx::query_as::<_, ResumeRow>(
        r#"
        INSERT INTO resumes
            (id, user_id, original_name, file_size, mime_type, extracted_text, extracted_skills)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(new.user_id)
    .bind(&new.original_name)
    .bind(new.file_size)
    .bind(&new.mime_type)
    .bind(&new.extracted_text)
    .bind(Json(Vec::<String>::new()))
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(resume)
}

pub async fn update_resume_skills(
    pool: &PgPool,
    resume_id: Uuid,
    skills: &[String],
) -> Result<(), AppError> {
    sqlx::query("UPDATE resumes SET extracted_skills = $1, updated_at = now() WHERE id = $2")
        .bind(Json(skills))
        .bind(resume_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Flattens the latest profile's sections onto the resume record. A new
/// profile fully supersedes the prior one.
pub async fn update_resume_profile(
    pool: &PgPool,
    resume_id: Uuid,
    profile: &ResumeProfile,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        UPDATE resumes SET
            personal_info = $1,
            career_level = $2,
            skills_analysis = $3,
            project_analysis = $4,
            education = $5,
            career_fit = $6,
            work_preferences = $7,
            salary_insights = $8,
            updated_at = now()
        WHERE id = $9
        "#,
    )
    .bind(Json(&profile.personal_info))
    .bind(Json(&profile.career_level))
    .bind(Json(&profile.skills))
    .bind(Json(&profile.project_analysis))
    .bind(Json(&profile.education))
    .bind(Json(&profile.career_fit))
    .bind(Json(&profile.work_preferences))
    .bind(Json(&profile.salary_insights))
    .bind(resume_id)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn delete_user_resume(pool: &PgPool, user_id: Uuid) -> Result<(), AppError> {
    sqlx::query("DELETE FROM resumes WHERE user_id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(())
}

// ── Analyses (single-slot) ──────────────────────────────────────────────────

pub async fn get_latest_analysis(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Option<AnalysisRow>, AppError> {
    let analysis = sqlx::query_as::<_, AnalysisRow>("SELECT * FROM analyses WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(analysis)
}

/// Job metadata accompanying a pipeline outcome into the analysis slot.
#[derive(Debug)]
pub struct JobMeta {
    pub job_title: String,
    pub company: String,
    pub location: String,
    pub job_url: Option<String>,
    pub job_html: String,
}

/// Replaces the user's analysis slot with a merged pipeline outcome.
/// Legacy columns always; enhanced columns iff the bundle is present;
/// `overall_match` always (model score or legacy fallback).
pub async fn replace_analysis(
    pool: &PgPool,
    user_id: Uuid,
    meta: &JobMeta,
    outcome: &PipelineOutcome,
    resume_skill_count: i32,
) -> Result<AnalysisRow, AppError> {
    let legacy = &outcome.legacy;
    let enhanced = outcome.enhanced.as_ref();
    let job = enhanced.map(|e| &e.job_analysis);

    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM analyses WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    let analysis = sqlx::query_as::<_, AnalysisRow>(
        r#"
        INSERT INTO analyses
            (id, user_id, job_title, company, location, job_url, job_html,
             matched_skills, missing_skills, partial_skills, match_percentage,
             recommendations, skills_by_category, experience_level,
             job_required_skills, job_preferred_skills, job_insights,
             resume_skill_count,
             job_details, requirements, job_characteristics, compensation,
             match_analysis, recommendation, career_growth, risk_assessment,
             comprehensive_report, overall_match, should_apply,
             application_priority, confidence, work_type, employment_type, is_paid)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                $15, $16, $17, $18, $19, $20, $21, $22, $23, $24, $25, $26,
                $27, $28, $29, $30, $31, $32, $33, $34)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(&meta.job_title)
    .bind(&meta.company)
    .bind(&meta.location)
    .bind(&meta.job_url)
    .bind(&meta.job_html)
    .bind(Json(&legacy.matched_skills))
    .bind(Json(&legacy.missing_skills))
    .bind(Json(&legacy.partial_skills))
    .bind(legacy.match_percentage)
    .bind(Json(&legacy.recommendations))
    .bind(Json(&legacy.skills_by_category))
    .bind(&legacy.experience_level)
    .bind(Json(&legacy.job_required_skills))
    .bind(Json(&legacy.job_preferred_skills))
    .bind(Json(&legacy.job_insights))
    .bind(resume_skill_count)
    .bind(job.map(|j| Json(&j.job_details)))
    .bind(job.map(|j| Json(&j.requirements)))
    .bind(job.map(|j| Json(&j.job_characteristics)))
    .bind(job.map(|j| Json(&j.compensation)))
    .bind(job.map(|j| Json(&j.match_analysis)))
    .bind(job.map(|j| Json(&j.recommendation)))
    .bind(job.map(|j| Json(&j.career_growth)))
    .bind(job.map(|j| Json(&j.risk_assessment)))
    .bind(enhanced.map(|e| Json(&e.final_report)))
    .bind(outcome.overall_match())
    .bind(job.map(|j| j.recommendation.should_apply))
    .bind(job.map(|j| j.recommendation.application_priority.as_str()))
    .bind(job.and_then(|j| j.recommendation.confidence))
    .bind(job.and_then(|j| j.job_characteristics.work_type.map(|w| w.as_str())))
    .bind(job.and_then(|j| j.job_characteristics.employment_type.as_deref()))
    .bind(job.map(|j| j.compensation.is_paid))
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(analysis)
}
