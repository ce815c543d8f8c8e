use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Pipeline stages fail closed with their own variant; the orchestrator is the
/// single place that decides which failures are fatal versus absorbable.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// A remediation step the user must take first (no resume on file,
    /// Gemini key not configured). Carries an optional machine-readable
    /// `action` the client can branch on.
    #[error("Precondition missing: {message}")]
    PreconditionMissing {
        message: String,
        action: Option<&'static str>,
    },

    /// No skills could be resolved from any source. The client is directed
    /// to run resume analysis first.
    #[error("No skills found in resume")]
    SkillsRequired,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The upstream model call failed or returned non-conforming output.
    #[error("Upstream model error: {0}")]
    UpstreamModel(String),

    /// Parse failure specific to the report-synthesis stage. Distinguished
    /// from `UpstreamModel` because these failures are more often a cut-off
    /// response than a wrong shape; the orchestrator absorbs it.
    #[error("Report generation failed: {0}")]
    ReportGeneration(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn precondition(message: impl Into<String>) -> Self {
        AppError::PreconditionMissing {
            message: message.into(),
            action: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, action) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone(), None),
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone(), None)
            }
            AppError::PreconditionMissing { message, action } => (
                StatusCode::BAD_REQUEST,
                "PRECONDITION_MISSING",
                message.clone(),
                *action,
            ),
            AppError::SkillsRequired => (
                StatusCode::BAD_REQUEST,
                "SKILLS_REQUIRED",
                "No skills found in resume. Please analyze your resume first, then try \
                 analyzing jobs again."
                    .to_string(),
                Some("analyze_resume_required"),
            ),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Authentication required".to_string(),
                None,
            ),
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                    None,
                )
            }
            AppError::UpstreamModel(msg) => {
                tracing::error!("Upstream model error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "ANALYSIS_FAILED",
                    "Analysis failed".to_string(),
                    None,
                )
            }
            AppError::ReportGeneration(msg) => {
                tracing::error!("Report generation error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "REPORT_GENERATION_FAILED",
                    "Report generation failed".to_string(),
                    None,
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                    None,
                )
            }
        };

        let mut error = json!({
            "code": code,
            "message": message
        });
        if let Some(action) = action {
            error["action"] = json!(action);
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}
