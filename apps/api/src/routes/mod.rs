pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis_handlers;
use crate::resume::handlers as resume_handlers;
use crate::state::AppState;
use crate::users;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Users & auth
        .route("/api/users", post(users::handle_create_user))
        .route("/api/auth/me", get(users::handle_me))
        .route("/api/api-key/gemini", post(users::handle_set_gemini_key))
        // Resume slot
        .route("/api/resume/upload", post(resume_handlers::handle_upload_resume))
        .route(
            "/api/resume",
            get(resume_handlers::handle_get_resume).delete(resume_handlers::handle_delete_resume),
        )
        .route(
            "/api/resume/profile",
            get(analysis_handlers::handle_resume_profile),
        )
        // Analysis pipeline
        .route(
            "/api/resume/analyze",
            post(analysis_handlers::handle_analyze_resume),
        )
        .route(
            "/api/analysis/job",
            post(analysis_handlers::handle_analyze_job),
        )
        .route(
            "/api/analysis/latest",
            get(analysis_handlers::handle_latest_analysis),
        )
        .route(
            "/api/analysis/comprehensive",
            get(analysis_handlers::handle_comprehensive_analysis),
        )
        .with_state(state)
}
