use axum::extract::{Multipart, State};
use axum::Json;
use serde_json::{json, Value};
use tracing::info;

use crate::auth::AuthUser;
use crate::docparse;
use crate::errors::AppError;
use crate::models::resume::NewResume;
use crate::state::AppState;
use crate::storage;

/// Upload size cap, matching the original service's limit.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// POST /api/resume/upload
///
/// Accepts one multipart file field, extracts its text and replaces the
/// user's single resume slot. Profile and cached skills start empty; they
/// are filled by the analysis endpoints.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    mut multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    let mut file: Option<(String, String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart payload: {e}")))?
    {
        let name = field.name().unwrap_or_default();
        if name != "resume" && name != "file" {
            continue;
        }
        let original_name = field
            .file_name()
            .unwrap_or("resume")
            .to_string();
        let mime_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
        file = Some((original_name, mime_type, bytes.to_vec()));
        break;
    }

    let (original_name, mime_type, bytes) =
        file.ok_or_else(|| AppError::Validation("No resume file uploaded".to_string()))?;

    if bytes.is_empty() {
        return Err(AppError::Validation("Uploaded file is empty".to_string()));
    }
    if bytes.len() > MAX_UPLOAD_BYTES {
        return Err(AppError::Validation(
            "File too large. Maximum size is 5MB.".to_string(),
        ));
    }

    let file_size = bytes.len() as i64;
    let extracted_text = docparse::extract_text(&mime_type, bytes).await?;
    if extracted_text.trim().is_empty() {
        return Err(AppError::Validation(
            "Could not extract any text from the uploaded resume".to_string(),
        ));
    }

    let resume = storage::replace_resume(
        &state.db,
        NewResume {
            user_id,
            original_name,
            file_size,
            mime_type,
            extracted_text,
        },
    )
    .await?;

    info!(
        "Resume uploaded for user {user_id}: {} ({} bytes)",
        resume.original_name, resume.file_size
    );

    Ok(Json(json!({
        "message": "Resume uploaded successfully",
        "resume": {
            "id": resume.id,
            "originalName": resume.original_name,
            "fileSize": resume.file_size,
            "mimeType": resume.mime_type,
            "uploadedAt": resume.uploaded_at,
        }
    })))
}

/// GET /api/resume
pub async fn handle_get_resume(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Value>, AppError> {
    let resume = storage::get_user_resume(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("No resume found".to_string()))?;

    Ok(Json(json!({
        "id": resume.id,
        "originalName": resume.original_name,
        "fileSize": resume.file_size,
        "mimeType": resume.mime_type,
        "extractedSkills": resume.extracted_skills.0,
        "hasProfile": resume.has_profile(),
        "uploadedAt": resume.uploaded_at,
        "updatedAt": resume.updated_at,
    })))
}

/// DELETE /api/resume
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Value>, AppError> {
    storage::delete_user_resume(&state.db, user_id).await?;
    Ok(Json(json!({ "message": "Resume deleted" })))
}
