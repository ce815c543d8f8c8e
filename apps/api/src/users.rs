//! User management and per-user Gemini credential storage.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::auth::AuthUser;
use crate::crypto::encode_credential;
use crate::errors::AppError;
use crate::models::user::UserRow;
use crate::state::AppState;
use crate::storage;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
}

/// POST /api/users
///
/// Creates a user and issues a bearer token in one step.
pub async fn handle_create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<Json<Value>, AppError> {
    let email = req.email.trim().to_lowercase();
    let name = req.name.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::Validation("A valid email is required".to_string()));
    }
    if name.is_empty() {
        return Err(AppError::Validation("name is required".to_string()));
    }

    // Duplicate emails are rejected by the insert itself; no check-then-insert.
    let user = storage::create_user(&state.db, &email, name).await?;
    let token = storage::issue_token(&state.db, user.id).await?;
    info!("Created user {} ({})", user.id, user.email);

    Ok(Json(json!({
        "user": user,
        "token": token,
    })))
}

/// GET /api/auth/me
pub async fn handle_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<UserRow>, AppError> {
    let user = storage::get_user(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    Ok(Json(user))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetApiKeyRequest {
    #[serde(default)]
    pub api_key: String,
}

/// POST /api/api-key/gemini
pub async fn handle_set_gemini_key(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(req): Json<SetApiKeyRequest>,
) -> Result<Json<Value>, AppError> {
    let key = req.api_key.trim();
    if key.is_empty() {
        return Err(AppError::Validation("apiKey is required".to_string()));
    }
    storage::update_user_gemini_key(&state.db, user_id, &encode_credential(key)).await?;
    Ok(Json(json!({ "message": "Gemini API key saved" })))
}
