use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    /// Base64-encoded Gemini API key. Never serialized to clients.
    #[serde(skip_serializing)]
    pub gemini_api_key: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Opaque bearer token row — the concrete form of the identity collaborator's
/// `verify(token) -> user_id` mapping.
#[derive(Debug, Clone, FromRow)]
pub struct ApiTokenRow {
    pub token: String,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl ApiTokenRow {
    /// Expired tokens are rejected and reaped at the verification site.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
