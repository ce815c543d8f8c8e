use reqwest::Client as HttpClient;
use sqlx::PgPool;

use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// There is no shared LLM client here: the Gemini key is per-user and decoded
/// per request, so handlers build a `GeminiClient` from the shared `http`
/// client at the point of use.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub http: HttpClient,
    pub config: Config,
}
