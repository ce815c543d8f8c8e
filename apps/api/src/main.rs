mod analysis;
mod auth;
mod config;
mod crypto;
mod db;
mod docparse;
mod errors;
mod llm_client;
mod models;
mod resume;
mod routes;
mod state;
mod storage;
mod users;

use anyhow::Result;
use std::net::SocketAddr;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::routes::build_router;
use crate::state::AppState;

/// Outer HTTP timeout for outbound Gemini calls. Individual pipeline stages
/// apply their own 90s deadline; this is the hard transport ceiling.
const HTTP_CLIENT_TIMEOUT: Duration = Duration::from_secs(120);

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (panics on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting SkillGap API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    info!("Database pool initialized");

    // Shared outbound HTTP client; per-user Gemini clients are built from it
    // at the point of use.
    let http = reqwest::Client::builder()
        .timeout(HTTP_CLIENT_TIMEOUT)
        .build()?;
    info!(
        "HTTP client initialized (model: {}, base: {})",
        llm_client::MODEL,
        config.gemini_api_base
    );

    // Build app state
    let state = AppState {
        db,
        http,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
