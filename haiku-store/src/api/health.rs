//! Health check endpoint

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

use crate::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "ok" when the database answers, "degraded" otherwise
    pub status: String,
    pub module: String,
    pub version: String,
    pub uptime_seconds: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_count: Option<i64>,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let uptime = Utc::now().signed_duration_since(state.startup_time);
    let uptime_seconds = uptime.num_seconds().max(0) as u64;

    let record_count = match state.store.count().await {
        Ok(count) => Some(count),
        Err(e) => {
            tracing::warn!("Health check could not reach database: {}", e);
            None
        }
    };

    Json(HealthResponse {
        status: if record_count.is_some() { "ok" } else { "degraded" }.to_string(),
        module: "haiku-store".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds,
        record_count,
    })
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
