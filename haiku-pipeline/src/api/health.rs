//! Health check endpoint

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

use crate::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "ok" while serving, "shutting_down" once cancellation started
    pub status: String,
    pub module: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub default_max_attempts: u32,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let uptime = Utc::now().signed_duration_since(state.startup_time);

    Json(HealthResponse {
        status: if state.shutdown.is_cancelled() {
            "shutting_down"
        } else {
            "ok"
        }
        .to_string(),
        module: "haiku-pipeline".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: uptime.num_seconds().max(0) as u64,
        default_max_attempts: state.default_max_attempts,
    })
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
