//! Structural validation endpoint
//!
//! `POST /api/validate` accepts `{"lines": [...]}` or `{"text": "..."}`.
//! An invalid haiku is still a successful call: the verdict says why.

use axum::{extract::rejection::JsonRejection, routing::post, Json, Router};
use haiku_common::validator::validate;
use haiku_common::{HaikuCandidate, ValidationVerdict};
use serde::Deserialize;

use crate::error::ApiResult;
use crate::AppState;

/// Validation request body
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ValidateRequest {
    Lines { lines: Vec<String> },
    Text { text: String },
}

impl ValidateRequest {
    pub fn into_candidate(self) -> HaikuCandidate {
        match self {
            ValidateRequest::Lines { lines } => HaikuCandidate::new(lines),
            ValidateRequest::Text { text } => HaikuCandidate::from_text(&text),
        }
    }
}

/// POST /api/validate
pub async fn validate_haiku(
    payload: Result<Json<ValidateRequest>, JsonRejection>,
) -> ApiResult<Json<ValidationVerdict>> {
    let Json(request) = payload?;
    let candidate = request.into_candidate();
    let verdict = validate(&candidate);
    tracing::debug!(
        valid = verdict.valid,
        reason = ?verdict.reason,
        counts = ?verdict.per_line_counts,
        "Validated candidate"
    );
    Ok(Json(verdict))
}

/// Build validation routes
pub fn validate_routes() -> Router<AppState> {
    Router::new().route("/api/validate", post(validate_haiku))
}
