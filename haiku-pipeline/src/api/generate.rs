//! Pipeline run endpoint

use axum::{body::Bytes, extract::State, http::StatusCode, routing::post, Json, Router};
use haiku_common::HaikuRecord;
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::orchestrator::RunOptions;
use crate::AppState;

/// Largest attempt budget a single request may ask for
pub const MAX_ATTEMPTS_LIMIT: u32 = 10;

/// Request body for a pipeline run
#[derive(Debug, Default, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub max_attempts: Option<u32>,
    #[serde(default)]
    pub topic: Option<String>,
}

impl GenerateRequest {
    /// Every field is optional, so an empty body means all defaults
    pub fn from_body(body: &[u8]) -> ApiResult<Self> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body)
            .map_err(|e| ApiError::BadRequest(format!("Invalid JSON body: {e}")))
    }
}

/// POST /api/generate
///
/// Runs the pipeline to completion and answers 201 with the stored record.
/// Failures carry the full failure report in the body.
pub async fn generate_haiku(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<HaikuRecord>)> {
    let request = GenerateRequest::from_body(&body)?;
    let max_attempts = request.max_attempts.unwrap_or(state.default_max_attempts);
    if max_attempts == 0 || max_attempts > MAX_ATTEMPTS_LIMIT {
        return Err(ApiError::BadRequest(format!(
            "max_attempts must be between 1 and {MAX_ATTEMPTS_LIMIT}, got {max_attempts}"
        )));
    }

    let mut options = RunOptions::new(max_attempts);
    if let Some(topic) = request.topic.filter(|t| !t.trim().is_empty()) {
        options = options.with_topic(topic.trim());
    }

    let cancel = state.shutdown.child_token();
    let record = state.orchestrator.run_with(options, &cancel).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Build pipeline routes
pub fn generate_routes() -> Router<AppState> {
    Router::new().route("/api/generate", post(generate_haiku))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_body_means_defaults() {
        for body in [&b""[..], &b"  \n"[..]] {
            let request = GenerateRequest::from_body(body).unwrap();
            assert!(request.max_attempts.is_none());
            assert!(request.topic.is_none());
        }
    }

    #[test]
    fn test_body_fields() {
        let request = GenerateRequest::from_body(br#"{"max_attempts": 2, "topic": "rain"}"#).unwrap();
        assert_eq!(request.max_attempts, Some(2));
        assert_eq!(request.topic.as_deref(), Some("rain"));
    }

    #[test]
    fn test_malformed_body_is_bad_request() {
        let err = GenerateRequest::from_body(b"{not json").unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }
}
