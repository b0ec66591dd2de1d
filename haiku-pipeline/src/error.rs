//! Error types for haiku-pipeline HTTP handlers

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::failure::PipelineFailure;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// The run ended without storing a haiku
    #[error(transparent)]
    Pipeline(#[from] PipelineFailure),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Pipeline(failure) => match failure {
                PipelineFailure::Exhausted { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                PipelineFailure::UpstreamUnavailable { cause, .. } if cause.is_timeout() => {
                    StatusCode::GATEWAY_TIMEOUT
                }
                PipelineFailure::UpstreamUnavailable { .. } => StatusCode::BAD_GATEWAY,
                PipelineFailure::StoreUnavailable { .. } | PipelineFailure::Cancelled { .. } => {
                    StatusCode::SERVICE_UNAVAILABLE
                }
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::BadRequest(msg) => json!({
                "error": {
                    "code": "BAD_REQUEST",
                    "message": msg,
                }
            }),
            ApiError::Pipeline(failure) => json!({
                "error": {
                    "code": failure.code(),
                    "message": failure.to_string(),
                    "retryable": failure.is_retryable(),
                },
                "failure": failure,
            }),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
