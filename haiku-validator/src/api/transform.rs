//! Haiku text utilities endpoint

use axum::{extract::rejection::JsonRejection, routing::post, Json, Router};
use haiku_common::transform::TransformCommand;
use serde::{Deserialize, Serialize};

use crate::error::ApiResult;
use crate::AppState;

/// Transform request body
#[derive(Debug, Deserialize)]
pub struct TransformRequest {
    /// `louder`, `quieter`, `spooky` or `choppy`
    pub command: String,
    pub text: String,
}

/// Transform response body
#[derive(Debug, Serialize)]
pub struct TransformResponse {
    pub command: TransformCommand,
    pub text: String,
}

/// POST /api/transform
pub async fn transform_haiku(
    payload: Result<Json<TransformRequest>, JsonRejection>,
) -> ApiResult<Json<TransformResponse>> {
    let Json(request) = payload?;
    let command: TransformCommand = request.command.parse()?;
    Ok(Json(TransformResponse {
        command,
        text: command.apply(&request.text),
    }))
}

/// Build transform routes
pub fn transform_routes() -> Router<AppState> {
    Router::new().route("/api/transform", post(transform_haiku))
}
