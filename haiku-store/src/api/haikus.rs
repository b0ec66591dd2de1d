//! Haiku CRUD and search endpoints
//!
//! - `POST   /api/haikus`           create from three lines
//! - `GET    /api/haikus`           list, `limit`/`offset`
//! - `GET    /api/haikus/search`    text search, `q`/`limit`/`offset`
//! - `GET    /api/haikus/:id`       fetch one
//! - `DELETE /api/haikus/:id`       delete one

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use haiku_common::{HaikuId, HaikuRecord, HaikuStore, LINE_COUNT};
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::pagination::DEFAULT_LIMIT;
use crate::AppState;

/// Request body for creating a haiku
#[derive(Debug, Deserialize)]
pub struct CreateHaikuRequest {
    pub lines: Vec<String>,
}

/// Query parameters for listing
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

/// Query parameters for text search
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

/// Ids that do not parse cannot exist in the store
fn parse_id(raw: &str) -> ApiResult<HaikuId> {
    raw.parse()
        .map_err(|_| ApiError::NotFound(format!("haiku {raw}")))
}

/// POST /api/haikus
pub async fn create_haiku(
    State(state): State<AppState>,
    payload: Result<Json<CreateHaikuRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<HaikuRecord>)> {
    let Json(request) = payload?;
    let line_count = request.lines.len();
    let lines: [String; LINE_COUNT] = request.lines.try_into().map_err(|_| {
        ApiError::BadRequest(format!("expected {LINE_COUNT} lines, got {line_count}"))
    })?;

    let record = state.store.create(lines).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /api/haikus
pub async fn list_haikus(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<HaikuRecord>>> {
    let Query(query) = query?;
    let records = state.store.list(query.limit, query.offset).await?;
    Ok(Json(records))
}

/// GET /api/haikus/search
pub async fn search_haikus(
    State(state): State<AppState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<HaikuRecord>>> {
    let Query(query) = query?;
    let records = state.store.search(&query.q, query.limit, query.offset).await?;
    Ok(Json(records))
}

/// GET /api/haikus/:id
pub async fn get_haiku(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<HaikuRecord>> {
    let id = parse_id(&id)?;
    let record = state.store.get(id).await?;
    Ok(Json(record))
}

/// DELETE /api/haikus/:id
pub async fn delete_haiku(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&id)?;
    state.store.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Build haiku routes
pub fn haiku_routes() -> Router<AppState> {
    Router::new()
        .route("/api/haikus", get(list_haikus).post(create_haiku))
        .route("/api/haikus/search", get(search_haikus))
        .route("/api/haikus/:id", get(get_haiku).delete(delete_haiku))
}
