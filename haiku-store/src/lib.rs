//! haiku-store library - durable haiku persistence
//!
//! SQLite-backed implementation of the [`HaikuStore`](haiku_common::HaikuStore)
//! contract plus the HTTP surface that exposes it to other services.

use axum::Router;
use chrono::{DateTime, Utc};
use tower_http::trace::TraceLayer;

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod pagination;
pub mod store;

pub use crate::error::{ApiError, ApiResult};
pub use crate::store::SqliteHaikuStore;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub store: SqliteHaikuStore,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(store: SqliteHaikuStore) -> Self {
        Self {
            store,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::haiku_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
