//! haiku-pipeline library - generation/validation/persistence orchestration
//!
//! The orchestrator drives a candidate from an external generator through
//! structural validation, retrying with feedback up to a bound, and
//! persists the first valid haiku. Generator, validator and store are
//! capability traits; HTTP clients for each live in [`clients`].

use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod clients;
pub mod config;
pub mod error;
pub mod failure;
pub mod generator;
pub mod orchestrator;
pub mod validation;

pub use crate::error::{ApiError, ApiResult};
pub use crate::failure::{PipelineFailure, Stage};
pub use crate::generator::{GenerationRequest, HaikuGenerator};
pub use crate::orchestrator::{
    AttemptOutcome, PipelineAttempt, PipelineOrchestrator, PipelineState, RunOptions, Timeouts,
};
pub use crate::validation::{HaikuValidator, LocalValidator};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<PipelineOrchestrator>,
    /// Attempts per run when the request does not say
    pub default_max_attempts: u32,
    /// Cancelled on shutdown; every run watches a child of it
    pub shutdown: CancellationToken,
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(orchestrator: PipelineOrchestrator, default_max_attempts: u32) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            default_max_attempts,
            shutdown: CancellationToken::new(),
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::generate_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
