//! HTTP API handlers for haiku-pipeline

pub mod generate;
pub mod health;

pub use generate::{generate_haiku, generate_routes, GenerateRequest, MAX_ATTEMPTS_LIMIT};
pub use health::health_routes;
