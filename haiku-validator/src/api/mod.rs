//! HTTP API handlers for haiku-validator

pub mod health;
pub mod transform;
pub mod validate;

pub use health::health_routes;
pub use transform::{transform_routes, TransformRequest, TransformResponse};
pub use validate::{validate_routes, ValidateRequest};
