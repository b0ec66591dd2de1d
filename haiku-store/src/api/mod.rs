//! HTTP API handlers for haiku-store

pub mod haikus;
pub mod health;

pub use haikus::{
    create_haiku, delete_haiku, get_haiku, haiku_routes, list_haikus, search_haikus,
    CreateHaikuRequest, ListQuery, SearchQuery,
};
pub use health::health_routes;
