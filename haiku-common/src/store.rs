//! The haiku store contract
//!
//! Implemented in-process by the SQLite store and over HTTP by the
//! pipeline's remote client. Callers never coordinate identifier
//! assignment; the store guarantees uniqueness itself.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{HaikuId, HaikuLines, HaikuRecord};
use crate::upstream::UpstreamError;

/// Store operation result
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Store operation errors
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// No record with this id; a normal negative result, not a failure
    #[error("Haiku not found: {0}")]
    NotFound(String),

    /// The request itself was unacceptable
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Backing medium unreachable or the write failed
    #[error("Store unavailable: {0}")]
    Unavailable(UpstreamError),
}

impl StoreError {
    pub fn not_found(id: HaikuId) -> Self {
        Self::NotFound(id.to_string())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::NotFound("row not found".to_string()),
            sqlx::Error::PoolTimedOut => Self::Unavailable(UpstreamError::timeout(err.to_string())),
            other => Self::Unavailable(UpstreamError::unreachable(other.to_string())),
        }
    }
}

/// Durable, concurrency-safe haiku persistence
#[async_trait]
pub trait HaikuStore: Send + Sync {
    /// Persist three lines as a new record with a fresh id.
    ///
    /// Does not re-validate structure; callers validate first.
    async fn create(&self, lines: HaikuLines) -> StoreResult<HaikuRecord>;

    async fn get(&self, id: HaikuId) -> StoreResult<HaikuRecord>;

    /// Records ordered by creation time, oldest first
    async fn list(&self, limit: i64, offset: i64) -> StoreResult<Vec<HaikuRecord>>;

    async fn delete(&self, id: HaikuId) -> StoreResult<()>;
}
