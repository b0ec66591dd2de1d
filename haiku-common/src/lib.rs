//! # Haiku Common Library
//!
//! Shared code for all haiku microservices including:
//! - Haiku data model (candidates, verdicts, records)
//! - Syllable estimation and 5-7-5 structure validation
//! - The store contract implemented by local and remote stores
//! - Text utilities (louder, quieter, spooky, choppy)
//! - Configuration loading, logging bootstrap and shutdown signalling

pub mod config;
pub mod error;
pub mod models;
pub mod shutdown;
pub mod store;
pub mod syllables;
pub mod time;
pub mod transform;
pub mod upstream;
pub mod validator;

pub use error::{Error, Result};
pub use models::{
    CandidateMetadata, GenerationFeedback, HaikuCandidate, HaikuId, HaikuLines, HaikuRecord,
    LineMismatch, ValidationVerdict, VerdictReason, ATTEMPT_KEY, EXPECTED_SYLLABLES, LINE_COUNT,
};
pub use store::{HaikuStore, StoreError, StoreResult};
pub use upstream::{UpstreamError, UpstreamErrorKind};
