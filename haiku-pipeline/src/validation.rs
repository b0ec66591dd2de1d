//! Validator capability
//!
//! Validation is pure, so the in-process [`LocalValidator`] is the default.
//! A remote validator service can be swapped in through the same trait.

use async_trait::async_trait;
use haiku_common::validator;
use haiku_common::{HaikuCandidate, UpstreamError, ValidationVerdict};

/// Judges whether a candidate is a structurally valid haiku
#[async_trait]
pub trait HaikuValidator: Send + Sync {
    async fn validate(&self, candidate: &HaikuCandidate) -> Result<ValidationVerdict, UpstreamError>;
}

/// Validates in-process with the shared syllable heuristic; never fails
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalValidator;

#[async_trait]
impl HaikuValidator for LocalValidator {
    async fn validate(&self, candidate: &HaikuCandidate) -> Result<ValidationVerdict, UpstreamError> {
        Ok(validator::validate(candidate))
    }
}
