//! Terminal failure states of a pipeline run
//!
//! Every failure names its cause. Structural failures only surface after
//! the retry budget is spent; connectivity failures end the run at once.

use haiku_common::{HaikuCandidate, HaikuLines, UpstreamError, ValidationVerdict};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Collaborator that failed before a verdict could be reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Generator,
    Validator,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Generator => write!(f, "generator"),
            Stage::Validator => write!(f, "validator"),
        }
    }
}

/// Why a pipeline run did not produce a stored haiku
#[derive(Debug, Clone, Error, Serialize)]
#[serde(tag = "failure", rename_all = "snake_case")]
pub enum PipelineFailure {
    /// Generator or validator unreachable, timed out or errored
    #[error("{stage} unavailable on attempt {attempts}: {cause}")]
    UpstreamUnavailable {
        stage: Stage,
        attempts: u32,
        cause: UpstreamError,
    },

    /// Every attempt produced a structurally invalid candidate
    #[error("no valid haiku after {attempts} attempt(s)")]
    Exhausted {
        attempts: u32,
        last_candidate: HaikuCandidate,
        last_verdict: ValidationVerdict,
    },

    /// A valid haiku was produced but could not be persisted. The lines
    /// are kept so the caller can retry the write without regenerating.
    #[error("store unavailable while persisting a valid haiku: {cause}")]
    StoreUnavailable {
        attempts: u32,
        lines: HaikuLines,
        syllable_counts: [u32; 3],
        cause: UpstreamError,
    },

    /// Cancelled at an attempt boundary
    #[error("run cancelled after {attempts} attempt(s)")]
    Cancelled { attempts: u32 },
}

impl PipelineFailure {
    /// Attempts started before the run ended
    pub fn attempts(&self) -> u32 {
        match self {
            Self::UpstreamUnavailable { attempts, .. }
            | Self::Exhausted { attempts, .. }
            | Self::StoreUnavailable { attempts, .. }
            | Self::Cancelled { attempts } => *attempts,
        }
    }

    /// Whether running the same request again could succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::UpstreamUnavailable { cause, .. } | Self::StoreUnavailable { cause, .. } => {
                cause.is_retryable()
            }
            // Generation is non-deterministic, a fresh run may well pass
            Self::Exhausted { .. } => true,
            Self::Cancelled { .. } => true,
        }
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            Self::UpstreamUnavailable { cause, .. } if cause.is_timeout() => "UPSTREAM_TIMEOUT",
            Self::UpstreamUnavailable { .. } => "UPSTREAM_UNAVAILABLE",
            Self::Exhausted { .. } => "EXHAUSTED",
            Self::StoreUnavailable { .. } => "STORE_UNAVAILABLE",
            Self::Cancelled { .. } => "CANCELLED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use haiku_common::validator::validate;

    #[test]
    fn test_codes_and_retryability() {
        let timeout = PipelineFailure::UpstreamUnavailable {
            stage: Stage::Generator,
            attempts: 1,
            cause: UpstreamError::timeout("slow"),
        };
        assert_eq!(timeout.code(), "UPSTREAM_TIMEOUT");
        assert!(timeout.is_retryable());

        let rejected = PipelineFailure::UpstreamUnavailable {
            stage: Stage::Validator,
            attempts: 2,
            cause: UpstreamError::rejected(400, "bad request"),
        };
        assert_eq!(rejected.code(), "UPSTREAM_UNAVAILABLE");
        assert!(!rejected.is_retryable());
        assert_eq!(rejected.attempts(), 2);
        assert_eq!(
            rejected.to_string(),
            "validator unavailable on attempt 2: rejected with status 400: bad request"
        );
    }

    #[test]
    fn test_exhausted_serializes_last_verdict() {
        let candidate = HaikuCandidate::new(["too short"]);
        let failure = PipelineFailure::Exhausted {
            attempts: 3,
            last_verdict: validate(&candidate),
            last_candidate: candidate,
        };

        let value = serde_json::to_value(&failure).unwrap();
        assert_eq!(value["failure"], "exhausted");
        assert_eq!(value["attempts"], 3);
        assert_eq!(value["last_verdict"]["reason"], "wrong_line_count");
        assert_eq!(value["last_candidate"]["lines"][0], "too short");
    }
}
