//! Failures talking to a collaborator service (generator, validator, store)

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Classification of a failed call to another service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UpstreamErrorKind {
    /// No answer within the configured timeout
    Timeout,
    /// Connection refused, DNS failure, dropped connection
    Unreachable,
    /// The service answered with a non-success status
    Rejected { status: u16 },
    /// The service answered 2xx but the body could not be understood
    Malformed,
}

impl fmt::Display for UpstreamErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "timed out"),
            Self::Unreachable => write!(f, "unreachable"),
            Self::Rejected { status } => write!(f, "rejected with status {status}"),
            Self::Malformed => write!(f, "malformed response"),
        }
    }
}

/// A failed collaborator call with enough context to decide on a retry
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{kind}: {message}")]
pub struct UpstreamError {
    pub kind: UpstreamErrorKind,
    pub message: String,
}

impl UpstreamError {
    pub fn new(kind: UpstreamErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(UpstreamErrorKind::Timeout, message)
    }

    pub fn unreachable(message: impl Into<String>) -> Self {
        Self::new(UpstreamErrorKind::Unreachable, message)
    }

    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::new(UpstreamErrorKind::Rejected { status }, message)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(UpstreamErrorKind::Malformed, message)
    }

    pub fn is_timeout(&self) -> bool {
        self.kind == UpstreamErrorKind::Timeout
    }

    /// Whether repeating the same request later may succeed.
    ///
    /// Timeouts, connection failures, 429 and 5xx are transient; other
    /// rejections and malformed bodies will fail the same way again.
    pub fn is_retryable(&self) -> bool {
        match self.kind {
            UpstreamErrorKind::Timeout | UpstreamErrorKind::Unreachable => true,
            UpstreamErrorKind::Rejected { status } => status == 429 || status >= 500,
            UpstreamErrorKind::Malformed => false,
        }
    }
}
