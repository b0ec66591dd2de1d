//! Generator capability
//!
//! A generator turns an attempt number, an optional topic and the previous
//! attempt's feedback into a candidate. Implementations are free to be
//! non-deterministic; the orchestrator never assumes two calls agree.

use async_trait::async_trait;
use haiku_common::{GenerationFeedback, HaikuCandidate, UpstreamError};
use serde::{Deserialize, Serialize};

/// Input for one generation attempt
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// 1-based attempt number within the run
    pub attempt: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    /// Why the previous attempt failed; `None` on the first attempt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<GenerationFeedback>,
}

impl GenerationRequest {
    /// Prompt-ready hint derived from the feedback
    pub fn hint(&self) -> Option<String> {
        self.feedback.as_ref().map(GenerationFeedback::summary)
    }
}

/// Source of candidate haiku
#[async_trait]
pub trait HaikuGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<HaikuCandidate, UpstreamError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use haiku_common::validator::validate;

    #[test]
    fn test_first_request_has_no_hint() {
        let request = GenerationRequest {
            attempt: 1,
            ..Default::default()
        };
        assert!(request.hint().is_none());

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json, serde_json::json!({ "attempt": 1 }));
    }

    #[test]
    fn test_hint_names_mismatched_lines() {
        let verdict = validate(&HaikuCandidate::new(["one two three", "four", "five six"]));
        let request = GenerationRequest {
            attempt: 2,
            topic: Some("autumn".to_string()),
            feedback: Some(verdict.feedback()),
        };

        let hint = request.hint().unwrap();
        assert!(hint.contains("line 1 has 3 syllables instead of 5"));
        assert!(hint.contains("line 2 has 1 syllables instead of 7"));
    }
}
