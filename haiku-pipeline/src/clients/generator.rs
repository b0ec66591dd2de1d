//! Remote generator client
//!
//! Wire contract: `POST {url}` with `{"attempt", "topic", "feedback",
//! "hint"}`; the service answers `{"lines": [...]}` or `{"text": "..."}`.
//! Text answers may be wrapped in a Markdown code fence.

use async_trait::async_trait;
use haiku_common::{GenerationFeedback, HaikuCandidate, UpstreamError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{build_http_client, classify_transport_error, decode_json, rejection};
use crate::generator::{GenerationRequest, HaikuGenerator};

const TARGET: &str = "generator";

#[derive(Debug, Serialize)]
struct GeneratePayload<'a> {
    attempt: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    topic: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    feedback: Option<&'a GenerationFeedback>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hint: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GenerateResponse {
    Lines { lines: Vec<String> },
    Text { text: String },
}

impl GenerateResponse {
    fn into_candidate(self) -> HaikuCandidate {
        match self {
            Self::Lines { lines } => HaikuCandidate::new(lines.iter().map(|l| l.trim())),
            Self::Text { text } => HaikuCandidate::from_text(&text),
        }
    }
}

/// Generator reached over HTTP
pub struct HttpGenerator {
    http_client: reqwest::Client,
    url: String,
}

impl HttpGenerator {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, UpstreamError> {
        Ok(Self {
            http_client: build_http_client(timeout)?,
            url: url.into(),
        })
    }
}

#[async_trait]
impl HaikuGenerator for HttpGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<HaikuCandidate, UpstreamError> {
        let payload = GeneratePayload {
            attempt: request.attempt,
            topic: request.topic.as_deref(),
            feedback: request.feedback.as_ref(),
            hint: request.hint(),
        };

        tracing::debug!(url = %self.url, attempt = request.attempt, "Requesting candidate");

        let response = self
            .http_client
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| classify_transport_error(TARGET, e))?;

        if !response.status().is_success() {
            return Err(rejection(TARGET, response).await);
        }

        let body: GenerateResponse = decode_json(TARGET, response).await?;
        Ok(body
            .into_candidate()
            .with_metadata("generator", self.url.clone()))
    }
}
