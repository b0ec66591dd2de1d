//! Remote validator client for the haiku-validator service

use async_trait::async_trait;
use haiku_common::{HaikuCandidate, UpstreamError, ValidationVerdict};
use serde::Serialize;
use std::time::Duration;

use super::{build_http_client, classify_transport_error, decode_json, join_url, rejection};
use crate::validation::HaikuValidator;

const TARGET: &str = "validator";

#[derive(Debug, Serialize)]
struct ValidatePayload<'a> {
    lines: &'a [String],
}

/// Validator reached over HTTP at `{base_url}/api/validate`
pub struct HttpValidator {
    http_client: reqwest::Client,
    url: String,
}

impl HttpValidator {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, UpstreamError> {
        Ok(Self {
            http_client: build_http_client(timeout)?,
            url: join_url(base_url, "/api/validate"),
        })
    }
}

#[async_trait]
impl HaikuValidator for HttpValidator {
    async fn validate(&self, candidate: &HaikuCandidate) -> Result<ValidationVerdict, UpstreamError> {
        let response = self
            .http_client
            .post(&self.url)
            .json(&ValidatePayload {
                lines: &candidate.lines,
            })
            .send()
            .await
            .map_err(|e| classify_transport_error(TARGET, e))?;

        if !response.status().is_success() {
            return Err(rejection(TARGET, response).await);
        }

        decode_json(TARGET, response).await
    }
}
