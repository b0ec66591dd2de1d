//! Remote store client for the haiku-store service
//!
//! 404 maps to `NotFound` and 400 to `InvalidInput`; everything else that
//! is not a success becomes `Unavailable` with the classified cause.

use async_trait::async_trait;
use haiku_common::{
    HaikuId, HaikuLines, HaikuRecord, HaikuStore, StoreError, StoreResult, UpstreamError,
};
use reqwest::StatusCode;
use serde::Serialize;
use std::time::Duration;

use super::{build_http_client, classify_transport_error, decode_json, join_url, rejection};

const TARGET: &str = "store";

#[derive(Debug, Serialize)]
struct CreatePayload<'a> {
    lines: &'a HaikuLines,
}

/// [`HaikuStore`] implemented over the store service's REST API
pub struct HttpHaikuStore {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpHaikuStore {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, UpstreamError> {
        Ok(Self {
            http_client: build_http_client(timeout)?,
            base_url: base_url.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> StoreResult<reqwest::Response> {
        request
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(classify_transport_error(TARGET, e)))
    }
}

/// Map a non-success response; `missing` names the id for 404s
async fn failure(response: reqwest::Response, missing: Option<HaikuId>) -> StoreError {
    match (response.status(), missing) {
        (StatusCode::NOT_FOUND, Some(id)) => StoreError::not_found(id),
        (StatusCode::BAD_REQUEST, _) => {
            StoreError::InvalidInput(response.text().await.unwrap_or_default())
        }
        _ => StoreError::Unavailable(rejection(TARGET, response).await),
    }
}

#[async_trait]
impl HaikuStore for HttpHaikuStore {
    async fn create(&self, lines: HaikuLines) -> StoreResult<HaikuRecord> {
        let request = self
            .http_client
            .post(self.url("/api/haikus"))
            .json(&CreatePayload { lines: &lines });
        let response = self.send(request).await?;

        if !response.status().is_success() {
            return Err(failure(response, None).await);
        }

        let record: HaikuRecord = decode_json(TARGET, response)
            .await
            .map_err(StoreError::Unavailable)?;
        tracing::debug!(id = %record.id, "Remote store created haiku");
        Ok(record)
    }

    async fn get(&self, id: HaikuId) -> StoreResult<HaikuRecord> {
        let request = self.http_client.get(self.url(&format!("/api/haikus/{id}")));
        let response = self.send(request).await?;

        if !response.status().is_success() {
            return Err(failure(response, Some(id)).await);
        }

        decode_json(TARGET, response)
            .await
            .map_err(StoreError::Unavailable)
    }

    async fn list(&self, limit: i64, offset: i64) -> StoreResult<Vec<HaikuRecord>> {
        let request = self
            .http_client
            .get(self.url("/api/haikus"))
            .query(&[("limit", limit), ("offset", offset)]);
        let response = self.send(request).await?;

        if !response.status().is_success() {
            return Err(failure(response, None).await);
        }

        decode_json(TARGET, response)
            .await
            .map_err(StoreError::Unavailable)
    }

    async fn delete(&self, id: HaikuId) -> StoreResult<()> {
        let request = self.http_client.delete(self.url(&format!("/api/haikus/{id}")));
        let response = self.send(request).await?;

        if !response.status().is_success() {
            return Err(failure(response, Some(id)).await);
        }
        Ok(())
    }
}
