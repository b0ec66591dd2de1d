//! HTTP clients for the pipeline's collaborators
//!
//! All clients share one error mapping: transport failures become
//! `Timeout` or `Unreachable`, non-success statuses become `Rejected`,
//! and undecodable bodies become `Malformed`.

mod generator;
mod store;
mod validator;

pub use generator::HttpGenerator;
pub use store::HttpHaikuStore;
pub use validator::HttpValidator;

use haiku_common::UpstreamError;
use std::time::Duration;

const USER_AGENT: &str = concat!("haiku-pipeline/", env!("CARGO_PKG_VERSION"));

/// Build a reqwest client with a whole-request timeout
pub(crate) fn build_http_client(timeout: Duration) -> Result<reqwest::Client, UpstreamError> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(|e| UpstreamError::unreachable(format!("failed to build HTTP client: {e}")))
}

/// Classify a transport-level reqwest failure
pub(crate) fn classify_transport_error(target: &str, err: reqwest::Error) -> UpstreamError {
    if err.is_timeout() {
        UpstreamError::timeout(format!("{target}: {err}"))
    } else if err.is_decode() {
        UpstreamError::malformed(format!("{target}: {err}"))
    } else if let Some(status) = err.status() {
        UpstreamError::rejected(status.as_u16(), format!("{target}: {err}"))
    } else {
        UpstreamError::unreachable(format!("{target}: {err}"))
    }
}

/// Turn a non-success response into `Rejected`, keeping the body text
pub(crate) async fn rejection(target: &str, response: reqwest::Response) -> UpstreamError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    UpstreamError::rejected(status, format!("{target}: {body}"))
}

/// Decode a JSON body, mapping failures to `Malformed` (or `Timeout` if the
/// body stalled)
pub(crate) async fn decode_json<T: serde::de::DeserializeOwned>(
    target: &str,
    response: reqwest::Response,
) -> Result<T, UpstreamError> {
    let bytes = response
        .bytes()
        .await
        .map_err(|e| classify_transport_error(target, e))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| UpstreamError::malformed(format!("{target}: {e}")))
}

/// Join a base URL and a path without doubling the slash
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_url() {
        assert_eq!(
            join_url("http://127.0.0.1:8075/", "/api/haikus"),
            "http://127.0.0.1:8075/api/haikus"
        );
        assert_eq!(
            join_url("http://127.0.0.1:8075", "api/haikus"),
            "http://127.0.0.1:8075/api/haikus"
        );
    }

    #[test]
    fn test_client_creation() {
        assert!(build_http_client(Duration::from_secs(5)).is_ok());
    }
}
