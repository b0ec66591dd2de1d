//! HTTP clients against live services on ephemeral ports
//!
//! The store and validator are the real services; the generator is a
//! small axum stub standing in for an LLM-backed endpoint.

mod helpers;

use axum::{http::StatusCode, routing::post, Json, Router};
use haiku_common::{
    HaikuCandidate, HaikuId, HaikuStore, StoreError, UpstreamErrorKind, VerdictReason,
};
use haiku_pipeline::clients::{HttpGenerator, HttpHaikuStore, HttpValidator};
use haiku_pipeline::{
    GenerationRequest, HaikuGenerator, HaikuValidator, PipelineFailure, PipelineOrchestrator,
    Stage,
};
use helpers::*;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(5);

fn lines(parts: [&str; 3]) -> [String; 3] {
    parts.map(String::from)
}

async fn store_service() -> (tempfile::TempDir, String) {
    let (dir, store) = sqlite_store().await;
    let url = spawn_server(haiku_store::build_router(haiku_store::AppState::new(store))).await;
    (dir, url)
}

async fn validator_service() -> String {
    spawn_server(haiku_validator::build_router(
        haiku_validator::AppState::default(),
    ))
    .await
}

/// Generator stub answering every request with a fixed body, recording
/// what it was sent
async fn generator_service(status: StatusCode, body: Value) -> (String, Arc<Mutex<Vec<Value>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorder = seen.clone();
    let app = Router::new().route(
        "/generate",
        post(move |Json(payload): Json<Value>| {
            let recorder = recorder.clone();
            let body = body.clone();
            async move {
                recorder.lock().unwrap().push(payload);
                (status, Json(body))
            }
        }),
    );
    let base = spawn_server(app).await;
    (format!("{base}/generate"), seen)
}

#[tokio::test]
async fn test_remote_store_create_get_list_delete() {
    let (_dir, url) = store_service().await;
    let store = HttpHaikuStore::new(url, TIMEOUT).unwrap();

    let first = store
        .create(lines([
            "An old silent pond",
            "A frog jumps into the pond",
            "Splash! Silence again",
        ]))
        .await
        .unwrap();
    let second = store
        .create(lines(["a", "b", "c"]))
        .await
        .unwrap();

    assert_eq!(first.id.to_string(), "h-001");
    assert_eq!(second.id.to_string(), "h-002");
    assert_eq!(first.syllable_counts, [5, 7, 5]);

    assert_eq!(store.get(first.id).await.unwrap(), first);
    assert_eq!(store.list(10, 0).await.unwrap(), vec![first.clone(), second.clone()]);
    assert_eq!(store.list(10, 1).await.unwrap(), vec![second.clone()]);

    store.delete(second.id).await.unwrap();
    assert!(store.get(second.id).await.unwrap_err().is_not_found());
    assert!(store.delete(second.id).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_remote_store_missing_id_is_not_found() {
    let (_dir, url) = store_service().await;
    let store = HttpHaikuStore::new(url, TIMEOUT).unwrap();

    let err = store.get(HaikuId::from_seq(42)).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(ref id) if id == "h-042"));
}

#[tokio::test]
async fn test_remote_store_unreachable_is_retryable_unavailable() {
    let store = HttpHaikuStore::new(dead_url().await, TIMEOUT).unwrap();

    match store.list(10, 0).await.unwrap_err() {
        StoreError::Unavailable(cause) => {
            assert_eq!(cause.kind, UpstreamErrorKind::Unreachable);
            assert!(cause.is_retryable());
        }
        other => panic!("expected Unavailable, got {other:?}"),
    }
}

#[tokio::test]
async fn test_remote_validator_agrees_with_local_rules() {
    let validator = HttpValidator::new(&validator_service().await, TIMEOUT).unwrap();

    let verdict = validator.validate(&classic()).await.unwrap();
    assert!(verdict.valid);
    assert_eq!(verdict.per_line_counts, Some([5, 7, 5]));

    let verdict = validator.validate(&two_lines()).await.unwrap();
    assert_eq!(verdict.reason, VerdictReason::WrongLineCount);
    assert_eq!(verdict.per_line_counts, None);
}

#[tokio::test]
async fn test_generator_text_answer_with_code_fence() {
    let (url, seen) = generator_service(
        StatusCode::OK,
        json!({ "text": "```haiku\nAn old silent pond\nA frog jumps into the pond\nSplash! Silence again\n```" }),
    )
    .await;
    let generator = HttpGenerator::new(url, TIMEOUT).unwrap();

    let request = GenerationRequest {
        attempt: 2,
        topic: Some("ponds".to_string()),
        feedback: Some(haiku_common::validator::validate(&too_short()).feedback()),
    };
    let candidate = generator.generate(&request).await.unwrap();

    assert_eq!(candidate.lines, classic().lines);

    let sent = seen.lock().unwrap().clone();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0]["attempt"], 2);
    assert_eq!(sent[0]["topic"], "ponds");
    assert_eq!(sent[0]["feedback"]["reason"], "syllable_mismatch");
    assert!(sent[0]["hint"].as_str().unwrap().contains("5-7-5"));
}

#[tokio::test]
async fn test_generator_error_statuses_are_classified() {
    let (url, _) = generator_service(StatusCode::SERVICE_UNAVAILABLE, json!({ "error": "busy" })).await;
    let err = HttpGenerator::new(url, TIMEOUT)
        .unwrap()
        .generate(&GenerationRequest::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind, UpstreamErrorKind::Rejected { status: 503 });
    assert!(err.is_retryable());

    let (url, _) = generator_service(StatusCode::OK, json!({ "unexpected": true })).await;
    let err = HttpGenerator::new(url, TIMEOUT)
        .unwrap()
        .generate(&GenerationRequest::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind, UpstreamErrorKind::Malformed);
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_end_to_end_over_http() {
    let (_dir, store_url) = store_service().await;
    let (generator_url, _) = generator_service(
        StatusCode::OK,
        json!({ "lines": classic().lines }),
    )
    .await;

    let store = Arc::new(HttpHaikuStore::new(store_url, TIMEOUT).unwrap());
    let orchestrator = PipelineOrchestrator::new(
        Arc::new(HttpGenerator::new(generator_url, TIMEOUT).unwrap()),
        Arc::new(HttpValidator::new(&validator_service().await, TIMEOUT).unwrap()),
        store.clone(),
    );

    let record = orchestrator.run(3).await.unwrap();
    assert_eq!(record.id.to_string(), "h-001");
    assert_eq!(record.lines, classic().to_lines().unwrap());

    let listed = store.list(10, 0).await.unwrap();
    assert_eq!(listed, vec![record]);
}

#[tokio::test]
async fn test_end_to_end_store_down_reports_valid_lines() {
    let (generator_url, _) = generator_service(
        StatusCode::OK,
        json!({ "lines": classic().lines }),
    )
    .await;

    let orchestrator = PipelineOrchestrator::new(
        Arc::new(HttpGenerator::new(generator_url, TIMEOUT).unwrap()),
        Arc::new(haiku_pipeline::LocalValidator),
        Arc::new(HttpHaikuStore::new(dead_url().await, TIMEOUT).unwrap()),
    );

    match orchestrator.run(3).await.unwrap_err() {
        PipelineFailure::StoreUnavailable {
            attempts, lines, ..
        } => {
            assert_eq!(attempts, 1);
            assert_eq!(HaikuCandidate::new(lines), classic());
        }
        other => panic!("expected StoreUnavailable, got {other:?}"),
    }
}

#[tokio::test]
async fn test_end_to_end_generator_down() {
    let (_dir, store_url) = store_service().await;
    let orchestrator = PipelineOrchestrator::new(
        Arc::new(HttpGenerator::new(dead_url().await, TIMEOUT).unwrap()),
        Arc::new(haiku_pipeline::LocalValidator),
        Arc::new(HttpHaikuStore::new(store_url, TIMEOUT).unwrap()),
    );

    let failure = orchestrator.run(3).await.unwrap_err();
    assert!(matches!(
        failure,
        PipelineFailure::UpstreamUnavailable {
            stage: Stage::Generator,
            attempts: 1,
            ..
        }
    ));
    assert!(failure.is_retryable());
}
