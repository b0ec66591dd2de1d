//! Test helpers for haiku-pipeline integration tests
//!
//! Scripted collaborators for driving the orchestrator deterministically,
//! plus fixtures that run the real store and validator services on
//! ephemeral ports.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use haiku_common::{
    HaikuCandidate, HaikuId, HaikuLines, HaikuRecord, HaikuStore, StoreError, StoreResult,
    UpstreamError, ValidationVerdict,
};
use haiku_pipeline::{GenerationRequest, HaikuGenerator, HaikuValidator, LocalValidator};
use haiku_store::db::{init_database_pool, PoolSettings};
use haiku_store::SqliteHaikuStore;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

pub fn classic() -> HaikuCandidate {
    HaikuCandidate::new([
        "An old silent pond",
        "A frog jumps into the pond",
        "Splash! Silence again",
    ])
}

/// Three lines, syllables (3, 1, 2)
pub fn too_short() -> HaikuCandidate {
    HaikuCandidate::new(["one two three", "four", "five six"])
}

pub fn two_lines() -> HaikuCandidate {
    HaikuCandidate::new(["An old silent pond", "A frog jumps into the pond"])
}

/// Generator that replays a script, then repeats a fallback forever
pub struct ScriptedGenerator {
    script: Mutex<VecDeque<Result<HaikuCandidate, UpstreamError>>>,
    fallback: Result<HaikuCandidate, UpstreamError>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedGenerator {
    pub fn new(
        script: Vec<Result<HaikuCandidate, UpstreamError>>,
        fallback: Result<HaikuCandidate, UpstreamError>,
    ) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn always(candidate: HaikuCandidate) -> Self {
        Self::new(Vec::new(), Ok(candidate))
    }

    pub fn failing(err: UpstreamError) -> Self {
        Self::new(Vec::new(), Err(err))
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HaikuGenerator for ScriptedGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<HaikuCandidate, UpstreamError> {
        self.requests.lock().unwrap().push(request.clone());
        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(|| self.fallback.clone())
    }
}

/// Generator that never answers within any reasonable deadline
pub struct StalledGenerator;

#[async_trait]
impl HaikuGenerator for StalledGenerator {
    async fn generate(&self, _request: &GenerationRequest) -> Result<HaikuCandidate, UpstreamError> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(classic())
    }
}

/// Generator that cancels the run from inside its first call
pub struct CancellingGenerator {
    pub token: CancellationToken,
    pub calls: AtomicUsize,
}

#[async_trait]
impl HaikuGenerator for CancellingGenerator {
    async fn generate(&self, _request: &GenerationRequest) -> Result<HaikuCandidate, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.token.cancel();
        Ok(too_short())
    }
}

/// Local validator that counts how often it is consulted
#[derive(Default)]
pub struct CountingValidator {
    calls: AtomicUsize,
}

impl CountingValidator {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HaikuValidator for CountingValidator {
    async fn validate(&self, candidate: &HaikuCandidate) -> Result<ValidationVerdict, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        LocalValidator.validate(candidate).await
    }
}

/// Validator that lies: accepts anything
pub struct RubberStampValidator;

#[async_trait]
impl HaikuValidator for RubberStampValidator {
    async fn validate(&self, candidate: &HaikuCandidate) -> Result<ValidationVerdict, UpstreamError> {
        let mut verdict = LocalValidator.validate(candidate).await?;
        verdict.valid = true;
        Ok(verdict)
    }
}

/// Store whose backing medium is gone
pub struct UnavailableStore;

fn gone() -> StoreError {
    StoreError::Unavailable(UpstreamError::unreachable("disk detached"))
}

#[async_trait]
impl HaikuStore for UnavailableStore {
    async fn create(&self, _lines: HaikuLines) -> StoreResult<HaikuRecord> {
        Err(gone())
    }

    async fn get(&self, _id: HaikuId) -> StoreResult<HaikuRecord> {
        Err(gone())
    }

    async fn list(&self, _limit: i64, _offset: i64) -> StoreResult<Vec<HaikuRecord>> {
        Err(gone())
    }

    async fn delete(&self, _id: HaikuId) -> StoreResult<()> {
        Err(gone())
    }
}

/// Fresh SQLite-backed store in a temporary directory
pub async fn sqlite_store() -> (TempDir, SqliteHaikuStore) {
    let dir = TempDir::new().unwrap();
    let pool = init_database_pool(&dir.path().join("haikus.db"), PoolSettings::default())
        .await
        .unwrap();
    (dir, SqliteHaikuStore::new(pool))
}

/// Serve a router on an ephemeral localhost port, returning its base URL
pub async fn spawn_server(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Base URL of a port nothing listens on
pub async fn dead_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
