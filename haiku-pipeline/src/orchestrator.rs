//! Pipeline orchestrator
//!
//! Drives one run through GENERATING → VALIDATING → PERSISTING → DONE,
//! looping back to GENERATING with feedback while validation fails and
//! attempts remain. Attempts are strictly sequential: attempt N+1 starts
//! only after attempt N's verdict is known.
//!
//! Structural failures consume attempts. Collaborator failures (unreachable,
//! timed out, rejected) end the run immediately without consuming one.

use haiku_common::validator::syllable_counts;
use haiku_common::{
    HaikuCandidate, HaikuLines, HaikuRecord, HaikuStore, StoreError, UpstreamError,
    ValidationVerdict, ATTEMPT_KEY,
};
use serde::Serialize;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn, Instrument};
use uuid::Uuid;

use crate::failure::{PipelineFailure, Stage};
use crate::generator::{GenerationRequest, HaikuGenerator};
use crate::validation::HaikuValidator;

/// Run-level state, logged on every transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    Generating,
    Validating,
    Persisting,
    Done,
    Exhausted,
    Failed,
    Cancelled,
}

impl PipelineState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Done | Self::Exhausted | Self::Failed | Self::Cancelled
        )
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Generating => "GENERATING",
            Self::Validating => "VALIDATING",
            Self::Persisting => "PERSISTING",
            Self::Done => "DONE",
            Self::Exhausted => "EXHAUSTED",
            Self::Failed => "FAILED",
            Self::Cancelled => "CANCELLED",
        };
        f.write_str(name)
    }
}

/// What a single attempt amounted to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptOutcome {
    Valid,
    Invalid,
}

/// One generate-then-validate attempt
#[derive(Debug, Clone, Serialize)]
pub struct PipelineAttempt {
    pub attempt_number: u32,
    pub candidate: HaikuCandidate,
    pub verdict: ValidationVerdict,
    pub outcome: AttemptOutcome,
}

/// Per-call deadlines for each collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub generator: Duration,
    pub validator: Duration,
    pub store: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            generator: Duration::from_secs(30),
            validator: Duration::from_secs(5),
            store: Duration::from_secs(10),
        }
    }
}

/// Parameters for one run
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunOptions {
    /// Validation attempts allowed; 0 is treated as 1
    pub max_attempts: u32,
    pub topic: Option<String>,
}

impl RunOptions {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            topic: None,
        }
    }

    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }
}

/// Coordinates generator, validator and store for pipeline runs.
///
/// Holds no per-run state, so one orchestrator may serve many concurrent
/// runs; each run is sequential internally.
pub struct PipelineOrchestrator {
    generator: Arc<dyn HaikuGenerator>,
    validator: Arc<dyn HaikuValidator>,
    store: Arc<dyn HaikuStore>,
    timeouts: Timeouts,
}

impl PipelineOrchestrator {
    pub fn new(
        generator: Arc<dyn HaikuGenerator>,
        validator: Arc<dyn HaikuValidator>,
        store: Arc<dyn HaikuStore>,
    ) -> Self {
        Self {
            generator,
            validator,
            store,
            timeouts: Timeouts::default(),
        }
    }

    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn timeouts(&self) -> Timeouts {
        self.timeouts
    }

    /// Run until a valid haiku is stored or `max_attempts` validations fail
    pub async fn run(&self, max_attempts: u32) -> Result<HaikuRecord, PipelineFailure> {
        self.run_with(RunOptions::new(max_attempts), &CancellationToken::new())
            .await
    }

    /// Run with a topic and a cancellation token.
    ///
    /// Cancellation is honoured between attempts; an attempt already in
    /// flight finishes (or times out) first.
    pub async fn run_with(
        &self,
        options: RunOptions,
        cancel: &CancellationToken,
    ) -> Result<HaikuRecord, PipelineFailure> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("pipeline_run", %run_id);
        self.drive(options, cancel).instrument(span).await
    }

    async fn drive(
        &self,
        options: RunOptions,
        cancel: &CancellationToken,
    ) -> Result<HaikuRecord, PipelineFailure> {
        let max_attempts = if options.max_attempts == 0 {
            warn!("max_attempts of 0 requested, running a single attempt");
            1
        } else {
            options.max_attempts
        };

        info!(max_attempts, topic = ?options.topic, "Pipeline run started");

        let mut feedback = None;
        let mut attempt_number = 0;

        loop {
            if cancel.is_cancelled() {
                transition(PipelineState::Cancelled, attempt_number);
                return Err(PipelineFailure::Cancelled {
                    attempts: attempt_number,
                });
            }

            attempt_number += 1;

            transition(PipelineState::Generating, attempt_number);
            let request = GenerationRequest {
                attempt: attempt_number,
                topic: options.topic.clone(),
                feedback: feedback.take(),
            };
            let candidate = call_with_deadline(
                self.timeouts.generator,
                Stage::Generator,
                self.generator.generate(&request),
            )
            .await
            .map_err(|cause| upstream_failure(Stage::Generator, attempt_number, cause))?
            .with_metadata(ATTEMPT_KEY, attempt_number.to_string());

            transition(PipelineState::Validating, attempt_number);
            let verdict = call_with_deadline(
                self.timeouts.validator,
                Stage::Validator,
                self.validator.validate(&candidate),
            )
            .await
            .map_err(|cause| upstream_failure(Stage::Validator, attempt_number, cause))?;

            let attempt = PipelineAttempt {
                attempt_number,
                outcome: if verdict.valid {
                    AttemptOutcome::Valid
                } else {
                    AttemptOutcome::Invalid
                },
                candidate,
                verdict,
            };

            if attempt.outcome == AttemptOutcome::Valid {
                return self.persist(attempt).await;
            }

            debug!(
                attempt = attempt_number,
                reason = ?attempt.verdict.reason,
                line_count = attempt.verdict.line_count,
                per_line_counts = ?attempt.verdict.per_line_counts,
                "Candidate rejected"
            );

            if attempt_number >= max_attempts {
                transition(PipelineState::Exhausted, attempt_number);
                warn!(attempts = attempt_number, "No valid haiku within attempt budget");
                return Err(PipelineFailure::Exhausted {
                    attempts: attempt_number,
                    last_candidate: attempt.candidate,
                    last_verdict: attempt.verdict,
                });
            }

            feedback = Some(attempt.verdict.feedback());
        }
    }

    /// Persist a validated attempt
    async fn persist(&self, attempt: PipelineAttempt) -> Result<HaikuRecord, PipelineFailure> {
        let attempts = attempt.attempt_number;

        // A remote validator could wrongly accept a candidate of the wrong shape
        let Some(lines) = attempt.candidate.to_lines() else {
            let cause = UpstreamError::malformed(format!(
                "validator accepted a candidate with {} lines",
                attempt.candidate.lines.len()
            ));
            return Err(upstream_failure(Stage::Validator, attempts, cause));
        };

        transition(PipelineState::Persisting, attempts);
        match tokio::time::timeout(self.timeouts.store, self.store.create(lines.clone())).await {
            Ok(Ok(record)) => {
                transition(PipelineState::Done, attempts);
                info!(id = %record.id, attempts, "Haiku stored");
                Ok(record)
            }
            Ok(Err(err)) => Err(store_failure(attempts, lines, store_cause(err))),
            Err(_) => {
                let cause = UpstreamError::timeout(format!(
                    "store did not answer within {:?}",
                    self.timeouts.store
                ));
                Err(store_failure(attempts, lines, cause))
            }
        }
    }
}

fn transition(state: PipelineState, attempt: u32) {
    if state.is_terminal() {
        info!(%state, attempt, "Pipeline state");
    } else {
        debug!(%state, attempt, "Pipeline state");
    }
}

/// Await a collaborator call, turning an elapsed deadline into `Timeout`
async fn call_with_deadline<T, F>(limit: Duration, stage: Stage, call: F) -> Result<T, UpstreamError>
where
    F: Future<Output = Result<T, UpstreamError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(UpstreamError::timeout(format!(
            "{stage} did not answer within {limit:?}"
        ))),
    }
}

fn upstream_failure(stage: Stage, attempts: u32, cause: UpstreamError) -> PipelineFailure {
    transition(PipelineState::Failed, attempts);
    warn!(%stage, attempts, error = %cause, "Collaborator failed");
    PipelineFailure::UpstreamUnavailable {
        stage,
        attempts,
        cause,
    }
}

fn store_cause(err: StoreError) -> UpstreamError {
    match err {
        StoreError::Unavailable(cause) => cause,
        StoreError::InvalidInput(message) => UpstreamError::rejected(400, message),
        StoreError::NotFound(message) => UpstreamError::rejected(404, message),
    }
}

fn store_failure(attempts: u32, lines: HaikuLines, cause: UpstreamError) -> PipelineFailure {
    transition(PipelineState::Failed, attempts);
    warn!(attempts, error = %cause, "Valid haiku could not be stored");
    PipelineFailure::StoreUnavailable {
        attempts,
        syllable_counts: syllable_counts(&lines),
        lines,
        cause,
    }
}
