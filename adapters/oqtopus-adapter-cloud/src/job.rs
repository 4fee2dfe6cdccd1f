//! Job handles and the poll loop.
//!
//! ```text
//!   submit ──→ Pending ──→ Running ──→ Succeeded
//!                 │           │
//!                 │           ├──→ Failed(reason)
//!                 │           │
//!                 └───────────┴──→ Cancelled
//! ```
//!
//! Status only moves by polling the server. Terminal states are permanent:
//! once a job is observed terminal, its outcome lives in the backend's
//! [`JobCache`](crate::cache::JobCache) and later calls never touch the
//! network.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::api::JobRecord;
use crate::backend::BackendCore;
use crate::cache::JobOutcome;
use crate::error::{OqtopusError, OqtopusResult};
use crate::result::{EstimationResult, SamplingResult};

/// Server-assigned job identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JobId(pub String);

impl JobId {
    /// Create a job id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for JobId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Status of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Submitted or queued on the server.
    Pending,
    /// Executing.
    Running,
    /// Finished with a result.
    Succeeded,
    /// Finished without a result.
    Failed,
    /// Cancelled before finishing.
    Cancelled,
}

impl JobStatus {
    /// Map a wire status string.
    ///
    /// Unknown strings map to `Running` so the poll loop keeps waiting.
    pub fn from_wire(status: &str) -> Self {
        match status.trim().to_ascii_lowercase().as_str() {
            "submitted" | "ready" | "pending" | "queued" => JobStatus::Pending,
            "running" => JobStatus::Running,
            "succeeded" | "success" | "completed" => JobStatus::Succeeded,
            "failed" => JobStatus::Failed,
            "cancelled" | "canceled" => JobStatus::Cancelled,
            _ => JobStatus::Running,
        }
    }

    /// Whether the status can never change again.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Succeeded | JobStatus::Failed | JobStatus::Cancelled
        )
    }

    /// Whether the job finished with a result.
    pub fn is_success(&self) -> bool {
        matches!(self, JobStatus::Succeeded)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JobStatus::Pending => "pending",
            JobStatus::Running => "running",
            JobStatus::Succeeded => "succeeded",
            JobStatus::Failed => "failed",
            JobStatus::Cancelled => "cancelled",
        };
        write!(f, "{s}")
    }
}

/// What a job computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobKind {
    /// Measurement counts.
    Sampling,
    /// Expectation value of an operator.
    Estimation,
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobKind::Sampling => write!(f, "sampling"),
            JobKind::Estimation => write!(f, "estimation"),
        }
    }
}

/// Polling behaviour of `result()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollConfig {
    /// Wait between two status queries.
    pub interval: Duration,
    /// Give up after this long; `None` waits forever.
    pub timeout: Option<Duration>,
    /// Transient failures tolerated in a row before the error escalates.
    pub max_transient_retries: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            timeout: None,
            max_transient_retries: 3,
        }
    }
}

impl PollConfig {
    /// Set the poll interval.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Set the overall timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the number of tolerated transient failures.
    pub fn with_max_transient_retries(mut self, retries: u32) -> Self {
        self.max_transient_retries = retries;
        self
    }
}

/// A result type a job can resolve to.
pub trait JobOutput: Clone + Send + Sync + Sized + 'static {
    /// Kind of job producing this output.
    const KIND: JobKind;

    /// Decode the payload of a succeeded job.
    fn decode(record: &JobRecord) -> OqtopusResult<Self>;

    /// Wrap for the cache.
    fn into_outcome(self) -> JobOutcome;

    /// Unwrap from the cache; `None` when the cached outcome is of another kind.
    fn from_outcome(outcome: JobOutcome) -> Option<Self>;
}

impl JobOutput for SamplingResult {
    const KIND: JobKind = JobKind::Sampling;

    fn decode(record: &JobRecord) -> OqtopusResult<Self> {
        SamplingResult::from_record(record)
    }

    fn into_outcome(self) -> JobOutcome {
        JobOutcome::Sampling(self)
    }

    fn from_outcome(outcome: JobOutcome) -> Option<Self> {
        match outcome {
            JobOutcome::Sampling(result) => Some(result),
            JobOutcome::Estimation(_) => None,
        }
    }
}

impl JobOutput for EstimationResult {
    const KIND: JobKind = JobKind::Estimation;

    fn decode(record: &JobRecord) -> OqtopusResult<Self> {
        EstimationResult::from_record(record)
    }

    fn into_outcome(self) -> JobOutcome {
        JobOutcome::Estimation(self)
    }

    fn from_outcome(outcome: JobOutcome) -> Option<Self> {
        match outcome {
            JobOutcome::Estimation(result) => Some(result),
            JobOutcome::Sampling(_) => None,
        }
    }
}

/// Reason reported for a failed or cancelled job.
pub(crate) fn failure_reason(record: &JobRecord) -> String {
    match record.job_info.message.as_deref().map(str::trim) {
        Some(message) if !message.is_empty() => message.to_string(),
        _ => format!("job ended with status {}", record.status),
    }
}

/// Turn a terminal record into the outcome to cache.
pub(crate) fn terminal_outcome<R: JobOutput>(
    id: &JobId,
    status: JobStatus,
    record: &JobRecord,
) -> Result<JobOutcome, OqtopusError> {
    if status.is_success() {
        R::decode(record).map(R::into_outcome)
    } else {
        Err(OqtopusError::JobFailed {
            job_id: id.clone(),
            status,
            reason: failure_reason(record),
        })
    }
}

/// Handle to a submitted job.
///
/// Cloning is cheap; clones share the backend's cache.
pub struct Job<R> {
    id: JobId,
    core: Arc<BackendCore>,
    _output: PhantomData<fn() -> R>,
}

/// Handle to a sampling job.
pub type SamplingJob = Job<SamplingResult>;

/// Handle to an estimation job.
pub type EstimationJob = Job<EstimationResult>;

impl<R> Clone for Job<R> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            core: Arc::clone(&self.core),
            _output: PhantomData,
        }
    }
}

impl<R> fmt::Debug for Job<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Job").field("id", &self.id).finish()
    }
}

impl<R: JobOutput> Job<R> {
    pub(crate) fn new(id: JobId, core: Arc<BackendCore>) -> Self {
        Self {
            id,
            core,
            _output: PhantomData,
        }
    }

    /// Job id.
    pub fn id(&self) -> &JobId {
        &self.id
    }

    /// Job kind.
    pub fn kind(&self) -> JobKind {
        R::KIND
    }

    /// Last observed status, without a network call.
    pub async fn status(&self) -> JobStatus {
        self.core
            .cache
            .status(&self.id)
            .await
            .unwrap_or(JobStatus::Pending)
    }

    /// Last fetched record, without a network call.
    pub async fn record(&self) -> Option<JobRecord> {
        self.core
            .cache
            .get(&self.id)
            .await
            .and_then(|entry| entry.record)
    }

    /// Query the server once and return the new status.
    ///
    /// Does nothing once the job is terminal.
    pub async fn refresh(&self) -> OqtopusResult<JobStatus> {
        let slot = self.core.cache.slot(&self.id).await;
        let _poll = slot.lock_poll().await;

        let cached = slot.snapshot().await;
        if cached.status.is_terminal() {
            return Ok(cached.status);
        }

        let record = self.core.api.get_job(self.id.as_str()).await?;
        let status = JobStatus::from_wire(&record.status);
        debug!(job_id = %self.id, %status, "refreshed job status");
        if status.is_terminal() {
            let outcome = terminal_outcome::<R>(&self.id, status, &record);
            slot.observe(status, record).await;
            let _ = slot.settle(status, outcome).await;
        } else {
            slot.observe(status, record).await;
        }
        Ok(status)
    }

    /// Wait for the result with the backend's poll settings.
    pub async fn result(&self) -> OqtopusResult<R> {
        let poll = self.core.poll.clone();
        self.result_with(&poll).await
    }

    /// Wait for the result with explicit poll settings.
    ///
    /// The first status query is issued immediately. A failed or cancelled
    /// job resolves to [`OqtopusError::JobFailed`], which is cached like a
    /// result.
    pub async fn result_with(&self, poll: &PollConfig) -> OqtopusResult<R> {
        let slot = self.core.cache.slot(&self.id).await;
        let _poll = slot.lock_poll().await;

        if let Some(outcome) = slot.outcome().await {
            debug!(job_id = %self.id, "serving job result from cache");
            return self.unwrap_outcome(outcome);
        }

        let start = Instant::now();
        let mut transient_failures = 0u32;

        loop {
            match self.core.api.get_job(self.id.as_str()).await {
                Ok(record) => {
                    transient_failures = 0;
                    let status = JobStatus::from_wire(&record.status);
                    debug!(job_id = %self.id, %status, "polled job");

                    if status.is_terminal() {
                        let outcome = terminal_outcome::<R>(&self.id, status, &record);
                        slot.observe(status, record).await;
                        let outcome = slot.settle(status, outcome).await;
                        match &outcome {
                            Ok(_) => info!(job_id = %self.id, %status, "job finished"),
                            Err(e) => warn!(job_id = %self.id, %status, error = %e, "job did not succeed"),
                        }
                        return self.unwrap_outcome(outcome);
                    }
                    slot.observe(status, record).await;
                }
                Err(e) if e.is_transient() && transient_failures < poll.max_transient_retries => {
                    transient_failures += 1;
                    warn!(
                        job_id = %self.id,
                        attempt = transient_failures,
                        max = poll.max_transient_retries,
                        error = %e,
                        "transient error while polling, retrying"
                    );
                }
                Err(e) => return Err(e),
            }

            let mut wait = poll.interval;
            if let Some(timeout) = poll.timeout {
                let elapsed = start.elapsed();
                if elapsed >= timeout {
                    return Err(OqtopusError::PollTimeout {
                        job_id: self.id.clone(),
                        elapsed,
                    });
                }
                wait = wait.min(timeout - elapsed);
            }

            tokio::time::sleep(wait).await;
        }
    }

    /// Block the current thread until the result is available.
    ///
    /// Runs on the backend's blocking runtime, the same one used by the
    /// `blocking_*` submission methods. Must not be called from inside an
    /// async runtime; use [`result`](Self::result) there.
    pub fn blocking_result(&self) -> OqtopusResult<R> {
        self.core.block_on(self.result())?
    }

    fn unwrap_outcome(&self, outcome: Result<JobOutcome, OqtopusError>) -> OqtopusResult<R> {
        R::from_outcome(outcome?).ok_or_else(|| {
            OqtopusError::Unsupported(format!("job {} is not a {} job", self.id, R::KIND))
        })
    }
}
