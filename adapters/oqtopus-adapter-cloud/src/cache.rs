//! Per-backend job result cache.
//!
//! Every job submitted or retrieved through a backend gets one slot keyed by
//! its id. A slot records the last observed status and record and, once the
//! job is terminal, the decoded outcome or the failure. Terminal slots are
//! never overwritten, so repeated `result()` calls cost no network traffic.
//!
//! Each slot carries its own poll lock: only one task polls a given job at a
//! time, and waiters that queue behind it find the outcome already cached.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tokio::sync::{Mutex, MutexGuard, RwLock};

use crate::api::JobRecord;
use crate::error::OqtopusError;
use crate::job::{JobId, JobStatus};
use crate::result::{EstimationResult, SamplingResult};

/// Decoded outcome of a succeeded job.
#[derive(Debug, Clone, PartialEq)]
pub enum JobOutcome {
    /// Counts of a sampling job.
    Sampling(SamplingResult),
    /// Expectation value of an estimation job.
    Estimation(EstimationResult),
}

/// Cached state of one job.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    /// Last observed status.
    pub status: JobStatus,
    /// Last fetched record.
    pub record: Option<JobRecord>,
    /// Terminal outcome, present once `status` is terminal.
    pub outcome: Option<Result<JobOutcome, OqtopusError>>,
}

impl CacheEntry {
    fn pending() -> Self {
        Self {
            status: JobStatus::Pending,
            record: None,
            outcome: None,
        }
    }
}

/// One job's slot.
#[derive(Debug)]
pub(crate) struct CacheSlot {
    poll: Mutex<()>,
    state: RwLock<CacheEntry>,
}

impl CacheSlot {
    /// Acquire the exclusive right to poll this job.
    pub(crate) async fn lock_poll(&self) -> MutexGuard<'_, ()> {
        self.poll.lock().await
    }

    /// Snapshot of the slot.
    pub(crate) async fn snapshot(&self) -> CacheEntry {
        self.state.read().await.clone()
    }

    /// Terminal outcome, if recorded.
    pub(crate) async fn outcome(&self) -> Option<Result<JobOutcome, OqtopusError>> {
        self.state.read().await.outcome.clone()
    }

    /// Record a fetched job record. Ignored once terminal.
    pub(crate) async fn observe(&self, status: JobStatus, record: JobRecord) {
        let mut state = self.state.write().await;
        if state.status.is_terminal() {
            return;
        }
        state.status = status;
        state.record = Some(record);
    }

    /// Record the terminal outcome. The first one wins.
    pub(crate) async fn settle(
        &self,
        status: JobStatus,
        outcome: Result<JobOutcome, OqtopusError>,
    ) -> Result<JobOutcome, OqtopusError> {
        let mut state = self.state.write().await;
        if let Some(existing) = &state.outcome {
            return existing.clone();
        }
        state.status = status;
        state.outcome = Some(outcome.clone());
        outcome
    }
}

/// Job id → cached state, owned by one backend.
#[derive(Debug, Default)]
pub struct JobCache {
    slots: RwLock<FxHashMap<JobId, Arc<CacheSlot>>>,
}

impl JobCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a freshly submitted job as pending.
    pub async fn register_pending(&self, id: &JobId) {
        self.slot(id).await;
    }

    /// The slot for `id`, created pending when absent.
    pub(crate) async fn slot(&self, id: &JobId) -> Arc<CacheSlot> {
        if let Some(slot) = self.slots.read().await.get(id) {
            return Arc::clone(slot);
        }
        let mut slots = self.slots.write().await;
        Arc::clone(slots.entry(id.clone()).or_insert_with(|| {
            Arc::new(CacheSlot {
                poll: Mutex::new(()),
                state: RwLock::new(CacheEntry::pending()),
            })
        }))
    }

    /// Cached state of a job.
    pub async fn get(&self, id: &JobId) -> Option<CacheEntry> {
        let slot = self.slots.read().await.get(id).cloned()?;
        Some(slot.snapshot().await)
    }

    /// Last observed status of a job.
    pub async fn status(&self, id: &JobId) -> Option<JobStatus> {
        self.get(id).await.map(|entry| entry.status)
    }

    /// Whether the job is known.
    pub async fn contains(&self, id: &JobId) -> bool {
        self.slots.read().await.contains_key(id)
    }

    /// Number of known jobs.
    pub async fn len(&self) -> usize {
        self.slots.read().await.len()
    }

    /// Whether no job is known.
    pub async fn is_empty(&self) -> bool {
        self.slots.read().await.is_empty()
    }
}
