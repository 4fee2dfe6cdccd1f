//! In-memory [`JobApi`] for tests and offline development.
//!
//! [`MockJobApi`] records every submission, replays queued `get_job`
//! responses in order (the last one repeats), serves a fixed device list
//! and counts calls, so callers can assert exactly how many network round
//! trips an operation cost.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::api::{DeviceRecord, JobApi, JobRecord, SubmitJobRequest, SubmitJobResponse};
use crate::error::{OqtopusError, OqtopusResult};

/// Scripted job API.
#[derive(Debug)]
pub struct MockJobApi {
    submit_response: Mutex<OqtopusResult<SubmitJobResponse>>,
    job_responses: Mutex<VecDeque<OqtopusResult<JobRecord>>>,
    list_response: Mutex<OqtopusResult<Vec<JobRecord>>>,
    devices: Mutex<Vec<DeviceRecord>>,
    submitted: Mutex<Vec<SubmitJobRequest>>,
    submit_calls: AtomicUsize,
    get_calls: AtomicUsize,
    list_calls: AtomicUsize,
    device_calls: AtomicUsize,
}

impl Default for MockJobApi {
    fn default() -> Self {
        Self::new("mock-job-id")
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockJobApi {
    /// A mock that accepts submissions under `job_id`.
    pub fn new(job_id: impl Into<String>) -> Self {
        Self {
            submit_response: Mutex::new(Ok(SubmitJobResponse {
                job_id: job_id.into(),
            })),
            job_responses: Mutex::new(VecDeque::new()),
            list_response: Mutex::new(Ok(Vec::new())),
            devices: Mutex::new(Vec::new()),
            submitted: Mutex::new(Vec::new()),
            submit_calls: AtomicUsize::new(0),
            get_calls: AtomicUsize::new(0),
            list_calls: AtomicUsize::new(0),
            device_calls: AtomicUsize::new(0),
        }
    }

    /// Make submissions fail.
    pub fn with_submit_error(self, error: OqtopusError) -> Self {
        *lock(&self.submit_response) = Err(error);
        self
    }

    /// Queue a `get_job` response.
    pub fn with_job(self, record: JobRecord) -> Self {
        lock(&self.job_responses).push_back(Ok(record));
        self
    }

    /// Queue a `get_job` error.
    pub fn with_job_error(self, error: OqtopusError) -> Self {
        lock(&self.job_responses).push_back(Err(error));
        self
    }

    /// Set the `list_jobs` response.
    pub fn with_job_list(self, records: Vec<JobRecord>) -> Self {
        *lock(&self.list_response) = Ok(records);
        self
    }

    /// Add a device to the `list_devices` response.
    pub fn with_device(self, device: DeviceRecord) -> Self {
        lock(&self.devices).push(device);
        self
    }

    /// Requests received by `submit_job`, oldest first.
    pub fn submitted(&self) -> Vec<SubmitJobRequest> {
        lock(&self.submitted).clone()
    }

    /// Number of `submit_job` calls.
    pub fn submit_calls(&self) -> usize {
        self.submit_calls.load(Ordering::SeqCst)
    }

    /// Number of `get_job` calls.
    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    /// Number of `list_jobs` calls.
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Number of `list_devices` and `get_device` calls.
    pub fn device_calls(&self) -> usize {
        self.device_calls.load(Ordering::SeqCst)
    }

    /// Total calls of any kind.
    pub fn total_calls(&self) -> usize {
        self.submit_calls() + self.get_calls() + self.list_calls() + self.device_calls()
    }
}

#[async_trait]
impl JobApi for MockJobApi {
    async fn submit_job(&self, request: &SubmitJobRequest) -> OqtopusResult<SubmitJobResponse> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        lock(&self.submitted).push(request.clone());
        lock(&self.submit_response).clone()
    }

    async fn get_job(&self, job_id: &str) -> OqtopusResult<JobRecord> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        let mut responses = lock(&self.job_responses);
        let response = if responses.len() > 1 {
            responses.pop_front()
        } else {
            responses.front().cloned()
        };
        response.unwrap_or_else(|| {
            Err(OqtopusError::BackendRequest {
                status: 404,
                message: format!("job {job_id} not found"),
            })
        })
    }

    async fn list_jobs(&self) -> OqtopusResult<Vec<JobRecord>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        lock(&self.list_response).clone()
    }

    async fn list_devices(&self) -> OqtopusResult<Vec<DeviceRecord>> {
        self.device_calls.fetch_add(1, Ordering::SeqCst);
        Ok(lock(&self.devices).clone())
    }

    async fn get_device(&self, device_id: &str) -> OqtopusResult<DeviceRecord> {
        self.device_calls.fetch_add(1, Ordering::SeqCst);
        lock(&self.devices)
            .iter()
            .find(|d| d.device_id == device_id)
            .cloned()
            .ok_or_else(|| OqtopusError::BackendRequest {
                status: 404,
                message: format!("device {device_id} not found"),
            })
    }
}
