//! Sampling backend.

use std::sync::Arc;

use oqtopus_ir::Circuit;

use crate::api::{DeviceRecord, JobApi, JobRecord, WireJobType};
use crate::backend::{BackendCore, RetrievedJob, SubmitOptions, validate_submission};
use crate::cache::JobCache;
use crate::config::OqtopusConfig;
use crate::error::{OqtopusError, OqtopusResult};
use crate::job::{JobId, PollConfig, SamplingJob};
use crate::translate::circuit_to_sampling_program;

/// Submits sampling jobs to OQTOPUS Cloud.
///
/// Each backend owns a result cache shared by the jobs it returns.
#[derive(Clone)]
pub struct SamplingBackend {
    core: Arc<BackendCore>,
}

impl std::fmt::Debug for SamplingBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SamplingBackend")
            .field("poll", &self.core.poll)
            .finish_non_exhaustive()
    }
}

impl SamplingBackend {
    /// Connect with explicit settings.
    pub fn new(config: &OqtopusConfig) -> OqtopusResult<Self> {
        Ok(Self {
            core: BackendCore::from_config(config)?,
        })
    }

    /// Connect with settings from the environment or `~/.oqtopus`.
    pub fn load(section: Option<&str>) -> OqtopusResult<Self> {
        Self::new(&OqtopusConfig::load(section)?)
    }

    /// Use a custom [`JobApi`] implementation.
    pub fn with_api(api: Arc<dyn JobApi>) -> Self {
        Self {
            core: BackendCore::from_api(api),
        }
    }

    /// Replace the default poll settings used by `result()`.
    pub fn with_poll_config(self, poll: PollConfig) -> Self {
        Self {
            core: self.core.with_poll(poll),
        }
    }

    /// Poll settings used by `result()`.
    pub fn poll_config(&self) -> &PollConfig {
        &self.core.poll
    }

    /// The backend's job cache.
    pub fn cache(&self) -> &JobCache {
        &self.core.cache
    }

    /// Sample a circuit.
    ///
    /// Every qubit is measured when the circuit has no measurement of its
    /// own. Fails with [`OqtopusError::UnsupportedGate`] before any network
    /// call if the circuit uses a gate the service does not accept.
    pub async fn sample(
        &self,
        circuit: &Circuit,
        device_id: &str,
        shots: u32,
        options: &SubmitOptions,
    ) -> OqtopusResult<SamplingJob> {
        validate_submission(device_id, shots, options)?;
        let program = circuit_to_sampling_program(circuit)?;
        self.core
            .submit(
                WireJobType::Sampling,
                device_id,
                shots,
                vec![program],
                None,
                options,
            )
            .await
    }

    /// Sample several circuits in one `multi_manual` job.
    ///
    /// The result's `divided_counts` holds the counts of circuit `i` under
    /// key `i`.
    pub async fn sample_many(
        &self,
        circuits: &[Circuit],
        device_id: &str,
        shots: u32,
        options: &SubmitOptions,
    ) -> OqtopusResult<SamplingJob> {
        validate_submission(device_id, shots, options)?;
        if circuits.is_empty() {
            return Err(OqtopusError::InvalidParameter(
                "at least one circuit is required".into(),
            ));
        }
        let programs = circuits
            .iter()
            .map(circuit_to_sampling_program)
            .collect::<OqtopusResult<Vec<_>>>()?;
        self.core
            .submit(
                WireJobType::MultiManual,
                device_id,
                shots,
                programs,
                None,
                options,
            )
            .await
    }

    /// Sample a raw OpenQASM 3 program.
    ///
    /// The program is sent as written. Its gate set and measurements are left
    /// for the service to validate.
    pub async fn sample_qasm(
        &self,
        program: &str,
        device_id: &str,
        shots: u32,
        options: &SubmitOptions,
    ) -> OqtopusResult<SamplingJob> {
        validate_submission(device_id, shots, options)?;
        self.core
            .submit(
                WireJobType::Sampling,
                device_id,
                shots,
                vec![program.to_string()],
                None,
                options,
            )
            .await
    }

    /// Fetch an existing job by id.
    pub async fn retrieve_job(&self, id: impl Into<JobId>) -> OqtopusResult<RetrievedJob> {
        self.core.retrieve(&id.into()).await
    }

    /// List the caller's jobs.
    pub async fn list_jobs(&self) -> OqtopusResult<Vec<JobRecord>> {
        self.core.list_jobs().await
    }

    /// List the devices jobs can be submitted to.
    pub async fn list_devices(&self) -> OqtopusResult<Vec<DeviceRecord>> {
        self.core.list_devices().await
    }

    pub async fn get_device(&self, device_id: &str) -> OqtopusResult<DeviceRecord> {
        self.core.get_device(device_id).await
    }

    // --- blocking forms ---
    //
    // These run on a current-thread runtime owned by the backend and shared
    // with `Job::blocking_result`. They fail with `Unsupported` when called
    // from inside an async runtime.

    /// Blocking [`sample`](Self::sample).
    pub fn blocking_sample(
        &self,
        circuit: &Circuit,
        device_id: &str,
        shots: u32,
        options: &SubmitOptions,
    ) -> OqtopusResult<SamplingJob> {
        self.core
            .block_on(self.sample(circuit, device_id, shots, options))?
    }

    /// Blocking [`sample_many`](Self::sample_many).
    pub fn blocking_sample_many(
        &self,
        circuits: &[Circuit],
        device_id: &str,
        shots: u32,
        options: &SubmitOptions,
    ) -> OqtopusResult<SamplingJob> {
        self.core
            .block_on(self.sample_many(circuits, device_id, shots, options))?
    }

    /// Blocking [`sample_qasm`](Self::sample_qasm).
    pub fn blocking_sample_qasm(
        &self,
        program: &str,
        device_id: &str,
        shots: u32,
        options: &SubmitOptions,
    ) -> OqtopusResult<SamplingJob> {
        self.core
            .block_on(self.sample_qasm(program, device_id, shots, options))?
    }

    /// Blocking [`retrieve_job`](Self::retrieve_job).
    pub fn blocking_retrieve_job(&self, id: impl Into<JobId>) -> OqtopusResult<RetrievedJob> {
        self.core.block_on(self.retrieve_job(id))?
    }

    /// Blocking [`list_devices`](Self::list_devices).
    pub fn blocking_list_devices(&self) -> OqtopusResult<Vec<DeviceRecord>> {
        self.core.block_on(self.list_devices())?
    }
}
