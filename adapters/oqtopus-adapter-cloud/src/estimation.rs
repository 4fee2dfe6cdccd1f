//! Estimation backend.

use std::sync::Arc;

use oqtopus_ir::{Circuit, Operator};

use crate::api::{DeviceRecord, JobApi, JobRecord, WireJobType};
use crate::backend::{BackendCore, RetrievedJob, SubmitOptions, validate_submission};
use crate::cache::JobCache;
use crate::config::OqtopusConfig;
use crate::error::{OqtopusError, OqtopusResult};
use crate::job::{EstimationJob, JobId, PollConfig};
use crate::translate::{circuit_to_program, operator_to_items};

/// Submits expectation value estimation jobs to OQTOPUS Cloud.
#[derive(Clone)]
pub struct EstimationBackend {
    core: Arc<BackendCore>,
}

impl std::fmt::Debug for EstimationBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EstimationBackend")
            .field("poll", &self.core.poll)
            .finish_non_exhaustive()
    }
}

impl EstimationBackend {
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

    /// Estimate the expectation value of `operator` on the state prepared by
    /// `circuit`.
    ///
    /// The circuit is sent without measurements added.
    pub async fn estimate(
        &self,
        circuit: &Circuit,
        operator: &Operator,
        device_id: &str,
        shots: u32,
        options: &SubmitOptions,
    ) -> OqtopusResult<EstimationJob> {
        validate_submission(device_id, shots, options)?;
        let items = operator_items(operator)?;
        let program = circuit_to_program(circuit)?;
        self.core
            .submit(
                WireJobType::Estimation,
                device_id,
                shots,
                vec![program],
                Some(items),
                options,
            )
            .await
    }

    /// Estimate with raw OpenQASM 3 programs.
    ///
    /// The gate set is not checked locally.
    pub async fn estimate_qasm(
        &self,
        programs: &[String],
        operator: &Operator,
        device_id: &str,
        shots: u32,
        options: &SubmitOptions,
    ) -> OqtopusResult<EstimationJob> {
        validate_submission(device_id, shots, options)?;
        if programs.is_empty() {
            return Err(OqtopusError::InvalidParameter(
                "at least one program is required".into(),
            ));
        }
        let items = operator_items(operator)?;
        self.core
            .submit(
                WireJobType::Estimation,
                device_id,
                shots,
                programs.to_vec(),
                Some(items),
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

    /// Blocking [`estimate`](Self::estimate), on the backend's own runtime.
    ///
    /// Fails with `Unsupported` when called from inside an async runtime.
    pub fn blocking_estimate(
        &self,
        circuit: &Circuit,
        operator: &Operator,
        device_id: &str,
        shots: u32,
        options: &SubmitOptions,
    ) -> OqtopusResult<EstimationJob> {
        self.core
            .block_on(self.estimate(circuit, operator, device_id, shots, options))?
    }

    /// Blocking [`estimate_qasm`](Self::estimate_qasm).
    pub fn blocking_estimate_qasm(
        &self,
        programs: &[String],
        operator: &Operator,
        device_id: &str,
        shots: u32,
        options: &SubmitOptions,
    ) -> OqtopusResult<EstimationJob> {
        self.core
            .block_on(self.estimate_qasm(programs, operator, device_id, shots, options))?
    }

    /// Blocking [`retrieve_job`](Self::retrieve_job).
    pub fn blocking_retrieve_job(&self, id: impl Into<JobId>) -> OqtopusResult<RetrievedJob> {
        self.core.block_on(self.retrieve_job(id))?
    }
}

fn operator_items(operator: &Operator) -> OqtopusResult<Vec<crate::api::OperatorItem>> {
    if operator.is_empty() {
        return Err(OqtopusError::InvalidParameter(
            "operator has no terms".into(),
        ));
    }
    Ok(operator_to_items(operator))
}
