//! Shared submission, retrieval and listing logic of the backends.

use std::future::Future;
use std::sync::{Arc, OnceLock};

use serde_json::Value;
use tracing::{debug, info};

use tokio::runtime::{Builder, Handle, Runtime};

use crate::api::{
    DeviceRecord, JobApi, JobRecord, OperatorItem, OqtopusClient, SubmitJobInfo,
    SubmitJobRequest, WireJobType,
};
use crate::cache::JobCache;
use crate::config::OqtopusConfig;
use crate::error::{OqtopusError, OqtopusResult};
use crate::job::{
    EstimationJob, Job, JobId, JobKind, JobOutput, JobStatus, PollConfig, SamplingJob,
    terminal_outcome,
};
use crate::result::{EstimationResult, SamplingResult};
use crate::transpiler::TranspilerInfo;

/// Optional fields of a submission.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmitOptions {
    /// Job name.
    pub name: Option<String>,
    /// Job description.
    pub description: Option<String>,
    /// Transpiler directive; `None` applies the service default.
    pub transpiler: Option<TranspilerInfo>,
    /// Simulator options, passed through as a JSON object.
    pub simulator_info: Option<Value>,
    /// Error mitigation options, passed through as a JSON object.
    pub mitigation_info: Option<Value>,
}

impl SubmitOptions {
    /// Empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the job name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the job description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the transpiler directive.
    pub fn with_transpiler(mut self, transpiler: TranspilerInfo) -> Self {
        self.transpiler = Some(transpiler);
        self
    }

    /// Set simulator options.
    pub fn with_simulator_info(mut self, info: Value) -> Self {
        self.simulator_info = Some(info);
        self
    }

    /// Set mitigation options.
    pub fn with_mitigation_info(mut self, info: Value) -> Self {
        self.mitigation_info = Some(info);
        self
    }

    fn validate(&self) -> OqtopusResult<()> {
        if let Some(transpiler) = &self.transpiler {
            transpiler.validate()?;
        }
        for (field, value) in [
            ("simulator_info", &self.simulator_info),
            ("mitigation_info", &self.mitigation_info),
        ] {
            if matches!(value, Some(v) if !v.is_object()) {
                return Err(OqtopusError::InvalidParameter(format!(
                    "{field} must be a JSON object"
                )));
            }
        }
        Ok(())
    }
}

/// Check the scalar arguments of a submission before anything is translated
/// or sent.
pub(crate) fn validate_submission(
    device_id: &str,
    shots: u32,
    options: &SubmitOptions,
) -> OqtopusResult<()> {
    if shots < 1 {
        return Err(OqtopusError::InvalidParameter(
            "shots should be a positive integer".into(),
        ));
    }
    if device_id.trim().is_empty() {
        return Err(OqtopusError::InvalidParameter(
            "device_id must not be empty".into(),
        ));
    }
    options.validate()
}

/// A job handle whose kind was only known after fetching it.
#[derive(Debug, Clone)]
pub enum RetrievedJob {
    /// A `sampling` or `multi_manual` job.
    Sampling(SamplingJob),
    /// An `estimation` job.
    Estimation(EstimationJob),
}

impl RetrievedJob {
    /// Job id.
    pub fn id(&self) -> &JobId {
        match self {
            RetrievedJob::Sampling(job) => job.id(),
            RetrievedJob::Estimation(job) => job.id(),
        }
    }

    /// Job kind.
    pub fn kind(&self) -> JobKind {
        match self {
            RetrievedJob::Sampling(_) => JobKind::Sampling,
            RetrievedJob::Estimation(_) => JobKind::Estimation,
        }
    }

    /// The sampling handle, if this is a sampling job.
    pub fn into_sampling(self) -> Option<SamplingJob> {
        match self {
            RetrievedJob::Sampling(job) => Some(job),
            RetrievedJob::Estimation(_) => None,
        }
    }

    /// The estimation handle, if this is an estimation job.
    pub fn into_estimation(self) -> Option<EstimationJob> {
        match self {
            RetrievedJob::Estimation(job) => Some(job),
            RetrievedJob::Sampling(_) => None,
        }
    }
}

/// State shared by a backend and the jobs it hands out.
pub(crate) struct BackendCore {
    pub(crate) api: Arc<dyn JobApi>,
    pub(crate) cache: Arc<JobCache>,
    pub(crate) poll: PollConfig,
    /// Runtime behind the `blocking_*` methods, started on first use.
    runtime: Arc<OnceLock<Runtime>>,
}

impl BackendCore {
    pub(crate) fn from_config(config: &OqtopusConfig) -> OqtopusResult<Arc<Self>> {
        let client = OqtopusClient::new(config)?;
        Ok(Self::from_api(Arc::new(client)))
    }

    pub(crate) fn from_api(api: Arc<dyn JobApi>) -> Arc<Self> {
        Arc::new(Self {
            api,
            cache: Arc::new(JobCache::new()),
            poll: PollConfig::default(),
            runtime: Arc::new(OnceLock::new()),
        })
    }

    /// Same API and cache, different poll settings.
    pub(crate) fn with_poll(&self, poll: PollConfig) -> Arc<Self> {
        Arc::new(Self {
            api: Arc::clone(&self.api),
            cache: Arc::clone(&self.cache),
            poll,
            runtime: Arc::clone(&self.runtime),
        })
    }

    /// Drive `future` to completion on the shared current-thread runtime.
    ///
    /// The HTTP client's pooled connections are bound to the runtime that
    /// opened them, so every blocking call goes through this one.
    pub(crate) fn block_on<F: Future>(&self, future: F) -> OqtopusResult<F::Output> {
        if Handle::try_current().is_ok() {
            return Err(OqtopusError::Unsupported(
                "blocking call inside an async runtime; use the async method instead".into(),
            ));
        }
        if self.runtime.get().is_none() {
            let runtime = Builder::new_current_thread()
                .enable_all()
                .build()
                .map_err(|e| OqtopusError::Unsupported(format!("cannot start a runtime: {e}")))?;
            // A concurrent caller may have won; its runtime is kept.
            let _ = self.runtime.set(runtime);
        }
        let runtime = self
            .runtime
            .get()
            .ok_or_else(|| OqtopusError::Unsupported("blocking runtime unavailable".into()))?;
        Ok(runtime.block_on(future))
    }

    /// Submit one job and register it as pending.
    pub(crate) async fn submit<R: JobOutput>(
        self: &Arc<Self>,
        job_type: WireJobType,
        device_id: &str,
        shots: u32,
        program: Vec<String>,
        operator: Option<Vec<OperatorItem>>,
        options: &SubmitOptions,
    ) -> OqtopusResult<Job<R>> {
        let request = SubmitJobRequest {
            name: options.name.clone(),
            description: options.description.clone(),
            device_id: device_id.to_string(),
            job_type,
            job_info: SubmitJobInfo { program, operator },
            transpiler_info: TranspilerInfo::to_wire(options.transpiler.as_ref()),
            simulator_info: options
                .simulator_info
                .clone()
                .unwrap_or_else(|| Value::Object(Default::default())),
            mitigation_info: options
                .mitigation_info
                .clone()
                .unwrap_or_else(|| Value::Object(Default::default())),
            shots,
        };

        debug!(%job_type, device_id, shots, "submitting job");
        let response = self.api.submit_job(&request).await?;
        let id = JobId::from(response.job_id);
        self.cache.register_pending(&id).await;
        info!(job_id = %id, %job_type, device_id, shots, "job submitted");

        Ok(Job::new(id, Arc::clone(self)))
    }

    /// Fetch a job and wrap it in a handle matching its type.
    pub(crate) async fn retrieve(self: &Arc<Self>, id: &JobId) -> OqtopusResult<RetrievedJob> {
        let record = self.api.get_job(id.as_str()).await?;
        match record.job_type {
            WireJobType::Sampling | WireJobType::MultiManual => {
                self.adopt::<SamplingResult>(id, record).await;
                Ok(RetrievedJob::Sampling(Job::new(id.clone(), Arc::clone(self))))
            }
            WireJobType::Estimation => {
                self.adopt::<EstimationResult>(id, record).await;
                Ok(RetrievedJob::Estimation(Job::new(
                    id.clone(),
                    Arc::clone(self),
                )))
            }
            other => Err(OqtopusError::Unsupported(format!(
                "job {id} has type '{other}', which this client cannot handle"
            ))),
        }
    }

    /// Record a fetched job; terminal jobs are settled right away.
    async fn adopt<R: JobOutput>(&self, id: &JobId, record: JobRecord) {
        let slot = self.cache.slot(id).await;
        let _poll = slot.lock_poll().await;
        let status = JobStatus::from_wire(&record.status);
        if status.is_terminal() {
            let outcome = terminal_outcome::<R>(id, status, &record);
            slot.observe(status, record).await;
            let _ = slot.settle(status, outcome).await;
        } else {
            slot.observe(status, record).await;
        }
        debug!(job_id = %id, %status, "retrieved job");
    }

    pub(crate) async fn list_jobs(&self) -> OqtopusResult<Vec<JobRecord>> {
        self.api.list_jobs().await
    }

    pub(crate) async fn list_devices(&self) -> OqtopusResult<Vec<DeviceRecord>> {
        let devices = self.api.list_devices().await?;
        debug!(count = devices.len(), "listed devices");
        Ok(devices)
    }

    pub(crate) async fn get_device(&self, device_id: &str) -> OqtopusResult<DeviceRecord> {
        if device_id.trim().is_empty() {
            return Err(OqtopusError::InvalidParameter(
                "device_id must not be empty".into(),
            ));
        }
        self.api.get_device(device_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validate_shots() {
        let err = validate_submission("sim", 0, &SubmitOptions::default()).unwrap_err();
        assert_eq!(
            err,
            OqtopusError::InvalidParameter("shots should be a positive integer".into())
        );
        assert!(validate_submission("sim", 1, &SubmitOptions::default()).is_ok());
    }

    #[test]
    fn test_validate_device() {
        assert!(matches!(
            validate_submission(" ", 10, &SubmitOptions::default()),
            Err(OqtopusError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_validate_options() {
        let options = SubmitOptions::new().with_transpiler(TranspilerInfo::named(""));
        assert!(validate_submission("sim", 10, &options).is_err());

        let options = SubmitOptions::new().with_simulator_info(json!([1, 2]));
        assert!(validate_submission("sim", 10, &options).is_err());

        let options = SubmitOptions::new()
            .with_name("bell")
            .with_description("two qubits")
            .with_transpiler(TranspilerInfo::Disabled)
            .with_simulator_info(json!({"n_qubits": 2}))
            .with_mitigation_info(json!({"ro_error_mitigation": "pseudo_inverse"}));
        assert!(validate_submission("sim", 10, &options).is_ok());
        assert_eq!(options.name.as_deref(), Some("bell"));
    }
}
