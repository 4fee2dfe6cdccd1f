//! OQTOPUS Cloud adapter
//!
//! Sampling and expectation value estimation on OQTOPUS Cloud: circuits are
//! translated to the service's OpenQASM 3 subset, submitted over the REST
//! API, polled until they end and decoded into typed results.
//!
//! # Architecture
//!
//! ```text
//!   Circuit / Operator
//!          │  translate (gate check, OpenQASM 3, Pauli terms)
//!          ▼
//!   SamplingBackend / EstimationBackend ──→ JobApi (POST /jobs)
//!          │
//!          ▼
//!   Job<R> ── result() ──→ poll GET /jobs/{id} ──→ JobCache ──→ R
//! ```
//!
//! Each backend owns a [`JobCache`]. Once a job is observed terminal its
//! result (or failure) is cached and later `result()` calls return it
//! without touching the network.
//!
//! # Authentication
//!
//! Credentials come from the environment:
//!
//! ```bash
//! export OQTOPUS_URL="https://api.example.com/qiqb"
//! export OQTOPUS_API_TOKEN="your-token"
//! export OQTOPUS_PROXY="http://proxy:3128"  # optional
//! ```
//!
//! or from `~/.oqtopus`:
//!
//! ```ini
//! [default]
//! url = https://api.example.com/qiqb
//! api_token = your-token
//! ```
//!
//! # Example
//!
//! ```ignore
//! use oqtopus_adapter_cloud::{SamplingBackend, SubmitOptions, TranspilerInfo};
//! use oqtopus_ir::Circuit;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let backend = SamplingBackend::load(None)?;
//!
//!     let circuit = Circuit::bell()?;
//!     let options = SubmitOptions::new()
//!         .with_name("bell")
//!         .with_transpiler(TranspilerInfo::named("qiskit"));
//!     let job = backend.sample(&circuit, "Kawasaki", 1000, &options).await?;
//!
//!     let result = job.result().await?;
//!     println!("Counts: {}", result.counts);
//!     Ok(())
//! }
//! ```
//!
//! Synchronous callers use the `blocking_*` forms instead, which share one
//! runtime per backend:
//!
//! ```ignore
//! let backend = SamplingBackend::load(None)?;
//! let job = backend.blocking_sample(&Circuit::bell()?, "Kawasaki", 1000, &SubmitOptions::new())?;
//! let counts = job.blocking_result()?.counts;
//! ```
//!
//! # Devices
//!
//! `list_devices()` and `get_device(id)` return [`DeviceRecord`]s with the
//! device status, queue length, qubit count and basis gates.

pub mod api;
mod backend;
mod cache;
pub mod config;
mod error;
mod estimation;
mod job;
pub mod mock;
mod result;
mod sampling;
pub mod translate;
mod transpiler;

pub use api::{DeviceRecord, JobApi, JobRecord, OqtopusClient};
pub use backend::{RetrievedJob, SubmitOptions};
pub use cache::{CacheEntry, JobCache, JobOutcome};
pub use config::OqtopusConfig;
pub use error::{OqtopusError, OqtopusResult};
pub use estimation::EstimationBackend;
pub use job::{
    EstimationJob, Job, JobId, JobKind, JobOutput, JobStatus, PollConfig, SamplingJob,
};
pub use result::{Counts, EstimationResult, ResultWarning, SamplingResult};
pub use sampling::SamplingBackend;
pub use transpiler::TranspilerInfo;

// Re-export the circuit types the backends consume
pub use oqtopus_ir::{Circuit, Operator, PauliLabel};
