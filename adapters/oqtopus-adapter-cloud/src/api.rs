//! OQTOPUS Cloud REST API.
//!
//! This module implements the job and device endpoints of the OQTOPUS Cloud
//! API:
//! - `POST /jobs` to submit a job
//! - `GET /jobs/{job_id}` to fetch one job
//! - `GET /jobs` to list the caller's jobs
//! - `GET /devices` and `GET /devices/{device_id}` to inspect devices
//!
//! [`JobApi`] is the seam between the backends and the network; the
//! production implementation is [`OqtopusClient`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, header};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use crate::config::OqtopusConfig;
use crate::error::{OqtopusError, OqtopusResult};

/// Header carrying the API token.
pub const API_TOKEN_HEADER: &str = "q-api-token";

/// User-Agent sent with requests.
const USER_AGENT: &str = concat!("oqtopus-rs/", env!("CARGO_PKG_VERSION"));

/// Job and device endpoints of OQTOPUS Cloud.
#[async_trait]
pub trait JobApi: Send + Sync {
    /// Submit a job and return the server-assigned id.
    async fn submit_job(&self, request: &SubmitJobRequest) -> OqtopusResult<SubmitJobResponse>;

    /// Fetch the current record of a job.
    async fn get_job(&self, job_id: &str) -> OqtopusResult<JobRecord>;

    /// List the caller's jobs.
    async fn list_jobs(&self) -> OqtopusResult<Vec<JobRecord>>;

    /// List the devices the caller can submit to.
    async fn list_devices(&self) -> OqtopusResult<Vec<DeviceRecord>>;

    /// Fetch one device.
    async fn get_device(&self, device_id: &str) -> OqtopusResult<DeviceRecord>;
}

/// HTTP client for OQTOPUS Cloud.
pub struct OqtopusClient {
    /// HTTP client.
    client: Client,
    /// API base URL without trailing slash.
    base_url: String,
}

impl fmt::Debug for OqtopusClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OqtopusClient")
            .field("base_url", &self.base_url)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

impl OqtopusClient {
    /// Build a client from connection settings.
    pub fn new(config: &OqtopusConfig) -> OqtopusResult<Self> {
        let mut headers = header::HeaderMap::new();
        let mut token = header::HeaderValue::from_str(config.api_token()).map_err(|_| {
            OqtopusError::Configuration("api_token contains invalid header characters".into())
        })?;
        token.set_sensitive(true);
        headers.insert(API_TOKEN_HEADER, token);
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let mut builder = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(10));

        if let Some(proxy) = config.proxy() {
            let proxy = reqwest::Proxy::all(proxy)
                .map_err(|e| OqtopusError::Configuration(format!("invalid proxy: {e}")))?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| OqtopusError::Configuration(format!("cannot build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.url().trim_end_matches('/').to_string(),
        })
    }

    /// API base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Turn a non-success response into a `BackendRequest` error.
    async fn check(response: reqwest::Response) -> OqtopusResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "no body".to_string());
        Err(OqtopusError::BackendRequest {
            status: status.as_u16(),
            message: error_message(&body),
        })
    }
}

#[async_trait]
impl JobApi for OqtopusClient {
    async fn submit_job(&self, request: &SubmitJobRequest) -> OqtopusResult<SubmitJobResponse> {
        let url = format!("{}/jobs", self.base_url);
        let response = self.client.post(&url).json(request).send().await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    async fn get_job(&self, job_id: &str) -> OqtopusResult<JobRecord> {
        let url = format!("{}/jobs/{}", self.base_url, job_id);
        let response = self.client.get(&url).send().await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    async fn list_jobs(&self) -> OqtopusResult<Vec<JobRecord>> {
        let url = format!("{}/jobs", self.base_url);
        let response = self.client.get(&url).send().await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    async fn list_devices(&self) -> OqtopusResult<Vec<DeviceRecord>> {
        let url = format!("{}/devices", self.base_url);
        let response = self.client.get(&url).send().await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    async fn get_device(&self, device_id: &str) -> OqtopusResult<DeviceRecord> {
        let url = format!("{}/devices/{}", self.base_url, device_id);
        let response = self.client.get(&url).send().await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }
}

/// Pull a human-readable message out of an error body.
fn error_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        #[serde(default)]
        message: Option<String>,
        #[serde(default)]
        detail: Option<serde_json::Value>,
    }

    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            message: Some(message),
            ..
        }) => message,
        Ok(ErrorBody {
            detail: Some(serde_json::Value::String(detail)),
            ..
        }) => detail,
        Ok(ErrorBody {
            detail: Some(detail),
            ..
        }) => detail.to_string(),
        _ => body.trim().to_string(),
    }
}

// ============================================================================
// Shared types
// ============================================================================

/// Job type as named on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireJobType {
    /// Single-circuit sampling.
    Sampling,
    /// Several circuits sampled in one job.
    MultiManual,
    /// Expectation value estimation.
    Estimation,
    /// Server-side execution of a user program.
    Sse,
    /// Anything this client does not know.
    #[serde(other)]
    Unknown,
}

impl fmt::Display for WireJobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WireJobType::Sampling => "sampling",
            WireJobType::MultiManual => "multi_manual",
            WireJobType::Estimation => "estimation",
            WireJobType::Sse => "sse",
            WireJobType::Unknown => "unknown",
        };
        write!(f, "{s}")
    }
}

/// One Pauli term of an estimation operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorItem {
    /// Pauli label, e.g. `"X0 Z2"` or `"I"`.
    pub pauli: String,
    /// Real part of the coefficient.
    pub coeff: f64,
    /// Imaginary part of the coefficient.
    #[serde(default)]
    pub coeff_imag: f64,
}

// ============================================================================
// Request types
// ============================================================================

/// Body of `POST /jobs`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmitJobRequest {
    /// Job name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Job description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Target device.
    pub device_id: String,
    /// Job type.
    pub job_type: WireJobType,
    /// Programs and operator.
    pub job_info: SubmitJobInfo,
    /// Transpiler directive; `{}` selects the server default.
    pub transpiler_info: serde_json::Value,
    /// Simulator options.
    pub simulator_info: serde_json::Value,
    /// Error mitigation options.
    pub mitigation_info: serde_json::Value,
    /// Number of shots.
    pub shots: u32,
}

/// Programs (and operator) of a submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmitJobInfo {
    /// OpenQASM 3 programs.
    pub program: Vec<String>,
    /// Observable for estimation jobs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<Vec<OperatorItem>>,
}

// ============================================================================
// Response types
// ============================================================================

/// Body returned by `POST /jobs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitJobResponse {
    /// Server-assigned job id.
    pub job_id: String,
}

/// A job as returned by `GET /jobs/{job_id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    /// Job id.
    pub job_id: String,
    /// Job name.
    #[serde(default)]
    pub name: Option<String>,
    /// Job description.
    #[serde(default)]
    pub description: Option<String>,
    /// Job type.
    pub job_type: WireJobType,
    /// Raw status string (`submitted`, `ready`, `running`, `succeeded`, ...).
    pub status: String,
    /// Target device.
    #[serde(default)]
    pub device_id: String,
    /// Requested shots.
    #[serde(default)]
    pub shots: u32,
    /// Programs, results and messages.
    #[serde(default)]
    pub job_info: JobInfo,
    /// Transpiler directive as stored by the server.
    #[serde(default)]
    pub transpiler_info: Option<serde_json::Value>,
    /// Simulator options as stored by the server.
    #[serde(default)]
    pub simulator_info: Option<serde_json::Value>,
    /// Mitigation options as stored by the server.
    #[serde(default)]
    pub mitigation_info: Option<serde_json::Value>,
    /// Execution time in seconds.
    #[serde(default)]
    pub execution_time: Option<f64>,
    /// Submission timestamp (RFC 3339).
    #[serde(default)]
    pub submitted_at: Option<String>,
    /// Timestamp at which the job became ready.
    #[serde(default)]
    pub ready_at: Option<String>,
    /// Timestamp at which the job started running.
    #[serde(default)]
    pub running_at: Option<String>,
    /// Timestamp at which the job ended.
    #[serde(default)]
    pub ended_at: Option<String>,
}

impl JobRecord {
    /// Submission time, if present and well-formed.
    pub fn submitted_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(self.submitted_at.as_deref())
    }

    /// Time the job became ready, if present and well-formed.
    pub fn ready_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(self.ready_at.as_deref())
    }

    /// Time the job started running, if present and well-formed.
    pub fn running_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(self.running_at.as_deref())
    }

    /// Time the job ended, if present and well-formed.
    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(self.ended_at.as_deref())
    }
}

/// A device as returned by `GET /devices`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceRecord {
    /// Device id, used as `device_id` when submitting.
    pub device_id: String,
    /// `QPU` or `simulator`.
    #[serde(default)]
    pub device_type: Option<String>,
    /// Raw status string (`available`, `unavailable`).
    pub status: String,
    /// When an unavailable device is expected back.
    #[serde(default)]
    pub available_at: Option<String>,
    /// Jobs queued on the device.
    #[serde(default)]
    pub n_pending_jobs: u64,
    #[serde(default)]
    pub n_qubits: Option<u32>,
    /// Native gates, by OpenQASM name.
    #[serde(default)]
    pub basis_gates: Vec<String>,
    /// Non-gate instructions such as `measure` and `barrier`.
    #[serde(default)]
    pub supported_instructions: Vec<String>,
    /// Calibration data, opaque to this client.
    #[serde(default)]
    pub device_info: Option<serde_json::Value>,
    #[serde(default)]
    pub calibrated_at: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl DeviceRecord {
    /// Whether the device currently accepts jobs.
    pub fn is_available(&self) -> bool {
        self.status == "available"
    }

    pub fn available_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(self.available_at.as_deref())
    }

    pub fn calibrated_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(self.calibrated_at.as_deref())
    }
}

fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw?)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

/// `job_info` of a job record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobInfo {
    /// Submitted programs.
    #[serde(default)]
    pub program: Vec<String>,
    /// Submitted operator (estimation jobs).
    #[serde(default)]
    pub operator: Option<Vec<OperatorItem>>,
    /// Result payload once the job succeeded.
    #[serde(default)]
    pub result: Option<JobResultPayload>,
    /// Server message, e.g. the failure reason.
    #[serde(default)]
    pub message: Option<String>,
    /// Transpiler output.
    #[serde(default)]
    pub transpile_result: Option<serde_json::Value>,
}

/// `job_info.result`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobResultPayload {
    /// Sampling outcome.
    #[serde(default)]
    pub sampling: Option<SamplingPayload>,
    /// Estimation outcome.
    #[serde(default)]
    pub estimation: Option<EstimationPayload>,
}

/// `job_info.result.sampling`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplingPayload {
    /// Aggregate counts.
    pub counts: CountsPayload,
    /// Per-circuit counts for `multi_manual` jobs.
    #[serde(default)]
    pub divided_counts: Option<DividedCountsPayload>,
}

/// Counts, either as an object or as a JSON-encoded string of one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CountsPayload {
    /// `{"00": 490, "11": 510}`
    Map(BTreeMap<String, u64>),
    /// `"{\"00\": 490, \"11\": 510}"`
    Encoded(String),
}

/// Per-circuit counts, either as an object or as a JSON-encoded string of one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DividedCountsPayload {
    /// `{"0": {"00": 10}, "1": {"1": 10}}`
    Map(BTreeMap<String, BTreeMap<String, u64>>),
    /// The same object, JSON-encoded.
    Encoded(String),
}

/// `job_info.result.estimation`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EstimationPayload {
    /// Real part of the expectation value.
    #[serde(default)]
    pub exp_value: Option<f64>,
    /// Imaginary part of the expectation value.
    #[serde(default)]
    pub exp_value_imag: Option<f64>,
    /// Standard deviation.
    #[serde(default)]
    pub stds: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned HTTP response on a local port and return its base URL.
    async fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();
        });
        format!("http://{addr}")
    }

    fn client_for(url: &str) -> OqtopusClient {
        OqtopusClient::new(&OqtopusConfig::new(url, "token")).unwrap()
    }

    #[tokio::test]
    async fn test_error_status_maps_to_backend_request() {
        let url = serve_once("400 Bad Request", r#"{"message":"unknown device"}"#).await;
        let err = client_for(&url).get_job("job-1").await.unwrap_err();
        assert_eq!(
            err,
            OqtopusError::BackendRequest {
                status: 400,
                message: "unknown device".into(),
            }
        );
        assert!(!err.is_transient());
    }

    #[tokio::test]
    async fn test_server_error_is_transient() {
        let url = serve_once("503 Service Unavailable", "maintenance").await;
        let err = client_for(&url).list_jobs().await.unwrap_err();
        assert!(matches!(
            err,
            OqtopusError::BackendRequest { status: 503, ref message } if message == "maintenance"
        ));
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn test_refused_connection_maps_to_backend_connection() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client_for(&format!("http://{addr}"))
            .get_job("job-1")
            .await
            .unwrap_err();
        assert!(matches!(err, OqtopusError::BackendConnection(_)), "{err:?}");
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn test_malformed_body_maps_to_invalid_response() {
        let url = serve_once("200 OK", r#"{"job_id": 42"#).await;
        let err = client_for(&url).get_job("job-1").await.unwrap_err();
        assert!(matches!(err, OqtopusError::InvalidResponse(_)), "{err:?}");
    }

    #[tokio::test]
    async fn test_list_devices_over_http() {
        let url = serve_once(
            "200 OK",
            r#"[{"device_id": "Kawasaki", "device_type": "QPU", "status": "available", "n_pending_jobs": 3, "n_qubits": 64, "basis_gates": ["sx", "rz", "cx"]}]"#,
        )
        .await;
        let devices = client_for(&url).list_devices().await.unwrap();
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].device_id, "Kawasaki");
        assert_eq!(devices[0].n_pending_jobs, 3);
        assert!(devices[0].is_available());
    }

    #[test]
    fn test_submit_request_serialization() {
        let request = SubmitJobRequest {
            name: Some("bell".into()),
            description: None,
            device_id: "sim".into(),
            job_type: WireJobType::Sampling,
            job_info: SubmitJobInfo {
                program: vec!["OPENQASM 3;".into()],
                operator: None,
            },
            transpiler_info: json!({}),
            simulator_info: json!({}),
            mitigation_info: json!({}),
            shots: 1000,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "bell",
                "device_id": "sim",
                "job_type": "sampling",
                "job_info": {"program": ["OPENQASM 3;"]},
                "transpiler_info": {},
                "simulator_info": {},
                "mitigation_info": {},
                "shots": 1000
            })
        );
    }

    #[test]
    fn test_job_type_wire_names() {
        assert_eq!(
            serde_json::to_value(WireJobType::MultiManual).unwrap(),
            json!("multi_manual")
        );
        let parsed: WireJobType = serde_json::from_value(json!("something_new")).unwrap();
        assert_eq!(parsed, WireJobType::Unknown);
    }

    #[test]
    fn test_job_record_deserialization() {
        let record: JobRecord = serde_json::from_value(json!({
            "job_id": "7af020f6-2e7f-4f05-b3f8-7f59be0a5e31",
            "name": "Bell State Sampling",
            "description": null,
            "job_type": "sampling",
            "status": "succeeded",
            "device_id": "Kawasaki",
            "shots": 1000,
            "job_info": {
                "program": ["OPENQASM 3;"],
                "result": {"sampling": {"counts": {"00": 490, "11": 510}}},
                "message": null
            },
            "transpiler_info": {"transpiler_lib": "qiskit"},
            "simulator_info": {},
            "mitigation_info": {},
            "execution_time": 2.5,
            "submitted_at": "2024-10-30T08:00:00Z",
            "ended_at": "2024-10-30T08:00:05+00:00"
        }))
        .unwrap();

        assert_eq!(record.job_type, WireJobType::Sampling);
        assert_eq!(record.shots, 1000);
        assert_eq!(record.execution_time, Some(2.5));
        let sampling = record.job_info.result.as_ref().unwrap().sampling.as_ref().unwrap();
        assert!(matches!(sampling.counts, CountsPayload::Map(ref m) if m["00"] == 490));
        assert!(record.submitted_at().is_some());
        assert!(record.ended_at().unwrap() > record.submitted_at().unwrap());
        assert!(record.running_at().is_none());
    }

    #[test]
    fn test_minimal_job_record() {
        let record: JobRecord = serde_json::from_value(json!({
            "job_id": "j",
            "job_type": "estimation",
            "status": "submitted"
        }))
        .unwrap();
        assert!(record.job_info.result.is_none());
        assert!(record.job_info.program.is_empty());
    }

    #[test]
    fn test_encoded_counts() {
        let payload: SamplingPayload =
            serde_json::from_value(json!({"counts": "{\"0\": 5}"})).unwrap();
        assert!(matches!(payload.counts, CountsPayload::Encoded(ref s) if s.contains('5')));
    }

    #[test]
    fn test_bad_timestamp_is_none() {
        let record: JobRecord = serde_json::from_value(json!({
            "job_id": "j",
            "job_type": "sampling",
            "status": "ready",
            "submitted_at": "yesterday"
        }))
        .unwrap();
        assert!(record.submitted_at().is_none());
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(error_message(r#"{"message": "device not found"}"#), "device not found");
        assert_eq!(error_message(r#"{"detail": "bad shots"}"#), "bad shots");
        assert_eq!(
            error_message(r#"{"detail": [{"loc": ["body"]}]}"#),
            r#"[{"loc":["body"]}]"#
        );
        assert_eq!(error_message("  upstream timeout \n"), "upstream timeout");
    }

    #[test]
    fn test_device_record_deserialization() {
        let device: DeviceRecord = serde_json::from_value(json!({
            "device_id": "SC",
            "device_type": "QPU",
            "status": "unavailable",
            "available_at": "2024-10-31T09:00:00Z",
            "n_pending_jobs": 0,
            "n_qubits": 64,
            "basis_gates": ["sx", "x", "rz", "cx"],
            "supported_instructions": ["measure", "barrier"],
            "device_info": "{\"calibration\": {}}",
            "calibrated_at": "2024-10-30T23:00:00+09:00",
            "description": "superconducting device"
        }))
        .unwrap();
        assert!(!device.is_available());
        assert_eq!(device.basis_gates.len(), 4);
        assert!(device.available_at().unwrap() > device.calibrated_at().unwrap());
        assert!(matches!(device.device_info, Some(serde_json::Value::String(_))));

        let minimal: DeviceRecord =
            serde_json::from_value(json!({"device_id": "sim", "status": "available"})).unwrap();
        assert_eq!(minimal.n_qubits, None);
        assert!(minimal.supported_instructions.is_empty());
    }

    #[test]
    fn test_client_debug_redacts_token() {
        let config = OqtopusConfig::new("https://example.com/api/", "secret-token");
        let client = OqtopusClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "https://example.com/api");
        let debug = format!("{client:?}");
        assert!(!debug.contains("secret-token"));
    }

    #[test]
    fn test_client_rejects_bad_token() {
        let config = OqtopusConfig::new("https://example.com", "bad\ntoken");
        assert!(matches!(
            OqtopusClient::new(&config),
            Err(OqtopusError::Configuration(_))
        ));
    }
}
