//! Error types for the OQTOPUS Cloud adapter.

use std::time::Duration;

use oqtopus_qasm3::QasmError;
use thiserror::Error;

use crate::job::{JobId, JobStatus};

/// Result type for OQTOPUS operations.
pub type OqtopusResult<T> = Result<T, OqtopusError>;

/// Errors that can occur when using OQTOPUS Cloud.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum OqtopusError {
    /// Missing or malformed credentials.
    #[error("OQTOPUS configuration error: {0}")]
    Configuration(String),

    /// The circuit uses a gate the service does not accept.
    #[error("Gate '{gate}' is not supported by OQTOPUS Cloud")]
    UnsupportedGate {
        /// Gate name as written in OpenQASM.
        gate: String,
    },

    /// Transport-level failure: DNS, TLS, connect or read timeout.
    #[error("Connection to OQTOPUS Cloud failed: {0}")]
    BackendConnection(String),

    /// The server rejected the request.
    #[error("OQTOPUS Cloud rejected the request (HTTP {status}): {message}")]
    BackendRequest {
        /// HTTP status code.
        status: u16,
        /// Message reported by the server.
        message: String,
    },

    /// The job ended as failed or cancelled.
    #[error("Job {job_id} ended with status {status}: {reason}")]
    JobFailed {
        /// Job id.
        job_id: JobId,
        /// Terminal status.
        status: JobStatus,
        /// Reason reported by the server.
        reason: String,
    },

    /// Waiting for a job exceeded the configured limit.
    #[error("Timed out after {elapsed:?} waiting for job {job_id}")]
    PollTimeout {
        /// Job id.
        job_id: JobId,
        /// Time spent waiting.
        elapsed: Duration,
    },

    /// Invalid argument supplied by the caller.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Response payload could not be decoded.
    #[error("Invalid response from OQTOPUS Cloud: {0}")]
    InvalidResponse(String),

    /// The operation is not supported for this job.
    #[error("Unsupported: {0}")]
    Unsupported(String),

    /// Circuit could not be written as OpenQASM.
    #[error("Circuit translation failed: {0}")]
    Translation(#[from] QasmError),

    /// JSON encoding or decoding error.
    #[error("JSON error: {0}")]
    Json(String),
}

impl OqtopusError {
    /// Whether a poll that failed with this error may be retried.
    ///
    /// Connection failures, throttling and server-side errors are transient;
    /// client errors and decoding failures are not.
    pub fn is_transient(&self) -> bool {
        match self {
            OqtopusError::BackendConnection(_) => true,
            OqtopusError::BackendRequest { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for OqtopusError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            OqtopusError::InvalidResponse(e.to_string())
        } else {
            OqtopusError::BackendConnection(e.to_string())
        }
    }
}

impl From<serde_json::Error> for OqtopusError {
    fn from(e: serde_json::Error) -> Self {
        OqtopusError::Json(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- Display message tests --

    #[test]
    fn test_configuration_display() {
        let err = OqtopusError::Configuration("api_token is missing".into());
        assert!(err.to_string().contains("api_token is missing"));
    }

    #[test]
    fn test_unsupported_gate_display() {
        let err = OqtopusError::UnsupportedGate {
            gate: "iswap".into(),
        };
        assert_eq!(
            err.to_string(),
            "Gate 'iswap' is not supported by OQTOPUS Cloud"
        );
    }

    #[test]
    fn test_backend_request_display() {
        let err = OqtopusError::BackendRequest {
            status: 400,
            message: "unknown device 'nope'".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("400"));
        assert!(msg.contains("unknown device"));
    }

    #[test]
    fn test_job_failed_display() {
        let err = OqtopusError::JobFailed {
            job_id: JobId::from("job-1"),
            status: JobStatus::Failed,
            reason: "device offline".into(),
        };
        assert_eq!(
            err.to_string(),
            "Job job-1 ended with status failed: device offline"
        );
    }

    #[test]
    fn test_poll_timeout_display() {
        let err = OqtopusError::PollTimeout {
            job_id: JobId::from("job-2"),
            elapsed: Duration::from_secs(30),
        };
        assert!(err.to_string().contains("job-2"));
        assert!(err.to_string().contains("30s"));
    }

    #[test]
    fn test_translation_from_qasm_error() {
        let err: OqtopusError = QasmError::NonFiniteParameter {
            gate: "rx".into(),
            value: f64::INFINITY,
        }
        .into();
        assert!(matches!(err, OqtopusError::Translation(_)));
    }

    #[test]
    fn test_json_from_serde_error() {
        let serde_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: OqtopusError = serde_err.into();
        assert!(matches!(err, OqtopusError::Json(_)));
    }

    // -- Retry classification --

    #[test]
    fn test_transient_classification() {
        assert!(OqtopusError::BackendConnection("reset".into()).is_transient());
        assert!(
            OqtopusError::BackendRequest {
                status: 503,
                message: String::new()
            }
            .is_transient()
        );
        assert!(
            OqtopusError::BackendRequest {
                status: 429,
                message: String::new()
            }
            .is_transient()
        );
        assert!(
            !OqtopusError::BackendRequest {
                status: 404,
                message: String::new()
            }
            .is_transient()
        );
        assert!(!OqtopusError::InvalidResponse("bad".into()).is_transient());
    }
}
