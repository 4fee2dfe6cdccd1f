//! Circuit and operator construction errors.

use crate::qubit::{ClbitId, QubitId};
use thiserror::Error;

/// Errors that can occur while building circuits and operators.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum IrError {
    #[error("qubit {qubit} is outside the circuit{}", format_gate_context(.gate_name))]
    QubitNotFound {
        qubit: QubitId,
        gate_name: Option<String>,
    },

    #[error("classical bit {clbit} is outside the circuit{}", format_gate_context(.gate_name))]
    ClbitNotFound {
        clbit: ClbitId,
        gate_name: Option<String>,
    },

    #[error("{gate_name} acts on {expected} qubits but was given {got}")]
    QubitCountMismatch {
        gate_name: String,
        expected: u32,
        got: u32,
    },

    #[error("qubit {qubit} appears twice{}", format_gate_context(.gate_name))]
    DuplicateQubit {
        qubit: QubitId,
        gate_name: Option<String>,
    },

    #[error("cannot measure {qubits} qubits into {clbits} classical bits")]
    MeasureArity {
        qubits: usize,
        clbits: usize,
    },

    #[error("circuit cannot hold more than {} {kind}", u32::MAX)]
    WireLimit { kind: &'static str },

    /// A Pauli label could not be parsed.
    #[error("bad Pauli label {label:?}: {reason}")]
    InvalidPauliLabel {
        label: String,
        reason: String,
    },
}

#[allow(clippy::ref_option)]
fn format_gate_context(gate_name: &Option<String>) -> String {
    match gate_name {
        Some(name) => format!(" in {name}"),
        None => String::new(),
    }
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qubit_not_found_display() {
        let err = IrError::QubitNotFound {
            qubit: QubitId(4),
            gate_name: Some("cx".into()),
        };
        assert_eq!(
            err.to_string(),
            "qubit q4 is outside the circuit in cx"
        );

        let err = IrError::QubitNotFound {
            qubit: QubitId(4),
            gate_name: None,
        };
        assert_eq!(err.to_string(), "qubit q4 is outside the circuit");
    }

    #[test]
    fn test_invalid_label_display() {
        let err = IrError::InvalidPauliLabel {
            label: "W0".into(),
            reason: "unknown Pauli 'W'".into(),
        };
        assert!(err.to_string().contains("W0"));
    }
}
