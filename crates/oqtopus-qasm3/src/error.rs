//! Error types for QASM emission and parsing.

use oqtopus_ir::IrError;
use thiserror::Error;

/// Errors that can occur while emitting or parsing OpenQASM.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum QasmError {
    /// Lexer error (invalid token).
    #[error("Lexer error at line {line}: {message}")]
    LexerError { line: usize, message: String },

    /// Unexpected token.
    #[error("Unexpected token at line {line}: expected {expected}, found {found}")]
    UnexpectedToken {
        line: usize,
        expected: String,
        found: String,
    },

    /// Unexpected end of input.
    #[error("Unexpected end of input: {0}")]
    UnexpectedEof(String),

    /// Invalid version.
    #[error("Invalid OPENQASM version: {0}")]
    InvalidVersion(String),

    /// Register used before declaration.
    #[error("Undefined register: {0}")]
    UndefinedRegister(String),

    /// Duplicate declaration.
    #[error("Duplicate declaration: {0}")]
    DuplicateDeclaration(String),

    /// Register declaration larger than the parser accepts.
    #[error("Register '{name}' declares {size} bits, more than the supported {max}", max = crate::parser::MAX_REGISTER_SIZE)]
    RegisterTooLarge { name: String, size: u32 },

    /// Gate name or parameter count not recognised.
    #[error("Unknown gate: {name} with {params} parameter(s)")]
    UnknownGate { name: String, params: usize },

    /// Index out of bounds.
    #[error("Index {index} out of bounds for register '{register}' of size {size}")]
    IndexOutOfBounds {
        register: String,
        index: usize,
        size: usize,
    },

    /// Register operands of different sizes in one statement.
    #[error("Line {line}: register operands have mismatched sizes")]
    BroadcastMismatch { line: usize },

    /// NaN or infinite gate parameter.
    #[error("Gate '{gate}' has non-finite parameter {value}")]
    NonFiniteParameter { gate: String, value: f64 },

    /// IR error during circuit construction.
    #[error("Circuit error: {0}")]
    CircuitError(#[from] IrError),
}

/// Result type for QASM operations.
pub type QasmResult<T> = Result<T, QasmError>;
