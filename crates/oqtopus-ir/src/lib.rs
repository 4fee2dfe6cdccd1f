//! Circuit and operator representation for the OQTOPUS client.
//!
//! This crate holds the in-memory inputs the cloud adapters consume: a
//! [`Circuit`] of gate instructions and an [`Operator`] made of Pauli terms.
//!
//! # Example: Building a Bell State
//!
//! ```rust
//! use oqtopus_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::with_size("bell_state", 2, 0);
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//!
//! assert_eq!(circuit.num_qubits(), 2);
//! assert_eq!(circuit.depth(), 2);
//! ```
//!
//! # Example: An Observable
//!
//! ```rust
//! use oqtopus_ir::{Operator, PauliLabel};
//!
//! let op = Operator::new()
//!     .with_term("X0 X1".parse::<PauliLabel>().unwrap(), 1.0)
//!     .with_term("Z0 Z1".parse::<PauliLabel>().unwrap(), 1.0);
//! assert_eq!(op.len(), 2);
//! ```

pub mod circuit;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod operator;
pub mod qubit;

pub use circuit::Circuit;
pub use error::{IrError, IrResult};
pub use gate::{CustomGate, Gate, StandardGate};
pub use instruction::{Instruction, InstructionKind};
pub use num_complex::Complex64;
pub use operator::{Operator, Pauli, PauliLabel};
pub use qubit::{ClbitId, QubitId};
