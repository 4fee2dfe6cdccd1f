//! OpenQASM 3 emitter and subset parser.
//!
//! The emitter writes the restricted OpenQASM 3 dialect submitted to the
//! OQTOPUS cloud: one `qubit` register, one `bit` register, `stdgates.inc`
//! gate calls with literal parameters, `measure`, `reset` and `barrier`.
//! The parser reads that dialect back (plus register broadcast, several
//! registers and constant arithmetic in parameters), so programs can be
//! loaded from files and emitted circuits can be checked by round-trip.
//!
//! # Example: Emitting QASM
//!
//! ```rust
//! use oqtopus_ir::Circuit;
//! use oqtopus_qasm3::emit;
//!
//! let circuit = Circuit::bell().unwrap();
//! let qasm = emit(&circuit).unwrap();
//! assert!(qasm.starts_with("OPENQASM 3;"));
//! assert!(qasm.contains("cx q[0], q[1];"));
//! ```
//!
//! # Example: Round-Trip
//!
//! ```rust
//! use oqtopus_ir::Circuit;
//! use oqtopus_qasm3::{emit, parse};
//!
//! let mut circuit = Circuit::ghz(3).unwrap();
//! circuit.measure_all().unwrap();
//!
//! let reparsed = parse(&emit(&circuit).unwrap()).unwrap();
//! assert_eq!(reparsed.instructions(), circuit.instructions());
//! ```

mod emitter;
mod error;
mod lexer;
mod parser;

pub use emitter::emit;
pub use error::{QasmError, QasmResult};
pub use parser::{MAX_REGISTER_SIZE, parse};
