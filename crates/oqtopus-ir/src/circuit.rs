//! Flat, validated circuit builder.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::{Gate, StandardGate};
use crate::instruction::Instruction;
use crate::qubit::{ClbitId, QubitId};

/// Builder methods for parameterless single-qubit gates.
macro_rules! fixed_gate {
    ($($(#[$doc:meta])* $method:ident => $variant:ident,)*) => {
        $(
            $(#[$doc])*
            pub fn $method(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
                self.gate(StandardGate::$variant, [qubit])
            }
        )*
    };
}

/// Builder methods for single-angle single-qubit rotations.
macro_rules! rotation_gate {
    ($($(#[$doc:meta])* $method:ident => $variant:ident,)*) => {
        $(
            $(#[$doc])*
            pub fn $method(&mut self, angle: f64, qubit: QubitId) -> IrResult<&mut Self> {
                self.gate(StandardGate::$variant(angle), [qubit])
            }
        )*
    };
}

/// A quantum circuit.
///
/// Instructions are kept in application order. Every instruction is checked
/// against the circuit's qubit and classical bit counts when it is applied,
/// so a `Circuit` never references a wire it does not own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    name: String,
    num_qubits: u32,
    num_clbits: u32,
    instructions: Vec<Instruction>,
}

impl Circuit {
    /// Empty circuit with no wires.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            num_qubits: 0,
            num_clbits: 0,
            instructions: vec![],
        }
    }

    pub fn with_size(name: impl Into<String>, num_qubits: u32, num_clbits: u32) -> Self {
        Self {
            num_qubits,
            num_clbits,
            ..Self::new(name)
        }
    }

    pub fn add_qubit(&mut self) -> IrResult<QubitId> {
        self.add_qubits(1)
    }

    /// Add `size` qubits and return the id of the first one.
    pub fn add_qubits(&mut self, size: u32) -> IrResult<QubitId> {
        let first = self.num_qubits;
        self.num_qubits = grow(first, size, "qubits")?;
        Ok(QubitId(first))
    }

    pub fn add_clbit(&mut self) -> IrResult<ClbitId> {
        self.add_clbits(1)
    }

    /// Add `size` classical bits and return the id of the first one.
    pub fn add_clbits(&mut self, size: u32) -> IrResult<ClbitId> {
        let first = self.num_clbits;
        self.num_clbits = grow(first, size, "classical bits")?;
        Ok(ClbitId(first))
    }

    /// Append `instruction` after checking its arity and that every wire it
    /// names exists and is used at most once.
    pub fn apply(&mut self, instruction: Instruction) -> IrResult<&mut Self> {
        let context = || instruction.as_gate().map(|g| g.name().to_string());

        if let Some(gate) = instruction.as_gate() {
            let got = instruction.qubits.len() as u32;
            if gate.num_qubits() != got {
                return Err(IrError::QubitCountMismatch {
                    gate_name: gate.name().to_string(),
                    expected: gate.num_qubits(),
                    got,
                });
            }
        }

        if let Some(&qubit) = instruction.qubits.iter().find(|q| q.0 >= self.num_qubits) {
            return Err(IrError::QubitNotFound {
                qubit,
                gate_name: context(),
            });
        }
        if let Some(&clbit) = instruction.clbits.iter().find(|c| c.0 >= self.num_clbits) {
            return Err(IrError::ClbitNotFound {
                clbit,
                gate_name: context(),
            });
        }

        let mut seen = FxHashSet::default();
        if let Some(&qubit) = instruction.qubits.iter().find(|q| !seen.insert(**q)) {
            return Err(IrError::DuplicateQubit {
                qubit,
                gate_name: context(),
            });
        }

        self.instructions.push(instruction);
        Ok(self)
    }

    fixed_gate! {
        /// Identity.
        id => I,
        /// Hadamard.
        h => H,
        /// Pauli X.
        x => X,
        /// Pauli Y.
        y => Y,
        /// Pauli Z.
        z => Z,
        /// Phase quarter turn, `sqrt(Z)`.
        s => S,
        sdg => Sdg,
        /// `pi/8` gate.
        t => T,
        tdg => Tdg,
        /// `sqrt(X)`.
        sx => SX,
        sxdg => SXdg,
    }

    rotation_gate! {
        rx => Rx,
        ry => Ry,
        rz => Rz,
        /// Phase shift by `angle` on `|1⟩`.
        p => P,
    }

    /// Generic single-qubit rotation `U(theta, phi, lambda)`.
    pub fn u(&mut self, theta: f64, phi: f64, lambda: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::U(theta, phi, lambda), [qubit])
    }

    /// Controlled NOT; `control` comes first on the wire list.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::CX, [control, target])
    }

    pub fn cy(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::CY, [control, target])
    }

    pub fn cz(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::CZ, [control, target])
    }

    pub fn swap(&mut self, a: QubitId, b: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::Swap, [a, b])
    }

    pub fn iswap(&mut self, a: QubitId, b: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::ISwap, [a, b])
    }

    pub fn crz(&mut self, theta: f64, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::CRz(theta), [control, target])
    }

    /// `exp(-i theta/2 Z⊗Z)`.
    pub fn rzz(&mut self, theta: f64, a: QubitId, b: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::RZZ(theta), [a, b])
    }

    /// Toffoli.
    pub fn ccx(&mut self, c1: QubitId, c2: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::CCX, [c1, c2, target])
    }

    // --- other operations ---

    /// Apply an arbitrary gate.
    pub fn gate(
        &mut self,
        gate: impl Into<Gate>,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        self.apply(Instruction::gate(gate, qubits))
    }

    pub fn measure(&mut self, qubit: QubitId, clbit: ClbitId) -> IrResult<&mut Self> {
        self.apply(Instruction::measure(qubit, clbit))
    }

    /// Read qubit `i` into clbit `i` for every qubit, growing the classical
    /// register first if it is shorter than the quantum one.
    pub fn measure_all(&mut self) -> IrResult<&mut Self> {
        self.num_clbits = self.num_clbits.max(self.num_qubits);
        let qubits = (0..self.num_qubits).map(QubitId);
        let clbits = (0..self.num_qubits).map(ClbitId);
        self.apply(Instruction::measure_all(qubits, clbits)?)
    }

    /// Reset a qubit to |0⟩.
    pub fn reset(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::reset(qubit))
    }

    pub fn barrier(&mut self, qubits: impl IntoIterator<Item = QubitId>) -> IrResult<&mut Self> {
        self.apply(Instruction::barrier(qubits))
    }

    /// Fence across every qubit.
    pub fn barrier_all(&mut self) -> IrResult<&mut Self> {
        let qubits: Vec<_> = (0..self.num_qubits).map(QubitId).collect();
        self.apply(Instruction::barrier(qubits))
    }

    // --- accessors ---

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits as usize
    }

    pub fn num_clbits(&self) -> usize {
        self.num_clbits as usize
    }

    /// Get the instructions in application order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Whether any instruction is a measurement.
    pub fn has_measurement(&self) -> bool {
        self.instructions.iter().any(Instruction::is_measure)
    }

    /// Circuit depth, counting every instruction as one layer on the wires it touches.
    pub fn depth(&self) -> usize {
        let mut qubit_layer = vec![0usize; self.num_qubits()];
        let mut clbit_layer = vec![0usize; self.num_clbits()];
        let mut depth = 0;

        for inst in &self.instructions {
            let start = inst
                .qubits
                .iter()
                .map(|q| qubit_layer[q.0 as usize])
                .chain(inst.clbits.iter().map(|c| clbit_layer[c.0 as usize]))
                .max()
                .unwrap_or(0);
            let layer = start + 1;
            for q in &inst.qubits {
                qubit_layer[q.0 as usize] = layer;
            }
            for c in &inst.clbits {
                clbit_layer[c.0 as usize] = layer;
            }
            depth = depth.max(layer);
        }

        depth
    }

    // --- pre-built circuits ---

    /// Create a Bell state circuit without measurements.
    pub fn bell() -> IrResult<Self> {
        let mut circuit = Self::with_size("bell", 2, 0);
        circuit.h(QubitId(0))?.cx(QubitId(0), QubitId(1))?;
        Ok(circuit)
    }

    /// Create a GHZ state circuit without measurements.
    pub fn ghz(n: u32) -> IrResult<Self> {
        let mut circuit = Self::with_size(format!("ghz_{n}"), n, 0);
        if n == 0 {
            return Ok(circuit);
        }
        circuit.h(QubitId(0))?;
        for i in 1..n {
            circuit.cx(QubitId(i - 1), QubitId(i))?;
        }
        Ok(circuit)
    }
}

fn grow(count: u32, size: u32, kind: &'static str) -> IrResult<u32> {
    count.checked_add(size).ok_or(IrError::WireLimit { kind })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::CustomGate;

    #[test]
    fn test_new_circuit() {
        let circuit = Circuit::new("scratch");
        assert_eq!(circuit.name(), "scratch");
        assert_eq!(circuit.num_qubits(), 0);
        assert_eq!(circuit.num_clbits(), 0);
        assert!(circuit.is_empty());
    }

    #[test]
    fn test_circuit_with_size() {
        let circuit = Circuit::with_size("scratch", 3, 2);
        assert_eq!(circuit.num_qubits(), 3);
        assert_eq!(circuit.num_clbits(), 2);
    }

    #[test]
    fn test_add_wires() {
        let mut circuit = Circuit::new("scratch");
        assert_eq!(circuit.add_qubits(4).unwrap(), QubitId(0));
        assert_eq!(circuit.add_qubit().unwrap(), QubitId(4));
        assert_eq!(circuit.add_clbits(2).unwrap(), ClbitId(0));
        assert_eq!(circuit.num_qubits(), 5);
        assert_eq!(circuit.num_clbits(), 2);
    }

    #[test]
    fn test_wire_count_overflow() {
        let mut circuit = Circuit::with_size("scratch", u32::MAX - 1, 0);
        assert!(circuit.add_qubit().is_ok());
        assert_eq!(
            circuit.add_qubits(2).unwrap_err(),
            IrError::WireLimit { kind: "qubits" }
        );
        assert_eq!(circuit.num_qubits(), u32::MAX as usize);

        circuit.add_clbits(u32::MAX).unwrap();
        assert!(circuit.add_clbit().is_err());
    }

    #[test]
    fn test_bell_state() {
        let circuit = Circuit::bell().unwrap();
        assert_eq!(circuit.num_qubits(), 2);
        assert_eq!(circuit.len(), 2);
        assert_eq!(circuit.depth(), 2);
        assert!(!circuit.has_measurement());
    }

    #[test]
    fn test_ghz_state() {
        let circuit = Circuit::ghz(5).unwrap();
        assert_eq!(circuit.num_qubits(), 5);
        assert_eq!(circuit.len(), 5);
        assert_eq!(circuit.depth(), 5);
        assert!(Circuit::ghz(0).unwrap().is_empty());
    }

    #[test]
    fn test_measure_all_adds_clbits() {
        let mut circuit = Circuit::bell().unwrap();
        circuit.measure_all().unwrap();
        assert_eq!(circuit.num_clbits(), 2);
        assert!(circuit.has_measurement());
        assert_eq!(circuit.depth(), 3);
    }

    #[test]
    fn test_qubit_out_of_range() {
        let mut circuit = Circuit::with_size("scratch", 2, 0);
        let err = circuit.cx(QubitId(0), QubitId(2)).unwrap_err();
        assert!(matches!(
            err,
            IrError::QubitNotFound { qubit: QubitId(2), .. }
        ));
        assert!(circuit.is_empty());
    }

    #[test]
    fn test_clbit_out_of_range() {
        let mut circuit = Circuit::with_size("scratch", 1, 0);
        let err = circuit.measure(QubitId(0), ClbitId(0)).unwrap_err();
        assert!(matches!(err, IrError::ClbitNotFound { .. }));
    }

    #[test]
    fn test_duplicate_qubit() {
        let mut circuit = Circuit::with_size("scratch", 2, 0);
        let err = circuit.cx(QubitId(1), QubitId(1)).unwrap_err();
        assert!(matches!(err, IrError::DuplicateQubit { .. }));
    }

    #[test]
    fn test_arity_mismatch() {
        let mut circuit = Circuit::with_size("scratch", 3, 0);
        let err = circuit
            .gate(CustomGate::new("two", 2), [QubitId(0)])
            .unwrap_err();
        assert_eq!(
            err,
            IrError::QubitCountMismatch {
                gate_name: "two".into(),
                expected: 2,
                got: 1,
            }
        );
    }

    #[test]
    fn test_depth_parallel_gates() {
        let mut circuit = Circuit::with_size("scratch", 4, 0);
        circuit
            .h(QubitId(0))
            .unwrap()
            .h(QubitId(1))
            .unwrap()
            .cx(QubitId(2), QubitId(3))
            .unwrap();
        assert_eq!(circuit.depth(), 1);
    }

    #[test]
    fn test_serde_roundtrip() {
        let mut circuit = Circuit::bell().unwrap();
        circuit.rz(0.25, QubitId(1)).unwrap();
        let json = serde_json::to_string(&circuit).unwrap();
        let back: Circuit = serde_json::from_str(&json).unwrap();
        assert_eq!(back, circuit);
    }
}
