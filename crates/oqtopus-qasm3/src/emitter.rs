//! QASM3 emitter for serializing circuits.
//!
//! Output uses one qubit register `q` and one bit register `c`. Parameters are
//! written with Rust's shortest round-trip float formatting, so the same
//! circuit always produces the same bytes and re-parsing recovers the exact
//! angles.

use oqtopus_ir::{Circuit, ClbitId, Gate, Instruction, InstructionKind, QubitId};

use crate::error::{QasmError, QasmResult};

/// Emit a circuit as QASM3 source code.
pub fn emit(circuit: &Circuit) -> QasmResult<String> {
    let mut emitter = Emitter::new();
    emitter.emit_circuit(circuit)?;
    Ok(emitter.output)
}

/// QASM3 emitter.
struct Emitter {
    output: String,
}

impl Emitter {
    fn new() -> Self {
        Self {
            output: String::new(),
        }
    }

    fn emit_circuit(&mut self, circuit: &Circuit) -> QasmResult<()> {
        self.writeln("OPENQASM 3;");
        self.writeln("include \"stdgates.inc\";");

        let num_qubits = circuit.num_qubits();
        if num_qubits > 0 {
            self.writeln(&format!("qubit[{num_qubits}] q;"));
        }

        let num_clbits = circuit.num_clbits();
        if num_clbits > 0 {
            self.writeln(&format!("bit[{num_clbits}] c;"));
        }

        if !circuit.is_empty() {
            self.writeln("");
        }

        for instruction in circuit.instructions() {
            self.emit_instruction(circuit, instruction)?;
        }

        Ok(())
    }

    fn emit_instruction(&mut self, circuit: &Circuit, instruction: &Instruction) -> QasmResult<()> {
        match &instruction.kind {
            InstructionKind::Gate(gate) => {
                let params = emit_gate_params(gate)?;
                let qubits = emit_qubits(&instruction.qubits);

                if params.is_empty() {
                    self.writeln(&format!("{} {qubits};", gate.name()));
                } else {
                    self.writeln(&format!("{}({params}) {qubits};", gate.name()));
                }
            }

            InstructionKind::Measure => {
                if is_full_register_measure(circuit, instruction) {
                    self.writeln("c = measure q;");
                } else {
                    for (q, c) in instruction.readouts() {
                        self.writeln(&format!("{} = measure {};", clbit(c), qubit(q)));
                    }
                }
            }

            InstructionKind::Reset => {
                for q in &instruction.qubits {
                    self.writeln(&format!("reset {};", qubit(*q)));
                }
            }

            InstructionKind::Barrier => {
                let qubits = emit_qubits(&instruction.qubits);
                if qubits.is_empty() {
                    self.writeln("barrier;");
                } else {
                    self.writeln(&format!("barrier {qubits};"));
                }
            }
        }

        Ok(())
    }

    fn writeln(&mut self, line: &str) {
        self.output.push_str(line);
        self.output.push('\n');
    }
}

fn emit_gate_params(gate: &Gate) -> QasmResult<String> {
    let params = gate.parameters();
    if let Some(bad) = params.iter().find(|p| !p.is_finite()) {
        return Err(QasmError::NonFiniteParameter {
            gate: gate.name().to_string(),
            value: *bad,
        });
    }
    Ok(params
        .iter()
        .map(|p| format!("{p:?}"))
        .collect::<Vec<_>>()
        .join(", "))
}

fn emit_qubits(qubits: &[QubitId]) -> String {
    qubits
        .iter()
        .map(|q| qubit(*q))
        .collect::<Vec<_>>()
        .join(", ")
}

fn qubit(q: QubitId) -> String {
    format!("q[{}]", q.0)
}

fn clbit(c: ClbitId) -> String {
    format!("c[{}]", c.0)
}

/// A measure of every qubit into the equally-sized bit register, index for index.
fn is_full_register_measure(circuit: &Circuit, instruction: &Instruction) -> bool {
    let n = circuit.num_qubits();
    n > 1
        && circuit.num_clbits() == n
        && instruction.qubits.len() == n
        && instruction.clbits.len() == n
        && instruction
            .readouts()
            .enumerate()
            .all(|(i, (q, c))| q.0 as usize == i && c.0 as usize == i)
}
