//! Circuit and operator translation to the OQTOPUS wire format.
//!
//! Circuits become OpenQASM 3 programs restricted to the gates the service
//! accepts; operators become term lists with split real and imaginary
//! coefficients. Translation is pure: the same input always produces the
//! same bytes.

use oqtopus_ir::{Circuit, Gate, InstructionKind, Operator};
use oqtopus_qasm3::emit;

use crate::api::OperatorItem;
use crate::error::{OqtopusError, OqtopusResult};

/// Gates accepted by OQTOPUS Cloud, by OpenQASM name.
pub const SUPPORTED_GATES: &[&str] = &[
    "id", "x", "y", "z", "h", "s", "sdg", "t", "tdg", "sx", "sxdg", "rx", "ry", "rz", "p", "u",
    "cx", "cy", "cz", "swap", "ccx",
];

/// Whether a gate can be sent to the service.
pub fn is_supported(gate: &Gate) -> bool {
    matches!(gate, Gate::Standard(_)) && SUPPORTED_GATES.contains(&gate.name())
}

/// Fail with [`OqtopusError::UnsupportedGate`] on the first gate outside the
/// accepted set.
pub fn check_supported(circuit: &Circuit) -> OqtopusResult<()> {
    for instruction in circuit.instructions() {
        if let InstructionKind::Gate(gate) = &instruction.kind {
            if !is_supported(gate) {
                return Err(OqtopusError::UnsupportedGate {
                    gate: gate.name().to_string(),
                });
            }
        }
    }
    Ok(())
}

/// Translate a circuit as written.
pub fn circuit_to_program(circuit: &Circuit) -> OqtopusResult<String> {
    check_supported(circuit)?;
    Ok(emit(circuit)?)
}

/// Translate a circuit for sampling, measuring every qubit when the circuit
/// has no measurement of its own.
pub fn circuit_to_sampling_program(circuit: &Circuit) -> OqtopusResult<String> {
    check_supported(circuit)?;
    if circuit.has_measurement() || circuit.num_qubits() == 0 {
        return Ok(emit(circuit)?);
    }
    let mut measured = circuit.clone();
    measured
        .measure_all()
        .map_err(|e| OqtopusError::Translation(e.into()))?;
    Ok(emit(&measured)?)
}

/// Translate an operator to wire terms, in label order.
pub fn operator_to_items(operator: &Operator) -> Vec<OperatorItem> {
    operator
        .iter()
        .map(|(label, coeff)| OperatorItem {
            pauli: label.to_string(),
            coeff: coeff.re,
            coeff_imag: coeff.im,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use oqtopus_ir::{Complex64, CustomGate, PauliLabel, QubitId};

    #[test]
    fn test_bell_sampling_program() {
        let circuit = Circuit::bell().unwrap();
        let program = circuit_to_sampling_program(&circuit).unwrap();
        assert_eq!(
            program,
            "OPENQASM 3;\n\
             include \"stdgates.inc\";\n\
             qubit[2] q;\n\
             bit[2] c;\n\
             \n\
             h q[0];\n\
             cx q[0], q[1];\n\
             c = measure q;\n"
        );
    }

    #[test]
    fn test_program_without_measure_insertion() {
        let circuit = Circuit::bell().unwrap();
        let program = circuit_to_program(&circuit).unwrap();
        assert!(!program.contains("measure"));
    }

    #[test]
    fn test_existing_measurement_kept() {
        let mut circuit = Circuit::with_size("m", 2, 1);
        circuit
            .h(QubitId(0))
            .unwrap()
            .measure(QubitId(0), oqtopus_ir::ClbitId(0))
            .unwrap();
        let program = circuit_to_sampling_program(&circuit).unwrap();
        assert!(program.contains("bit[1] c;"));
        assert!(program.contains("c[0] = measure q[0];"));
        assert!(!program.contains("c = measure q;"));
    }

    #[test]
    fn test_translation_is_deterministic() {
        let mut circuit = Circuit::with_size("rot", 1, 0);
        circuit.rx(0.5, QubitId(0)).unwrap().u(0.1, 0.2, 0.3, QubitId(0)).unwrap();
        let a = circuit_to_sampling_program(&circuit).unwrap();
        let b = circuit_to_sampling_program(&circuit).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_unsupported_standard_gate() {
        let mut circuit = Circuit::with_size("iswap", 2, 0);
        circuit.iswap(QubitId(0), QubitId(1)).unwrap();
        assert_eq!(
            circuit_to_program(&circuit),
            Err(OqtopusError::UnsupportedGate {
                gate: "iswap".into()
            })
        );
    }

    #[test]
    fn test_unsupported_custom_gate() {
        let mut circuit = Circuit::with_size("custom", 1, 0);
        circuit
            .gate(CustomGate::new("my_gate", 1), [QubitId(0)])
            .unwrap();
        assert!(matches!(
            check_supported(&circuit),
            Err(OqtopusError::UnsupportedGate { gate }) if gate == "my_gate"
        ));
    }

    #[test]
    fn test_custom_gate_with_supported_name_is_rejected() {
        let mut circuit = Circuit::with_size("custom", 1, 0);
        circuit.gate(CustomGate::new("h", 1), [QubitId(0)]).unwrap();
        assert!(check_supported(&circuit).is_err());
    }

    #[test]
    fn test_operator_items() {
        let operator = Operator::new()
            .with_term("Z0 Z1".parse::<PauliLabel>().unwrap(), 1.0)
            .with_term("X0 X1".parse::<PauliLabel>().unwrap(), Complex64::new(0.5, -0.25))
            .with_term(PauliLabel::identity(), 0.1);
        let items = operator_to_items(&operator);
        let labels: Vec<_> = items.iter().map(|i| i.pauli.as_str()).collect();
        assert_eq!(labels.len(), 3);
        assert!(labels.contains(&"I"));

        let xx = items.iter().find(|i| i.pauli == "X0 X1").unwrap();
        assert_eq!(xx.coeff, 0.5);
        assert_eq!(xx.coeff_imag, -0.25);

        let zz = items.iter().find(|i| i.pauli == "Z0 Z1").unwrap();
        assert_eq!(zz.coeff, 1.0);
        assert_eq!(zz.coeff_imag, 0.0);

        assert_eq!(items, operator_to_items(&operator));
    }
}
