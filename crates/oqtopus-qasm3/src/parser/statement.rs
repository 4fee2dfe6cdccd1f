//! Statement parsing and lowering.

use oqtopus_ir::{Instruction, QubitId, StandardGate};

use super::{MAX_REGISTER_SIZE, Parser, Register};
use crate::error::{QasmError, QasmResult};
use crate::lexer::Token;

/// A register operand, optionally indexed.
struct Operand {
    name: String,
    index: Option<u32>,
}

impl Parser {
    /// Parse one statement and apply it to the circuit.
    pub(super) fn parse_statement(&mut self) -> QasmResult<()> {
        let line = self.line();
        match self.peek() {
            Some(Token::Include) => self.parse_include(),
            Some(Token::Qubit) => self.parse_declaration(true),
            Some(Token::Bit) => self.parse_declaration(false),
            Some(Token::Measure) => self.parse_arrow_measure(),
            Some(Token::Reset) => self.parse_reset(),
            Some(Token::Barrier) => self.parse_barrier(),
            Some(Token::Identifier(_)) if self.at_assignment() => self.parse_assign_measure(),
            Some(Token::Identifier(_)) => self.parse_gate_call(),
            Some(other) => Err(self.unexpected_at(line, "statement", &other.clone())),
            None => Err(QasmError::UnexpectedEof("expected statement".into())),
        }
    }

    /// `c = ...` or `c[i] = ...`
    fn at_assignment(&self) -> bool {
        matches!(self.peek_nth(1), Some(Token::Eq))
            || (matches!(self.peek_nth(1), Some(Token::LBracket))
                && matches!(self.peek_nth(4), Some(Token::Eq)))
    }

    fn parse_include(&mut self) -> QasmResult<()> {
        self.expect(Token::Include)?;
        self.expect(Token::StringLiteral(String::new()))?;
        self.expect(Token::Semicolon)
    }

    /// `qubit[n] name;`, `qubit name;`, `bit[n] name;` or `bit name;`
    fn parse_declaration(&mut self, quantum: bool) -> QasmResult<()> {
        self.advance();
        let size = if self.consume(&Token::LBracket) {
            let size = self.parse_index()?;
            self.expect(Token::RBracket)?;
            size
        } else {
            1
        };
        let name = self.parse_identifier()?;
        self.expect(Token::Semicolon)?;

        if self.qregs.contains_key(&name) || self.cregs.contains_key(&name) {
            return Err(QasmError::DuplicateDeclaration(name));
        }
        if size > MAX_REGISTER_SIZE {
            return Err(QasmError::RegisterTooLarge { name, size });
        }

        if quantum {
            let offset = self.circuit.add_qubits(size)?.0;
            self.qregs.insert(name, Register { offset, size });
        } else {
            let offset = self.circuit.add_clbits(size)?.0;
            self.cregs.insert(name, Register { offset, size });
        }
        Ok(())
    }

    /// `measure q -> c;`
    fn parse_arrow_measure(&mut self) -> QasmResult<()> {
        self.expect(Token::Measure)?;
        let source = self.parse_operand()?;
        self.expect(Token::Arrow)?;
        let target = self.parse_operand()?;
        self.expect(Token::Semicolon)?;
        self.apply_measure(&source, &target)
    }

    /// `c = measure q;`
    fn parse_assign_measure(&mut self) -> QasmResult<()> {
        let target = self.parse_operand()?;
        self.expect(Token::Eq)?;
        self.expect(Token::Measure)?;
        let source = self.parse_operand()?;
        self.expect(Token::Semicolon)?;
        self.apply_measure(&source, &target)
    }

    fn apply_measure(&mut self, source: &Operand, target: &Operand) -> QasmResult<()> {
        let line = self.line();
        let qubits = self.resolve_qubits(&source.name, source.index)?;
        let clbits = self.resolve_clbits(&target.name, target.index)?;
        if qubits.len() != clbits.len() {
            return Err(QasmError::BroadcastMismatch { line });
        }

        let instruction = if qubits.len() == 1 {
            Instruction::measure(qubits[0], clbits[0])
        } else {
            Instruction::measure_all(qubits, clbits)?
        };
        self.circuit.apply(instruction)?;
        Ok(())
    }

    fn parse_reset(&mut self) -> QasmResult<()> {
        self.expect(Token::Reset)?;
        let operand = self.parse_operand()?;
        self.expect(Token::Semicolon)?;

        for qubit in self.resolve_qubits(&operand.name, operand.index)? {
            self.circuit.reset(qubit)?;
        }
        Ok(())
    }

    /// `barrier;` covers every qubit.
    fn parse_barrier(&mut self) -> QasmResult<()> {
        self.expect(Token::Barrier)?;
        if self.consume(&Token::Semicolon) {
            self.circuit.barrier_all()?;
            return Ok(());
        }

        let operands = self.parse_operand_list()?;
        self.expect(Token::Semicolon)?;

        let mut qubits: Vec<QubitId> = Vec::new();
        for operand in &operands {
            qubits.extend(self.resolve_qubits(&operand.name, operand.index)?);
        }
        self.circuit.barrier(qubits)?;
        Ok(())
    }

    /// `name(params) operands;` with register operands broadcast element-wise.
    fn parse_gate_call(&mut self) -> QasmResult<()> {
        let line = self.line();
        let name = self.parse_identifier()?;

        let mut params = Vec::new();
        if self.consume(&Token::LParen) {
            if !self.check(&Token::RParen) {
                params.push(self.parse_expression()?);
                while self.consume(&Token::Comma) {
                    params.push(self.parse_expression()?);
                }
            }
            self.expect(Token::RParen)?;
        }

        let operands = self.parse_operand_list()?;
        self.expect(Token::Semicolon)?;

        let gate = StandardGate::from_name(&name, &params).ok_or(QasmError::UnknownGate {
            name: name.clone(),
            params: params.len(),
        })?;

        let resolved = operands
            .iter()
            .map(|o| self.resolve_qubits(&o.name, o.index))
            .collect::<QasmResult<Vec<_>>>()?;

        let width = resolved.iter().map(Vec::len).max().unwrap_or(0);
        if resolved.iter().any(|r| r.len() != 1 && r.len() != width) {
            return Err(QasmError::BroadcastMismatch { line });
        }

        for i in 0..width {
            let qubits = resolved.iter().map(|r| if r.len() == 1 { r[0] } else { r[i] });
            self.circuit.gate(gate.clone(), qubits)?;
        }
        Ok(())
    }

    fn parse_operand_list(&mut self) -> QasmResult<Vec<Operand>> {
        let mut operands = vec![self.parse_operand()?];
        while self.consume(&Token::Comma) {
            operands.push(self.parse_operand()?);
        }
        Ok(operands)
    }

    fn parse_operand(&mut self) -> QasmResult<Operand> {
        let name = self.parse_identifier()?;
        let index = if self.consume(&Token::LBracket) {
            let index = self.parse_index()?;
            self.expect(Token::RBracket)?;
            Some(index)
        } else {
            None
        };
        Ok(Operand { name, index })
    }
}

#[cfg(test)]
mod tests {
    use crate::error::QasmError;
    use crate::{MAX_REGISTER_SIZE, parse};
    use oqtopus_ir::{ClbitId, InstructionKind, QubitId};

    #[test]
    fn test_barrier_forms() {
        let circuit = parse("qubit[3] q; barrier; barrier q[0], q[2];").unwrap();
        assert_eq!(circuit.instructions()[0].kind, InstructionKind::Barrier);
        assert_eq!(circuit.instructions()[0].qubits.len(), 3);
        assert_eq!(circuit.instructions()[1].qubits, vec![QubitId(0), QubitId(2)]);
    }

    #[test]
    fn test_reset_register() {
        let circuit = parse("qubit[2] q; reset q;").unwrap();
        assert_eq!(circuit.len(), 2);
        assert!(
            circuit
                .instructions()
                .iter()
                .all(|i| i.kind == InstructionKind::Reset)
        );
    }

    #[test]
    fn test_indexed_assign_measure() {
        let circuit = parse("qubit[2] q; bit[2] c; c[1] = measure q[0];").unwrap();
        assert_eq!(circuit.instructions()[0].clbits, vec![ClbitId(1)]);
    }

    #[test]
    fn test_measure_size_mismatch() {
        assert!(matches!(
            parse("qubit[2] q; bit[3] c; c = measure q;"),
            Err(QasmError::BroadcastMismatch { .. })
        ));
    }

    #[test]
    fn test_wrong_parameter_count() {
        let err = parse("qubit q; rx q;").unwrap_err();
        assert_eq!(
            err,
            QasmError::UnknownGate {
                name: "rx".into(),
                params: 0,
            }
        );
    }

    #[test]
    fn test_register_size_limit() {
        let err = parse("qubit[4000000000] q;").unwrap_err();
        assert_eq!(
            err,
            QasmError::RegisterTooLarge {
                name: "q".into(),
                size: 4_000_000_000,
            }
        );

        let source = format!("qubit[{MAX_REGISTER_SIZE}] a; bit[{MAX_REGISTER_SIZE}] c;");
        let circuit = parse(&source).unwrap();
        assert_eq!(circuit.num_qubits(), MAX_REGISTER_SIZE as usize);
        assert_eq!(circuit.num_clbits(), MAX_REGISTER_SIZE as usize);
    }

    #[test]
    fn test_register_named_like_gate() {
        // `h` as an operand, not a gate call.
        let circuit = parse("qubit[1] h; x h[0];").unwrap();
        assert_eq!(circuit.len(), 1);
    }
}
