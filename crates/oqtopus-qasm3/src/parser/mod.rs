//! Parser for the OpenQASM 3 subset produced by the emitter.
//!
//! Statements are lowered straight into a [`Circuit`] as they are read;
//! there is no intermediate syntax tree.

mod expression;
mod statement;

use oqtopus_ir::{Circuit, ClbitId, QubitId};
use rustc_hash::FxHashMap;

use crate::error::{QasmError, QasmResult};
use crate::lexer::{SpannedToken, Token, tokenize};

/// Parse a QASM3 source string into a Circuit.
pub fn parse(source: &str) -> QasmResult<Circuit> {
    let mut parser = Parser::new(source)?;
    parser.parse_program()?;
    Ok(parser.circuit)
}

/// Largest register a single declaration may introduce.
pub const MAX_REGISTER_SIZE: u32 = 1 << 16;

/// A declared register: first wire index and length.
#[derive(Debug, Clone, Copy)]
pub(super) struct Register {
    pub(super) offset: u32,
    pub(super) size: u32,
}

/// Parser state.
pub(super) struct Parser {
    pub(super) tokens: Vec<SpannedToken>,
    pub(super) pos: usize,
    pub(super) qregs: FxHashMap<String, Register>,
    pub(super) cregs: FxHashMap<String, Register>,
    pub(super) circuit: Circuit,
}

impl Parser {
    fn new(source: &str) -> QasmResult<Self> {
        let tokens =
            tokenize(source).map_err(|(line, message)| QasmError::LexerError { line, message })?;

        Ok(Self {
            tokens,
            pos: 0,
            qregs: FxHashMap::default(),
            cregs: FxHashMap::default(),
            circuit: Circuit::new("main"),
        })
    }

    /// Check if we've reached the end.
    pub(super) fn is_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Line of the current token, or of the last one at end of input.
    pub(super) fn line(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map_or(1, |t| t.line)
    }

    /// Peek at the current token.
    pub(super) fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    /// Peek `n` tokens ahead.
    pub(super) fn peek_nth(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.pos + n).map(|t| &t.token)
    }

    /// Advance and return the current token.
    pub(super) fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos)?.token.clone();
        self.pos += 1;
        Some(token)
    }

    /// Expect a specific token.
    #[allow(clippy::needless_pass_by_value)]
    pub(super) fn expect(&mut self, expected: Token) -> QasmResult<()> {
        let line = self.line();
        let found = self
            .advance()
            .ok_or_else(|| QasmError::UnexpectedEof(format!("expected {expected}")))?;

        if std::mem::discriminant(&found) != std::mem::discriminant(&expected) {
            return Err(self.unexpected_at(line, &expected.to_string(), &found));
        }
        Ok(())
    }

    /// Check if current token matches.
    pub(super) fn check(&self, token: &Token) -> bool {
        self.peek()
            .is_some_and(|t| std::mem::discriminant(t) == std::mem::discriminant(token))
    }

    /// Consume token if it matches.
    pub(super) fn consume(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(super) fn unexpected_at(&self, line: usize, expected: &str, found: &Token) -> QasmError {
        QasmError::UnexpectedToken {
            line,
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Parse an identifier.
    pub(super) fn parse_identifier(&mut self) -> QasmResult<String> {
        let line = self.line();
        match self.advance() {
            Some(Token::Identifier(name)) => Ok(name),
            Some(other) => Err(self.unexpected_at(line, "identifier", &other)),
            None => Err(QasmError::UnexpectedEof("expected identifier".into())),
        }
    }

    /// Parse a non-negative integer literal.
    pub(super) fn parse_index(&mut self) -> QasmResult<u32> {
        let line = self.line();
        match self.advance() {
            Some(Token::IntLiteral(v)) => u32::try_from(v)
                .map_err(|_| self.unexpected_at(line, "32-bit integer", &Token::IntLiteral(v))),
            Some(other) => Err(self.unexpected_at(line, "integer", &other)),
            None => Err(QasmError::UnexpectedEof("expected integer".into())),
        }
    }

    /// Parse the entire program.
    fn parse_program(&mut self) -> QasmResult<()> {
        if self.consume(&Token::OpenQasm) {
            self.parse_version()?;
            self.expect(Token::Semicolon)?;
        }

        while !self.is_eof() {
            self.parse_statement()?;
        }

        Ok(())
    }

    /// Parse the version number; only major version 3 is accepted.
    fn parse_version(&mut self) -> QasmResult<()> {
        match self.advance() {
            Some(Token::IntLiteral(3)) => Ok(()),
            Some(Token::FloatLiteral(v)) if (3.0..4.0).contains(&v) => Ok(()),
            Some(other) => Err(QasmError::InvalidVersion(other.to_string())),
            None => Err(QasmError::UnexpectedEof("expected version".into())),
        }
    }

    /// Resolve a quantum operand to the qubits it names.
    pub(super) fn resolve_qubits(&self, name: &str, index: Option<u32>) -> QasmResult<Vec<QubitId>> {
        let reg = self
            .qregs
            .get(name)
            .ok_or_else(|| QasmError::UndefinedRegister(name.to_string()))?;
        Ok(select(name, *reg, index)?.map(QubitId).collect())
    }

    /// Resolve a classical operand to the bits it names.
    pub(super) fn resolve_clbits(&self, name: &str, index: Option<u32>) -> QasmResult<Vec<ClbitId>> {
        let reg = self
            .cregs
            .get(name)
            .ok_or_else(|| QasmError::UndefinedRegister(name.to_string()))?;
        Ok(select(name, *reg, index)?.map(ClbitId).collect())
    }
}

fn select(name: &str, reg: Register, index: Option<u32>) -> QasmResult<std::ops::Range<u32>> {
    match index {
        None => Ok(reg.offset..reg.offset + reg.size),
        Some(i) if i < reg.size => Ok(reg.offset + i..reg.offset + i + 1),
        Some(i) => Err(QasmError::IndexOutOfBounds {
            register: name.to_string(),
            index: i as usize,
            size: reg.size as usize,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oqtopus_ir::{Gate, InstructionKind, StandardGate};

    #[test]
    fn test_parse_bell() {
        let circuit = parse(
            r#"
            OPENQASM 3.0;
            include "stdgates.inc";
            qubit[2] q;
            bit[2] c;
            h q[0];
            cx q[0], q[1];
            c = measure q;
            "#,
        )
        .unwrap();

        assert_eq!(circuit.num_qubits(), 2);
        assert_eq!(circuit.num_clbits(), 2);
        assert_eq!(circuit.len(), 3);
        assert_eq!(circuit.instructions()[2].qubits, vec![QubitId(0), QubitId(1)]);
    }

    #[test]
    fn test_version_optional_and_checked() {
        assert!(parse("qubit q; x q;").is_ok());
        assert!(parse("OPENQASM 3; qubit q;").is_ok());
        assert!(matches!(
            parse("OPENQASM 2.0; qubit q;"),
            Err(QasmError::InvalidVersion(_))
        ));
    }

    #[test]
    fn test_parameter_expressions() {
        let circuit = parse("OPENQASM 3; qubit[1] q; rz(-pi/2) q[0]; rx(2*(0.25+0.25)) q[0];")
            .unwrap();
        let gates: Vec<_> = circuit
            .instructions()
            .iter()
            .filter_map(|i| i.as_gate().cloned())
            .collect();
        assert_eq!(
            gates[0],
            Gate::from(StandardGate::Rz(-std::f64::consts::FRAC_PI_2))
        );
        assert_eq!(gates[1], Gate::from(StandardGate::Rx(1.0)));
    }

    #[test]
    fn test_multiple_registers() {
        let circuit = parse("qubit[2] a; qubit[3] b; cx a[1], b[2];").unwrap();
        assert_eq!(circuit.num_qubits(), 5);
        assert_eq!(circuit.instructions()[0].qubits, vec![QubitId(1), QubitId(4)]);
    }

    #[test]
    fn test_register_broadcast() {
        let circuit = parse("qubit[3] q; h q;").unwrap();
        assert_eq!(circuit.len(), 3);

        let circuit = parse("qubit[2] a; qubit[2] b; cx a, b;").unwrap();
        assert_eq!(circuit.len(), 2);
        assert_eq!(circuit.instructions()[1].qubits, vec![QubitId(1), QubitId(3)]);

        assert!(matches!(
            parse("qubit[2] a; qubit[3] b; cx a, b;"),
            Err(QasmError::BroadcastMismatch { .. })
        ));
    }

    #[test]
    fn test_arrow_measure() {
        let circuit = parse("qubit[2] q; bit[2] c; measure q[1] -> c[0];").unwrap();
        let inst = &circuit.instructions()[0];
        assert_eq!(inst.kind, InstructionKind::Measure);
        assert_eq!(inst.qubits, vec![QubitId(1)]);
        assert_eq!(inst.clbits, vec![ClbitId(0)]);
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            parse("qubit[2] q; h r[0];"),
            Err(QasmError::UndefinedRegister(ref r)) if r == "r"
        ));
        assert!(matches!(
            parse("qubit[2] q; h q[2];"),
            Err(QasmError::IndexOutOfBounds { index: 2, size: 2, .. })
        ));
        assert!(matches!(
            parse("qubit[2] q; foo q[0];"),
            Err(QasmError::UnknownGate { .. })
        ));
        assert!(matches!(
            parse("qubit q; qubit q;"),
            Err(QasmError::DuplicateDeclaration(_))
        ));
        assert!(matches!(
            parse("qubit[2] q;\nh q[0]"),
            Err(QasmError::UnexpectedEof(_))
        ));
        assert!(matches!(
            parse("qubit[2] q;\ncx q[0], q[0];"),
            Err(QasmError::CircuitError(_))
        ));
    }

    #[test]
    fn test_unexpected_token_line() {
        let err = parse("qubit[2] q;\n\nh q[0] q[1];").unwrap_err();
        assert!(matches!(err, QasmError::UnexpectedToken { line: 3, .. }));
    }
}
