//! Constant parameter expressions.
//!
//! Grammar, lowest precedence first:
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('-' | '+') unary | primary
//! primary := number | pi | tau | euler | '(' expr ')'
//! ```

use super::Parser;
use crate::error::{QasmError, QasmResult};
use crate::lexer::Token;

impl Parser {
    /// Parse and evaluate an expression.
    pub(super) fn parse_expression(&mut self) -> QasmResult<f64> {
        let mut value = self.parse_term()?;
        loop {
            if self.consume(&Token::Plus) {
                value += self.parse_term()?;
            } else if self.consume(&Token::Minus) {
                value -= self.parse_term()?;
            } else {
                return Ok(value);
            }
        }
    }

    fn parse_term(&mut self) -> QasmResult<f64> {
        let mut value = self.parse_unary()?;
        loop {
            if self.consume(&Token::Star) {
                value *= self.parse_unary()?;
            } else if self.consume(&Token::Slash) {
                value /= self.parse_unary()?;
            } else {
                return Ok(value);
            }
        }
    }

    fn parse_unary(&mut self) -> QasmResult<f64> {
        if self.consume(&Token::Minus) {
            return Ok(-self.parse_unary()?);
        }
        if self.consume(&Token::Plus) {
            return self.parse_unary();
        }
        self.parse_primary()
    }

    #[allow(clippy::cast_precision_loss)]
    fn parse_primary(&mut self) -> QasmResult<f64> {
        let line = self.line();
        match self.advance() {
            Some(Token::FloatLiteral(v)) => Ok(v),
            Some(Token::IntLiteral(v)) => Ok(v as f64),
            Some(Token::Pi) => Ok(std::f64::consts::PI),
            Some(Token::Tau) => Ok(std::f64::consts::TAU),
            Some(Token::Euler) => Ok(std::f64::consts::E),
            Some(Token::LParen) => {
                let value = self.parse_expression()?;
                self.expect(Token::RParen)?;
                Ok(value)
            }
            Some(other) => Err(self.unexpected_at(line, "expression", &other)),
            None => Err(QasmError::UnexpectedEof("expected expression".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::parse;
    use oqtopus_ir::StandardGate;
    use std::f64::consts::PI;

    fn angle(expr: &str) -> f64 {
        let circuit = parse(&format!("qubit q; rz({expr}) q;")).unwrap();
        match circuit.instructions()[0].as_gate() {
            Some(oqtopus_ir::Gate::Standard(StandardGate::Rz(v))) => *v,
            other => panic!("unexpected gate {other:?}"),
        }
    }

    #[test]
    fn test_precedence() {
        assert_eq!(angle("1 + 2 * 3"), 7.0);
        assert_eq!(angle("(1 + 2) * 3"), 9.0);
        assert_eq!(angle("8 / 4 / 2"), 1.0);
        assert_eq!(angle("1 - 2 - 3"), -4.0);
    }

    #[test]
    fn test_constants() {
        assert_eq!(angle("pi"), PI);
        assert_eq!(angle("-pi/4"), -PI / 4.0);
        assert_eq!(angle("tau"), 2.0 * PI);
        assert_eq!(angle("--1.5"), 1.5);
    }

    #[test]
    fn test_exact_float_text() {
        assert_eq!(angle("0.1"), 0.1);
        assert_eq!(angle("1e-7"), 1e-7);
        assert_eq!(angle("-0.30000000000000004"), -0.30000000000000004);
    }

    #[test]
    fn test_missing_operand() {
        assert!(parse("qubit q; rz(1 +) q;").is_err());
    }
}
