//! Lexer for the OpenQASM 3 subset.

use std::fmt;

use logos::Logos;

/// Lexical units of the accepted QASM subset.
///
/// Whitespace and both comment styles are dropped by the lexer.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
#[logos(skip r"//[^\n]*")]
#[logos(skip r"/\*[^*]*\*+(?:[^/*][^*]*\*+)*/")]
pub enum Token {
    #[token("OPENQASM")]
    OpenQasm,

    #[token("include")]
    Include,

    #[token("qubit")]
    Qubit,

    #[token("bit")]
    Bit,

    #[token("measure")]
    Measure,

    #[token("reset")]
    Reset,

    #[token("barrier")]
    Barrier,

    #[token("pi")]
    #[token("π")]
    Pi,

    #[token("tau")]
    #[token("τ")]
    Tau,

    #[token("euler")]
    #[token("ℇ")]
    Euler,

    #[regex(r"[0-9]+\.[0-9]*([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+", |lex| lex.slice().parse::<f64>().ok())]
    FloatLiteral(f64),

    #[regex(r"[0-9]+", |lex| lex.slice().parse::<u64>().ok())]
    IntLiteral(u64),

    #[regex(r#""[^"]*""#, |lex| {
        let s = lex.slice();
        Some(s[1..s.len()-1].to_string())
    })]
    StringLiteral(String),

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("/")]
    Slash,

    #[token("=")]
    Eq,

    #[token("->")]
    Arrow,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token(";")]
    Semicolon,

    #[token(",")]
    Comma,
}

impl Token {
    /// Source spelling of tokens that carry no value.
    fn spelling(&self) -> Option<&'static str> {
        use Token as T;
        Some(match self {
            T::OpenQasm => "OPENQASM",
            T::Include => "include",
            T::Qubit => "qubit",
            T::Bit => "bit",
            T::Measure => "measure",
            T::Reset => "reset",
            T::Barrier => "barrier",
            T::Pi => "pi",
            T::Tau => "tau",
            T::Euler => "euler",
            T::Plus => "+",
            T::Minus => "-",
            T::Star => "*",
            T::Slash => "/",
            T::Eq => "=",
            T::Arrow => "->",
            T::LParen => "(",
            T::RParen => ")",
            T::LBracket => "[",
            T::RBracket => "]",
            T::Semicolon => ";",
            T::Comma => ",",
            T::FloatLiteral(_) | T::IntLiteral(_) | T::StringLiteral(_) | T::Identifier(_) => {
                return None;
            }
        })
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(text) = self.spelling() {
            return f.write_str(text);
        }
        match self {
            Token::FloatLiteral(value) => write!(f, "{value}"),
            Token::IntLiteral(value) => write!(f, "{value}"),
            Token::StringLiteral(text) => write!(f, "{text:?}"),
            Token::Identifier(name) => f.write_str(name),
            _ => Ok(()),
        }
    }
}

/// A token with the source line it starts on.
#[derive(Debug, Clone)]
pub struct SpannedToken {
    pub token: Token,
    pub line: usize,
}

/// Split `source` into tokens tagged with 1-based line numbers.
///
/// Stops at the first byte sequence no token matches and returns its line
/// with a message naming the offending text.
pub fn tokenize(source: &str) -> Result<Vec<SpannedToken>, (usize, String)> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();
    let mut line = 1;
    let mut scanned = 0;

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        line += source[scanned..span.start].matches('\n').count();
        scanned = span.start;

        match result {
            Ok(token) => tokens.push(SpannedToken { token, line }),
            Err(()) => {
                let slice = &source[span];
                return Err((line, format!("unexpected input {slice:?}")));
            }
        }
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|t| t.token)
            .collect()
    }

    #[test]
    fn test_header_and_register() {
        assert_eq!(
            kinds("OPENQASM 3.0; bit[2] c;"),
            vec![
                Token::OpenQasm,
                Token::FloatLiteral(3.0),
                Token::Semicolon,
                Token::Bit,
                Token::LBracket,
                Token::IntLiteral(2),
                Token::RBracket,
                Token::Identifier("c".into()),
                Token::Semicolon,
            ]
        );
    }

    #[test]
    fn test_angle_expression() {
        let tokens = kinds("rz(-π/2) q[0];");
        assert_eq!(
            &tokens[..6],
            &[
                Token::Identifier("rz".into()),
                Token::LParen,
                Token::Minus,
                Token::Pi,
                Token::Slash,
                Token::IntLiteral(2),
            ]
        );
    }

    #[test]
    fn test_display_matches_source() {
        let rendered: Vec<String> = kinds("c = measure q; -> \"x.inc\"")
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(rendered, ["c", "=", "measure", "q", ";", "->", "\"x.inc\""]);
    }

    #[test]
    fn test_exponent_literals() {
        assert_eq!(kinds("1e-7"), vec![Token::FloatLiteral(1e-7)]);
        assert_eq!(kinds("2.5E+3"), vec![Token::FloatLiteral(2500.0)]);
        assert_eq!(kinds(".5"), vec![Token::FloatLiteral(0.5)]);
    }

    #[test]
    fn test_comments_skipped() {
        let tokens = kinds("// header\nh q; /* block\ncomment */ x q;");
        assert_eq!(tokens.len(), 6);
    }

    #[test]
    fn test_line_tracking() {
        let tokens = tokenize("OPENQASM 3;\n\nqubit q;").unwrap();
        assert_eq!(tokens[0].line, 1);
        assert_eq!(tokens[3].line, 3);
    }

    #[test]
    fn test_invalid_token() {
        let err = tokenize("h q;\n$").unwrap_err();
        assert_eq!(err.0, 2);
        assert!(err.1.contains('$'));
    }
}
