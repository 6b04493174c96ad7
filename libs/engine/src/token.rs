//! Token types for the lexer

/// Token kinds produced by the lexer.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TokenKind {
    // Literals
    Integer,
    Decimal,

    // Identifiers (the parser decides whether a lone `i` is the imaginary unit)
    Identifier,

    // Operators
    Plus,     // +
    Minus,    // -
    Star,     // *
    Slash,    // /
    Caret,    // ^ and **
    Equals,   // =
    Question, // ?

    // Delimiters
    OpenParen,    // (
    CloseParen,   // )
    OpenBracket,  // [
    CloseBracket, // ]
    Comma,        // ,
    Semicolon,    // ;

    // End of input
    Eof,
}

/// A token with its source text and 1-based column.
#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, column: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            column,
        }
    }

    pub fn eof(column: usize) -> Self {
        Self {
            kind: TokenKind::Eof,
            text: String::new(),
            column,
        }
    }

    /// Human-readable description for error messages.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Eof => "end of input".to_string(),
            _ => format!("'{}'", self.text),
        }
    }
}
