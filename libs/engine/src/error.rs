//! Error types for the expression engine

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Evaluation errors, one variant per failure class.
///
/// Display output is the bare message; the variant carries the class so
/// callers (and tests) can match on it. A statement that fails with any of
/// these leaves the session environment untouched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Unrecognized or malformed input at the character level.
    #[error("{0}")]
    Lex(String),

    /// Unexpected token, unterminated matrix, malformed equation query.
    #[error("{0}")]
    Parse(String),

    /// Unbound identifier, unbound function, or use of a reserved name.
    #[error("{0}")]
    Name(String),

    /// Operation not defined on the operand types.
    #[error("{0}")]
    Type(String),

    /// Incompatible matrix dimensions or a non-singleton unknown set.
    #[error("{0}")]
    Shape(String),

    /// Division by zero, non-integer exponent, singular matrix, and friends.
    #[error("{0}")]
    Domain(String),

    /// Polynomial degree above 2, non-polynomial equation, runaway recursion.
    #[error("{0}")]
    Unsupported(String),
}
