//! rechner-engine - exact-arithmetic expression engine
//!
//! The engine behind the `rechner` interpreter. One line of input flows
//! through the pipeline:
//!
//! ```text
//! Input line
//!      |
//!   Lexer -> tokens
//!      |
//!   Parser -> statement (expression / assignment / function def / equation)
//!      |
//!   Evaluator or Solver -> Outcome
//! ```
//!
//! Values are exact rationals (arbitrary precision, always reduced), complex
//! numbers with rational components, matrices of those, and user-defined
//! single-parameter functions. Arithmetic promotes across the value lattice
//! and collapses complexes with a zero imaginary part back to rationals.
//! Equation queries (`lhs = rhs ?`) are reduced to polynomial coefficients
//! and solved symbolically up to degree 2.

pub mod ast;
pub mod builtins;
pub mod complex;
pub mod engine;
pub mod env;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod matrix;
pub mod parser;
pub mod rational;
pub mod solve;
pub mod token;
pub mod value;

// Re-export main types
pub use builtins::AngleMode;
pub use engine::{Engine, Outcome};
pub use env::Environment;
pub use error::{Error, Result};
pub use solve::{Roots, Solution};
pub use value::{Function, Value};
