//! Abstract syntax tree
//!
//! The AST mirrors the surface grammar directly. A parsed line is a
//! [`Statement`]; expression nodes own their children, so the tree is acyclic
//! by construction.

use std::collections::BTreeSet;
use std::fmt;

use crate::rational::Rational;

/// An expression node.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Numeric literal (integer and decimal literals are both exact rationals)
    Number(Rational),

    /// The imaginary unit `i`
    ImaginaryUnit,

    /// Identifier in operand position
    Identifier(String),

    /// Unary negation: `-expr`
    Negate(Box<Expr>),

    /// Binary operation: `left op right`
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Function application: `name(arg)`
    Call { name: String, arg: Box<Expr> },

    /// Matrix literal: `[[a, b]; [c, d]]`
    MatrixLiteral(Vec<Vec<Expr>>),
}

/// Binary operator: `+` | `-` | `*` | `/` | `^`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,      // +
    Subtract, // -
    Multiply, // *
    Divide,   // /
    Power,    // ^ and **
}

impl BinaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Power => "^",
        }
    }
}

/// A fully classified input line.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// Bare expression: evaluate and print the value
    Expression(Expr),

    /// `name = expr`: bind and print the value
    Assignment { name: String, expr: Expr },

    /// `name(param) = body`: install a callable, print nothing
    FunctionDef {
        name: String,
        param: String,
        body: Expr,
    },

    /// `lhs = rhs ?`: reduce and solve for the single unknown
    EquationQuery { lhs: Expr, rhs: Expr },
}

impl Expr {
    /// True when `name` occurs in operand position anywhere in the tree.
    ///
    /// Call targets are not operands: in `f(x)` only `x` is visible here.
    pub fn contains_identifier(&self, name: &str) -> bool {
        match self {
            Expr::Number(_) | Expr::ImaginaryUnit => false,
            Expr::Identifier(n) => n == name,
            Expr::Negate(e) => e.contains_identifier(name),
            Expr::Binary { left, right, .. } => {
                left.contains_identifier(name) || right.contains_identifier(name)
            }
            Expr::Call { arg, .. } => arg.contains_identifier(name),
            Expr::MatrixLiteral(rows) => rows
                .iter()
                .any(|row| row.iter().any(|cell| cell.contains_identifier(name))),
        }
    }

    /// Collect every identifier in operand position.
    pub fn collect_identifiers(&self, out: &mut BTreeSet<String>) {
        match self {
            Expr::Number(_) | Expr::ImaginaryUnit => {}
            Expr::Identifier(n) => {
                out.insert(n.clone());
            }
            Expr::Negate(e) => e.collect_identifiers(out),
            Expr::Binary { left, right, .. } => {
                left.collect_identifiers(out);
                right.collect_identifiers(out);
            }
            Expr::Call { arg, .. } => arg.collect_identifiers(out),
            Expr::MatrixLiteral(rows) => {
                for row in rows {
                    for cell in row {
                        cell.collect_identifiers(out);
                    }
                }
            }
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            Expr::Binary {
                op: BinaryOp::Add | BinaryOp::Subtract,
                ..
            } => 1,
            Expr::Binary {
                op: BinaryOp::Multiply | BinaryOp::Divide,
                ..
            } => 2,
            Expr::Negate(_) => 3,
            Expr::Binary {
                op: BinaryOp::Power,
                ..
            } => 4,
            _ => 5,
        }
    }

    fn fmt_with(&self, f: &mut fmt::Formatter<'_>, min_prec: u8) -> fmt::Result {
        let prec = self.precedence();
        if prec < min_prec {
            write!(f, "(")?;
        }
        match self {
            Expr::Number(r) => write!(f, "{}", r)?,
            Expr::ImaginaryUnit => write!(f, "i")?,
            Expr::Identifier(n) => write!(f, "{}", n)?,
            Expr::Negate(e) => {
                write!(f, "-")?;
                e.fmt_with(f, prec)?;
            }
            Expr::Binary { op, left, right } => {
                // `^` is right-associative, the rest are left-associative
                let (lp, rp) = match op {
                    BinaryOp::Power => (prec + 1, prec),
                    _ => (prec, prec + 1),
                };
                left.fmt_with(f, lp)?;
                write!(f, " {} ", op.symbol())?;
                right.fmt_with(f, rp)?;
            }
            Expr::Call { name, arg } => {
                write!(f, "{}(", name)?;
                arg.fmt_with(f, 0)?;
                write!(f, ")")?;
            }
            Expr::MatrixLiteral(rows) => {
                write!(f, "[ ")?;
                for (i, row) in rows.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ; ")?;
                    }
                    write!(f, "[ ")?;
                    for (j, cell) in row.iter().enumerate() {
                        if j > 0 {
                            write!(f, " , ")?;
                        }
                        cell.fmt_with(f, 0)?;
                    }
                    write!(f, " ]")?;
                }
                write!(f, " ]")?;
            }
        }
        if prec < min_prec {
            write!(f, ")")?;
        }
        Ok(())
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_with(f, 0)
    }
}
