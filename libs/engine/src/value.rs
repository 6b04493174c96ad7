//! Runtime values and the promotion table
//!
//! `Value` is the tagged union the evaluator works in: exact rationals,
//! complexes with rational components, matrices of those, and user-defined
//! functions. Binary operations dispatch on the operand pair and promote
//! rationals into complexes where needed. After every complex-producing
//! operation the collapse rule applies: a complex with an exactly zero
//! imaginary part is represented as a rational, so a stored `Complex` always
//! has a nonzero imaginary component.

use std::fmt;
use std::sync::Arc;

use num_bigint::BigInt;

use crate::ast::Expr;
use crate::complex::Complex;
use crate::error::{Error, Result};
use crate::matrix::Matrix;
use crate::rational::Rational;

/// A user-defined single-parameter function.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: String,
    pub param: String,
    pub body: Arc<Expr>,
}

/// A runtime value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Rational(Rational),
    Complex(Complex),
    Matrix(Matrix),
    Function(Function),
}

impl Value {
    pub fn from_integer(n: i64) -> Self {
        Value::Rational(Rational::from_integer(n))
    }

    /// Build a complex value, collapsing to a rational when `im` is zero.
    pub fn complex(re: Rational, im: Rational) -> Self {
        if im.is_zero() {
            Value::Rational(re)
        } else {
            Value::Complex(Complex::new(re, im))
        }
    }

    /// Collapse rule applied to an already-built complex.
    pub fn from_complex(c: Complex) -> Self {
        if c.im().is_zero() {
            let (re, _) = c.into_parts();
            Value::Rational(re)
        } else {
            Value::Complex(c)
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Rational(_) => "rational",
            Value::Complex(_) => "complex",
            Value::Matrix(_) => "matrix",
            Value::Function(_) => "function",
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, Value::Rational(_) | Value::Complex(_))
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Value::Rational(r) => r.is_zero(),
            // a stored complex has a nonzero imaginary part
            Value::Complex(_) => false,
            Value::Matrix(_) | Value::Function(_) => false,
        }
    }

    fn type_error(op: &str, a: &Value, b: &Value) -> Error {
        Error::Type(format!(
            "cannot {} a {} and a {}",
            op,
            a.type_name(),
            b.type_name()
        ))
    }

    pub fn add(&self, other: &Value) -> Result<Value> {
        match (self, other) {
            (Value::Rational(a), Value::Rational(b)) => Ok(Value::Rational(a + b)),
            (Value::Rational(a), Value::Complex(b)) => {
                Ok(Self::from_complex(&Complex::from_real(a.clone()) + b))
            }
            (Value::Complex(a), Value::Rational(b)) => {
                Ok(Self::from_complex(a + &Complex::from_real(b.clone())))
            }
            (Value::Complex(a), Value::Complex(b)) => Ok(Self::from_complex(a + b)),
            (Value::Matrix(a), Value::Matrix(b)) => Ok(Value::Matrix(a.add(b)?)),
            _ => Err(Self::type_error("add", self, other)),
        }
    }

    pub fn sub(&self, other: &Value) -> Result<Value> {
        match (self, other) {
            (Value::Rational(a), Value::Rational(b)) => Ok(Value::Rational(a - b)),
            (Value::Rational(a), Value::Complex(b)) => {
                Ok(Self::from_complex(&Complex::from_real(a.clone()) - b))
            }
            (Value::Complex(a), Value::Rational(b)) => {
                Ok(Self::from_complex(a - &Complex::from_real(b.clone())))
            }
            (Value::Complex(a), Value::Complex(b)) => Ok(Self::from_complex(a - b)),
            (Value::Matrix(a), Value::Matrix(b)) => Ok(Value::Matrix(a.sub(b)?)),
            _ => Err(Self::type_error("subtract", self, other)),
        }
    }

    pub fn mul(&self, other: &Value) -> Result<Value> {
        match (self, other) {
            (Value::Rational(a), Value::Rational(b)) => Ok(Value::Rational(a * b)),
            (Value::Rational(a), Value::Complex(b)) => {
                Ok(Self::from_complex(&Complex::from_real(a.clone()) * b))
            }
            (Value::Complex(a), Value::Rational(b)) => {
                Ok(Self::from_complex(a * &Complex::from_real(b.clone())))
            }
            (Value::Complex(a), Value::Complex(b)) => Ok(Self::from_complex(a * b)),
            (Value::Matrix(a), Value::Matrix(b)) => Ok(Value::Matrix(a.mul(b)?)),
            (Value::Matrix(m), scalar) if scalar.is_scalar() => Ok(Value::Matrix(m.scale(scalar)?)),
            (scalar, Value::Matrix(m)) if scalar.is_scalar() => Ok(Value::Matrix(m.scale(scalar)?)),
            _ => Err(Self::type_error("multiply", self, other)),
        }
    }

    pub fn div(&self, other: &Value) -> Result<Value> {
        if other.is_scalar() && other.is_zero() {
            return Err(Error::Domain("division by zero".into()));
        }
        match (self, other) {
            (Value::Rational(a), Value::Rational(b)) => Ok(Value::Rational(a.div(b)?)),
            (Value::Rational(a), Value::Complex(b)) => {
                Ok(Self::from_complex(Complex::from_real(a.clone()).div(b)?))
            }
            (Value::Complex(a), Value::Rational(b)) => {
                Ok(Self::from_complex(a.div(&Complex::from_real(b.clone()))?))
            }
            (Value::Complex(a), Value::Complex(b)) => Ok(Self::from_complex(a.div(b)?)),
            (Value::Matrix(m), scalar) if scalar.is_scalar() => {
                Ok(Value::Matrix(m.div_scalar(scalar)?))
            }
            _ => Err(Self::type_error("divide", self, other)),
        }
    }

    /// `self ^ other`. The exponent must be a rational with denominator 1;
    /// negative exponents need a nonzero scalar or an invertible matrix.
    pub fn pow(&self, other: &Value) -> Result<Value> {
        let exp: BigInt = match other {
            Value::Rational(r) if r.is_integer() => r.numer().clone(),
            Value::Rational(_) => {
                return Err(Error::Domain(
                    "exponent must be an integer, got a non-integer rational".into(),
                ))
            }
            _ => {
                return Err(Error::Type(format!(
                    "exponent must be a rational integer, got a {}",
                    other.type_name()
                )))
            }
        };
        match self {
            Value::Rational(a) => Ok(Value::Rational(a.pow(&exp)?)),
            Value::Complex(a) => Ok(Self::from_complex(a.pow(&exp)?)),
            Value::Matrix(m) => Ok(Value::Matrix(m.pow(&exp)?)),
            Value::Function(_) => Err(Error::Type(
                "a function cannot be raised to a power".into(),
            )),
        }
    }

    /// Unary negation across all numeric variants.
    pub fn neg(&self) -> Result<Value> {
        match self {
            Value::Rational(a) => Ok(Value::Rational(-a)),
            Value::Complex(a) => Ok(Value::Complex(-a)),
            Value::Matrix(m) => Ok(Value::Matrix(m.neg()?)),
            Value::Function(_) => Err(Error::Type("a function cannot be negated".into())),
        }
    }

    /// Principal square root of a scalar. Negative rationals promote to a
    /// pure-imaginary complex; exactness is preserved for perfect squares.
    pub fn sqrt(&self) -> Result<Value> {
        match self {
            Value::Rational(r) => {
                if r.is_negative() {
                    Ok(Value::complex(Rational::zero(), r.abs().sqrt_nonneg()?))
                } else {
                    Ok(Value::Rational(r.sqrt_nonneg()?))
                }
            }
            Value::Complex(c) => Ok(Self::from_complex(c.sqrt()?)),
            _ => Err(Error::Type(format!(
                "cannot take the square root of a {}",
                self.type_name()
            ))),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Rational(r) => write!(f, "{}", r),
            Value::Complex(c) => write!(f, "{}", c),
            Value::Matrix(m) => write!(f, "{}", m),
            Value::Function(func) => write!(f, "{}({}) = {}", func.name, func.param, func.body),
        }
    }
}
