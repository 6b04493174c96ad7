//! Built-in functions
//!
//! The fixed table of built-in functions and the angle-mode state consulted
//! by the trigonometric ones. Lookups go through a compile-time perfect hash
//! map, so the registry costs nothing at runtime and the reserved-name check
//! is a plain map probe.
//!
//! Results stay exact where the operation can be exact (`abs`, `floor`,
//! `ceil`, perfect-square `sqrt`/`norm`, `inv`); the transcendentals fall
//! back to `f64` and return decimal-rendered rationals.

use std::f64::consts::PI;
use std::fmt;

use phf::phf_map;

use crate::error::{Error, Result};
use crate::rational::Rational;
use crate::value::Value;

/// Angle interpretation for `sin`, `cos` and `tan`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AngleMode {
    #[default]
    Radians,
    Degrees,
}

impl AngleMode {
    /// Factor converting an argument in this mode to radians.
    fn to_radians_factor(self) -> f64 {
        match self {
            AngleMode::Radians => 1.0,
            AngleMode::Degrees => PI / 180.0,
        }
    }
}

impl fmt::Display for AngleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AngleMode::Radians => write!(f, "radians"),
            AngleMode::Degrees => write!(f, "degrees"),
        }
    }
}

/// The built-in functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Sin,
    Cos,
    Tan,
    Exp,
    Log,
    Sqrt,
    Abs,
    Floor,
    Ceil,
    Norm,
    Inv,
}

static BUILTINS: phf::Map<&'static str, Builtin> = phf_map! {
    "sin" => Builtin::Sin,
    "cos" => Builtin::Cos,
    "tan" => Builtin::Tan,
    "exp" => Builtin::Exp,
    "log" => Builtin::Log,
    "sqrt" => Builtin::Sqrt,
    "abs" => Builtin::Abs,
    "floor" => Builtin::Floor,
    "ceil" => Builtin::Ceil,
    "norm" => Builtin::Norm,
    "inv" => Builtin::Inv,
};

/// Resolve a built-in by name.
pub fn lookup(name: &str) -> Option<Builtin> {
    BUILTINS.get(name).copied()
}

/// Names that cannot be bound: the imaginary unit and the built-in table.
pub fn is_reserved_name(name: &str) -> bool {
    name == "i" || BUILTINS.contains_key(name)
}

/// All built-in names, sorted, for help listings.
pub fn names() -> Vec<&'static str> {
    let mut names: Vec<_> = BUILTINS.keys().copied().collect();
    names.sort_unstable();
    names
}

/// `(re, im)` float view of a scalar value.
fn scalar_parts(value: &Value) -> Option<(f64, f64)> {
    match value {
        Value::Rational(r) => Some((r.to_f64(), 0.0)),
        Value::Complex(c) => Some((c.re().to_f64(), c.im().to_f64())),
        _ => None,
    }
}

fn complex_from_parts(re: f64, im: f64) -> Result<Value> {
    Ok(Value::complex(Rational::approx(re)?, Rational::approx(im)?))
}

/// `|cell|²` as an exact rational; cells are scalars by construction.
fn cell_magnitude_squared(cell: &Value) -> Rational {
    match cell {
        Value::Rational(r) => r * r,
        Value::Complex(c) => c.magnitude_squared(),
        _ => Rational::zero(),
    }
}

impl Builtin {
    pub fn name(&self) -> &'static str {
        match self {
            Builtin::Sin => "sin",
            Builtin::Cos => "cos",
            Builtin::Tan => "tan",
            Builtin::Exp => "exp",
            Builtin::Log => "log",
            Builtin::Sqrt => "sqrt",
            Builtin::Abs => "abs",
            Builtin::Floor => "floor",
            Builtin::Ceil => "ceil",
            Builtin::Norm => "norm",
            Builtin::Inv => "inv",
        }
    }

    /// Apply the built-in to an evaluated argument.
    pub fn apply(&self, arg: &Value, mode: AngleMode) -> Result<Value> {
        match self {
            Builtin::Sin | Builtin::Cos | Builtin::Tan => self.apply_trig(arg, mode),
            Builtin::Exp => Self::apply_exp(arg),
            Builtin::Log => Self::apply_log(arg),
            Builtin::Sqrt => match arg {
                Value::Rational(_) | Value::Complex(_) => arg.sqrt(),
                _ => Err(self.type_error(arg)),
            },
            Builtin::Abs => match arg {
                Value::Rational(r) => Ok(Value::Rational(r.abs())),
                Value::Complex(c) => Ok(Value::Rational(c.magnitude()?)),
                Value::Matrix(_) => Err(Error::Type(
                    "abs is not defined for matrices, use norm".into(),
                )),
                Value::Function(_) => Err(self.type_error(arg)),
            },
            Builtin::Floor => match arg {
                Value::Rational(r) => Ok(Value::Rational(r.floor())),
                _ => Err(self.type_error(arg)),
            },
            Builtin::Ceil => match arg {
                Value::Rational(r) => Ok(Value::Rational(r.ceil())),
                _ => Err(self.type_error(arg)),
            },
            Builtin::Norm => match arg {
                Value::Rational(r) => Ok(Value::Rational(r.abs())),
                Value::Complex(c) => Ok(Value::Rational(c.magnitude()?)),
                Value::Matrix(m) => {
                    // Frobenius norm; the 1×n / n×1 vector norm is the same sum
                    let mut sum = Rational::zero();
                    for cell in m.cells() {
                        sum = &sum + &cell_magnitude_squared(cell);
                    }
                    Ok(Value::Rational(sum.sqrt_nonneg()?))
                }
                Value::Function(_) => Err(self.type_error(arg)),
            },
            Builtin::Inv => match arg {
                Value::Matrix(m) => Ok(Value::Matrix(m.inverse()?)),
                _ => Err(Error::Type(format!(
                    "inv expects a matrix, got a {}",
                    arg.type_name()
                ))),
            },
        }
    }

    fn type_error(&self, arg: &Value) -> Error {
        Error::Type(format!(
            "{} is not defined for a {}",
            self.name(),
            arg.type_name()
        ))
    }

    fn apply_trig(&self, arg: &Value, mode: AngleMode) -> Result<Value> {
        let (re, im) = scalar_parts(arg).ok_or_else(|| self.type_error(arg))?;
        let factor = mode.to_radians_factor();
        let (a, b) = (re * factor, im * factor);
        let (sr, si) = (a.sin() * b.cosh(), a.cos() * b.sinh());
        let (cr, ci) = (a.cos() * b.cosh(), -(a.sin() * b.sinh()));
        match self {
            Builtin::Sin => complex_from_parts(sr, si),
            Builtin::Cos => complex_from_parts(cr, ci),
            Builtin::Tan => {
                // sin z / cos z in f64 complex arithmetic
                let denom = cr * cr + ci * ci;
                if denom == 0.0 {
                    return Err(Error::Domain("tan is undefined at this angle".into()));
                }
                complex_from_parts((sr * cr + si * ci) / denom, (si * cr - sr * ci) / denom)
            }
            _ => unreachable!("apply_trig only handles sin/cos/tan"),
        }
    }

    fn apply_exp(arg: &Value) -> Result<Value> {
        match arg {
            Value::Rational(r) => Ok(Value::Rational(Rational::approx(r.to_f64().exp())?)),
            Value::Complex(c) => {
                // e^(a+bi) = e^a (cos b + i sin b)
                let (a, b) = (c.re().to_f64(), c.im().to_f64());
                let scale = a.exp();
                complex_from_parts(scale * b.cos(), scale * b.sin())
            }
            _ => Err(Error::Type(format!(
                "exp is not defined for a {}",
                arg.type_name()
            ))),
        }
    }

    fn apply_log(arg: &Value) -> Result<Value> {
        match arg {
            Value::Rational(r) => {
                if r.is_zero() {
                    return Err(Error::Domain("log of zero is undefined".into()));
                }
                if r.is_negative() {
                    // principal value: ln|x| + πi
                    return complex_from_parts(r.abs().to_f64().ln(), PI);
                }
                Ok(Value::Rational(Rational::approx(r.to_f64().ln())?))
            }
            Value::Complex(c) => {
                // ln z = ln|z| + i·arg z
                let (a, b) = (c.re().to_f64(), c.im().to_f64());
                complex_from_parts(a.hypot(b).ln(), b.atan2(a))
            }
            _ => Err(Error::Type(format!(
                "log is not defined for a {}",
                arg.type_name()
            ))),
        }
    }
}
