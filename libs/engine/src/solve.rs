//! Polynomial reducer and quadratic solver
//!
//! An equation query `lhs = rhs ?` is handled in three steps:
//!
//! 1. find the unknown: the unique identifier used in either side that is not
//!    bound in the environment;
//! 2. reduce `lhs - rhs` to a coefficient vector `c[k]` with
//!    `lhs - rhs ≡ Σ c[k]·u^k`, folding constant subtrees through the
//!    evaluator and combining coefficient vectors with the value algebra;
//! 3. dispatch on the trimmed degree: identities and contradictions at
//!    degree 0, one root at degree 1, discriminant analysis at degree 2,
//!    failure above that.
//!
//! Coefficients are scalar values, so they may be complex; the discriminant
//! classification distinguishes real (rational) discriminants from non-real
//! ones.

use std::collections::BTreeSet;
use std::fmt;

use num_bigint::BigInt;
use num_traits::ToPrimitive;

use crate::ast::{BinaryOp, Expr};
use crate::builtins::{self, AngleMode};
use crate::env::Environment;
use crate::error::{Error, Result};
use crate::eval::evaluate;
use crate::rational::Rational;
use crate::value::Value;

/// The outcome of a solved equation query.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// Name of the unknown.
    pub unknown: String,
    /// Trimmed coefficients, ascending by power; empty for the `0 = 0` identity.
    pub coefficients: Vec<Value>,
    /// `b² - 4ac`, present for degree-2 equations.
    pub discriminant: Option<Value>,
    pub roots: Roots,
}

/// Root set of the reduced equation.
#[derive(Debug, Clone, PartialEq)]
pub enum Roots {
    /// `0 = 0`: every number satisfies the equation.
    AllNumbers,
    /// `c = 0` with nonzero `c`: no solution.
    NoSolution,
    /// Degree 1.
    Linear(Value),
    /// Degree 2 with a zero discriminant.
    Double(Value),
    /// Degree 2, discriminant strictly positive.
    RealPair { plus: Value, minus: Value },
    /// Degree 2, discriminant strictly negative: conjugate complex roots.
    ConjugatePair { plus: Value, minus: Value },
    /// Degree 2 with a non-real discriminant.
    NonRealPair { plus: Value, minus: Value },
}

impl Solution {
    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    /// The canonical `Σ c[k]·u^k = 0` rendering, highest power first.
    pub fn reduced_form(&self) -> String {
        let mut out = String::new();
        let mut first = true;
        for (k, coeff) in self.coefficients.iter().enumerate().rev() {
            if coeff.is_zero() {
                continue;
            }
            format_term(&mut out, &mut first, coeff, &self.unknown, k);
        }
        if first {
            out.push('0');
        }
        out.push_str(" = 0");
        out
    }
}

/// Append one `± c * u^k` term.
fn format_term(out: &mut String, first: &mut bool, coeff: &Value, unknown: &str, k: usize) {
    let one = Rational::one();
    let (negative, magnitude) = match coeff {
        Value::Rational(r) if r.is_negative() => (true, Value::Rational(r.abs())),
        other => (false, other.clone()),
    };
    if *first {
        if negative {
            out.push('-');
        }
        *first = false;
    } else if negative {
        out.push_str(" - ");
    } else {
        out.push_str(" + ");
    }

    let unit = matches!(&magnitude, Value::Rational(r) if *r == one);
    if k == 0 {
        out.push_str(&scalar_text(&magnitude));
    } else if unit {
        // `x^2`, not `1 * x^2`
    } else {
        out.push_str(&scalar_text(&magnitude));
        out.push_str(" * ");
    }
    if k == 1 {
        out.push_str(unknown);
    } else if k > 1 {
        out.push_str(&format!("{}^{}", unknown, k));
    }
}

/// Coefficient text; two-component complexes get parentheses so the term
/// reads unambiguously next to `*`.
fn scalar_text(value: &Value) -> String {
    let text = value.to_string();
    if text.contains(' ') {
        format!("({})", text)
    } else {
        text
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Reduced form: {}", self.reduced_form())?;
        write!(f, "Polynomial degree: {}", self.degree())?;
        if let Some(delta) = &self.discriminant {
            write!(f, "\nDiscriminant: {}", delta)?;
        }
        match &self.roots {
            Roots::AllNumbers => write!(f, "\nany real number is a solution"),
            Roots::NoSolution => write!(f, "\nno solution"),
            Roots::Linear(v) => write!(f, "\nThe solution is:\n{}", v),
            Roots::Double(v) => write!(f, "\nDiscriminant is zero, the solution is:\n{}", v),
            Roots::RealPair { plus, minus } => write!(
                f,
                "\nDiscriminant is strictly positive, the two solutions are:\n{}\n{}",
                plus, minus
            ),
            Roots::ConjugatePair { plus, minus } => write!(
                f,
                "\nDiscriminant is strictly negative, the two complex solutions are:\n{}\n{}",
                plus, minus
            ),
            Roots::NonRealPair { plus, minus } => write!(
                f,
                "\nDiscriminant is complex, the two solutions are:\n{}\n{}",
                plus, minus
            ),
        }
    }
}

/// Solve `lhs = rhs` for its single unknown.
pub fn solve(lhs: &Expr, rhs: &Expr, env: &Environment, mode: AngleMode) -> Result<Solution> {
    let unknown = find_unknown(lhs, rhs, env)?;

    let reducer = Reducer {
        unknown: &unknown,
        env,
        mode,
    };
    let left = reducer.reduce(lhs)?;
    let right = reducer.reduce(rhs)?;
    let mut coefficients = poly_sub(left, right)?;
    while coefficients.last().is_some_and(Value::is_zero) {
        coefficients.pop();
    }

    let degree = coefficients.len().saturating_sub(1);
    if degree > 2 {
        return Err(Error::Unsupported(format!(
            "polynomial degree {} is above the supported maximum of 2",
            degree
        )));
    }

    let (discriminant, roots) = classify_roots(&coefficients)?;
    Ok(Solution {
        unknown,
        coefficients,
        discriminant,
        roots,
    })
}

/// The unknown is the unique operand-position identifier unbound in the
/// environment. Reserved names never qualify.
fn find_unknown(lhs: &Expr, rhs: &Expr, env: &Environment) -> Result<String> {
    let mut names = BTreeSet::new();
    lhs.collect_identifiers(&mut names);
    rhs.collect_identifiers(&mut names);
    let unknowns: Vec<String> = names
        .into_iter()
        .filter(|name| !env.contains(name) && !builtins::is_reserved_name(name))
        .collect();
    match unknowns.as_slice() {
        [name] => Ok(name.clone()),
        [] => Err(Error::Shape(
            "the equation has no unknown to solve for".into(),
        )),
        _ => Err(Error::Shape(format!(
            "the equation has more than one unknown: {}",
            unknowns.join(", ")
        ))),
    }
}

struct Reducer<'a> {
    unknown: &'a str,
    env: &'a Environment,
    mode: AngleMode,
}

impl Reducer<'_> {
    /// Reduce a subtree to ascending coefficients of the unknown.
    fn reduce(&self, expr: &Expr) -> Result<Vec<Value>> {
        if !expr.contains_identifier(self.unknown) {
            let value = evaluate(expr, self.env, self.mode)?;
            if !value.is_scalar() {
                return Err(Error::Type(format!(
                    "equation coefficients must be scalars, found a {}",
                    value.type_name()
                )));
            }
            return Ok(vec![value]);
        }

        match expr {
            Expr::Identifier(name) if name == self.unknown => {
                Ok(vec![Value::from_integer(0), Value::from_integer(1)])
            }
            Expr::Negate(inner) => poly_neg(self.reduce(inner)?),
            Expr::Binary { op, left, right } => match op {
                BinaryOp::Add => poly_add(self.reduce(left)?, self.reduce(right)?),
                BinaryOp::Subtract => poly_sub(self.reduce(left)?, self.reduce(right)?),
                BinaryOp::Multiply => poly_mul(&self.reduce(left)?, &self.reduce(right)?),
                BinaryOp::Divide => {
                    if right.contains_identifier(self.unknown) {
                        return Err(Error::Unsupported(
                            "cannot divide by an expression containing the unknown".into(),
                        ));
                    }
                    let divisor = evaluate(right, self.env, self.mode)?;
                    let poly = self.reduce(left)?;
                    poly.into_iter().map(|c| c.div(&divisor)).collect()
                }
                BinaryOp::Power => {
                    if right.contains_identifier(self.unknown) {
                        return Err(Error::Unsupported(
                            "non-polynomial equation: the unknown appears in an exponent".into(),
                        ));
                    }
                    let exponent = evaluate(right, self.env, self.mode)?;
                    let exponent = match exponent {
                        Value::Rational(r) if r.is_integer() && !r.is_negative() => {
                            r.numer().clone()
                        }
                        _ => {
                            return Err(Error::Unsupported(
                                "non-polynomial equation: powers of the unknown must use \
                                 non-negative integer exponents"
                                    .into(),
                            ))
                        }
                    };
                    let base = self.reduce(left)?;
                    poly_pow(base, &exponent)
                }
            },
            // calls and matrices wrapping the unknown are not polynomial terms
            _ => Err(Error::Unsupported(
                "non-polynomial equation: the unknown appears inside an unsupported form".into(),
            )),
        }
    }
}

fn poly_zero() -> Value {
    Value::from_integer(0)
}

fn poly_add(mut a: Vec<Value>, b: Vec<Value>) -> Result<Vec<Value>> {
    if b.len() > a.len() {
        a.resize(b.len(), poly_zero());
    }
    for (k, coeff) in b.into_iter().enumerate() {
        a[k] = a[k].add(&coeff)?;
    }
    Ok(a)
}

fn poly_sub(mut a: Vec<Value>, b: Vec<Value>) -> Result<Vec<Value>> {
    if b.len() > a.len() {
        a.resize(b.len(), poly_zero());
    }
    for (k, coeff) in b.into_iter().enumerate() {
        a[k] = a[k].sub(&coeff)?;
    }
    Ok(a)
}

fn poly_neg(a: Vec<Value>) -> Result<Vec<Value>> {
    a.into_iter().map(|c| c.neg()).collect()
}

fn poly_mul(a: &[Value], b: &[Value]) -> Result<Vec<Value>> {
    let mut out = vec![poly_zero(); a.len() + b.len() - 1];
    for (ka, ca) in a.iter().enumerate() {
        for (kb, cb) in b.iter().enumerate() {
            let product = ca.mul(cb)?;
            out[ka + kb] = out[ka + kb].add(&product)?;
        }
    }
    Ok(out)
}

fn poly_pow(base: Vec<Value>, exponent: &BigInt) -> Result<Vec<Value>> {
    let e = exponent
        .to_u32()
        .ok_or_else(|| Error::Domain("exponent is too large".into()))?;
    let mut acc = vec![Value::from_integer(1)];
    for _ in 0..e {
        acc = poly_mul(&acc, &base)?;
    }
    Ok(acc)
}

/// Degree dispatch: identities, linear root, quadratic formula.
fn classify_roots(coefficients: &[Value]) -> Result<(Option<Value>, Roots)> {
    match coefficients.len() {
        0 => Ok((None, Roots::AllNumbers)),
        1 => Ok((None, Roots::NoSolution)),
        2 => {
            let root = coefficients[0].neg()?.div(&coefficients[1])?;
            Ok((None, Roots::Linear(root)))
        }
        3 => {
            let (c, b, a) = (&coefficients[0], &coefficients[1], &coefficients[2]);
            let four_ac = Value::from_integer(4).mul(a)?.mul(c)?;
            let delta = b.mul(b)?.sub(&four_ac)?;
            let two_a = Value::from_integer(2).mul(a)?;
            let neg_b = b.neg()?;

            let roots = match &delta {
                Value::Rational(r) if r.is_zero() => Roots::Double(neg_b.div(&two_a)?),
                Value::Rational(r) => {
                    let sqrt_delta = delta.sqrt()?;
                    let plus = neg_b.add(&sqrt_delta)?.div(&two_a)?;
                    let minus = neg_b.sub(&sqrt_delta)?.div(&two_a)?;
                    if r.is_negative() {
                        Roots::ConjugatePair { plus, minus }
                    } else {
                        Roots::RealPair { plus, minus }
                    }
                }
                _ => {
                    let sqrt_delta = delta.sqrt()?;
                    let plus = neg_b.add(&sqrt_delta)?.div(&two_a)?;
                    let minus = neg_b.sub(&sqrt_delta)?.div(&two_a)?;
                    Roots::NonRealPair { plus, minus }
                }
            };
            Ok((Some(delta), roots))
        }
        _ => unreachable!("degree above 2 is rejected before classification"),
    }
}
