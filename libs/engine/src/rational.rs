//! Exact rational scalars
//!
//! A `Rational` is an arbitrary-precision fraction, always reduced and with a
//! positive denominator. Alongside the exact value it carries a display
//! representation: `Fraction` renders as `n/d`, `Decimal` renders through the
//! shortest-round-trip `f64` form. Transcendental fallbacks construct
//! `Decimal` rationals from their `f64` approximation; the representation is
//! sticky, so an operation touching a nonzero `Decimal` operand yields a
//! `Decimal` result. An operand that is exactly zero is representation-
//! neutral. Arithmetic and comparison always use the exact stored value.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use num_bigint::BigInt;
use num_integer::Roots;
use num_rational::BigRational;
use num_traits::{One, Pow, Signed, ToPrimitive, Zero};

use crate::error::{Error, Result};

/// Display representation of a rational.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repr {
    /// Exact `n/d` rendering.
    Fraction,
    /// Decimal rendering via `f64`; marks values produced by floating fallback.
    Decimal,
}

impl Repr {
    fn combine(self, other: Repr) -> Repr {
        if self == Repr::Decimal || other == Repr::Decimal {
            Repr::Decimal
        } else {
            Repr::Fraction
        }
    }
}

/// An exact rational number with a display representation.
#[derive(Debug, Clone)]
pub struct Rational {
    value: BigRational,
    repr: Repr,
}

impl Rational {
    fn exact(value: BigRational) -> Self {
        Self {
            value,
            repr: Repr::Fraction,
        }
    }

    /// Build `numer/denom`, normalizing sign and reducing.
    pub fn new(numer: BigInt, denom: BigInt) -> Result<Self> {
        if denom.is_zero() {
            return Err(Error::Domain("division by zero".into()));
        }
        Ok(Self::exact(BigRational::new(numer, denom)))
    }

    pub fn zero() -> Self {
        Self::exact(BigRational::zero())
    }

    pub fn one() -> Self {
        Self::exact(BigRational::one())
    }

    pub fn from_integer(n: impl Into<BigInt>) -> Self {
        Self::exact(BigRational::from_integer(n.into()))
    }

    /// Parse an integer literal (a run of digits).
    pub fn from_integer_literal(text: &str) -> Result<Self> {
        let n: BigInt = text
            .parse()
            .map_err(|_| Error::Lex(format!("invalid integer literal '{}'", text)))?;
        Ok(Self::from_integer(n))
    }

    /// Parse a decimal literal `digits.digits` into the exact rational
    /// `all-digits / 10^(fractional length)`.
    pub fn from_decimal_literal(text: &str) -> Result<Self> {
        let (int_part, frac_part) = text
            .split_once('.')
            .ok_or_else(|| Error::Lex(format!("invalid decimal literal '{}'", text)))?;
        let digits: BigInt = format!("{}{}", int_part, frac_part)
            .parse()
            .map_err(|_| Error::Lex(format!("invalid decimal literal '{}'", text)))?;
        let denom = Pow::pow(BigInt::from(10), frac_part.len() as u32);
        Self::new(digits, denom)
    }

    /// Capture an `f64` approximation as a `Decimal`-rendered rational.
    pub fn approx(f: f64) -> Result<Self> {
        let value = BigRational::from_float(f)
            .ok_or_else(|| Error::Domain("result is not a finite number".into()))?;
        Ok(Self {
            value,
            repr: Repr::Decimal,
        })
    }

    pub fn numer(&self) -> &BigInt {
        self.value.numer()
    }

    pub fn denom(&self) -> &BigInt {
        self.value.denom()
    }

    pub fn repr(&self) -> Repr {
        self.repr
    }

    pub fn is_exact(&self) -> bool {
        self.repr == Repr::Fraction
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.value.is_negative()
    }

    /// True when the denominator is 1.
    pub fn is_integer(&self) -> bool {
        self.value.is_integer()
    }

    pub fn to_f64(&self) -> f64 {
        self.value.to_f64().unwrap_or(f64::NAN)
    }

    pub fn abs(&self) -> Self {
        Self {
            value: self.value.abs(),
            repr: self.repr,
        }
    }

    /// Largest integer not above the value; exact.
    pub fn floor(&self) -> Self {
        Self::exact(self.value.floor())
    }

    /// Smallest integer not below the value; exact.
    pub fn ceil(&self) -> Self {
        Self::exact(self.value.ceil())
    }

    /// Division, rejecting a zero divisor.
    pub fn div(&self, other: &Self) -> Result<Self> {
        if other.is_zero() {
            return Err(Error::Domain("division by zero".into()));
        }
        Ok(Self {
            value: &self.value / &other.value,
            repr: self.operand_repr().combine(other.operand_repr()),
        })
    }

    /// Integer power. Negative exponents require a nonzero base.
    pub fn pow(&self, exp: &BigInt) -> Result<Self> {
        if exp.is_negative() && self.is_zero() {
            return Err(Error::Domain(
                "zero cannot be raised to a negative power".into(),
            ));
        }
        let e = exp
            .to_i32()
            .ok_or_else(|| Error::Domain("exponent is too large".into()))?;
        Ok(Self {
            value: self.value.clone().pow(e),
            repr: self.repr,
        })
    }

    /// Repr this value contributes to a binary operation. An exact zero is
    /// representation-neutral: adding or multiplying by it cannot make an
    /// exact result inexact, whatever produced the zero.
    fn operand_repr(&self) -> Repr {
        if self.value.is_zero() {
            Repr::Fraction
        } else {
            self.repr
        }
    }

    /// Square root of a non-negative rational: exact when both numerator and
    /// denominator are perfect squares, otherwise the `f64` approximation.
    ///
    /// Callers handle the negative case (it promotes to a complex result).
    pub fn sqrt_nonneg(&self) -> Result<Self> {
        debug_assert!(!self.is_negative());
        if self.is_exact() {
            let n = self.numer().sqrt();
            let d = self.denom().sqrt();
            if &n * &n == *self.numer() && &d * &d == *self.denom() {
                return Self::new(n, d);
            }
        }
        Self::approx(self.to_f64().sqrt())
    }
}

impl PartialEq for Rational {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Rational {}

impl PartialOrd for Rational {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rational {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl Add for &Rational {
    type Output = Rational;

    fn add(self, other: &Rational) -> Rational {
        Rational {
            value: &self.value + &other.value,
            repr: self.operand_repr().combine(other.operand_repr()),
        }
    }
}

impl Sub for &Rational {
    type Output = Rational;

    fn sub(self, other: &Rational) -> Rational {
        Rational {
            value: &self.value - &other.value,
            repr: self.operand_repr().combine(other.operand_repr()),
        }
    }
}

impl Mul for &Rational {
    type Output = Rational;

    fn mul(self, other: &Rational) -> Rational {
        Rational {
            value: &self.value * &other.value,
            repr: self.operand_repr().combine(other.operand_repr()),
        }
    }
}

impl Neg for &Rational {
    type Output = Rational;

    fn neg(self) -> Rational {
        Rational {
            value: -&self.value,
            repr: self.repr,
        }
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.repr {
            Repr::Decimal => write!(f, "{}", self.to_f64()),
            Repr::Fraction => {
                if self.is_integer() {
                    write!(f, "{}", self.numer())
                } else {
                    write!(f, "{}/{}", self.numer(), self.denom())
                }
            }
        }
    }
}
