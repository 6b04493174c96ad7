//! Complex scalars over exact rationals
//!
//! A `Complex` is a pair of [`Rational`]s. All ring operations and division
//! are exact. The value algebra collapses a complex with zero imaginary part
//! back to a rational, so a stored `Complex` normally has a nonzero imaginary
//! component; the operations here still handle the zero case so the type is
//! usable on its own.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{Signed, Zero};

use crate::error::{Error, Result};
use crate::rational::Rational;

/// A complex number with rational components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Complex {
    re: Rational,
    im: Rational,
}

impl Complex {
    pub fn new(re: Rational, im: Rational) -> Self {
        Self { re, im }
    }

    /// The imaginary unit `i`.
    pub fn i() -> Self {
        Self::new(Rational::zero(), Rational::one())
    }

    pub fn from_real(re: Rational) -> Self {
        Self::new(re, Rational::zero())
    }

    pub fn re(&self) -> &Rational {
        &self.re
    }

    pub fn im(&self) -> &Rational {
        &self.im
    }

    pub fn into_parts(self) -> (Rational, Rational) {
        (self.re, self.im)
    }

    pub fn is_zero(&self) -> bool {
        self.re.is_zero() && self.im.is_zero()
    }

    pub fn conjugate(&self) -> Self {
        Self::new(self.re.clone(), -&self.im)
    }

    /// `re² + im²`, always exact arithmetic on the stored values.
    pub fn magnitude_squared(&self) -> Rational {
        &(&self.re * &self.re) + &(&self.im * &self.im)
    }

    /// `|z|`: exact when `re² + im²` is a perfect square of a rational.
    pub fn magnitude(&self) -> Result<Rational> {
        self.magnitude_squared().sqrt_nonneg()
    }

    /// Exact division; the divisor must be nonzero.
    pub fn div(&self, other: &Self) -> Result<Self> {
        let denom = other.magnitude_squared();
        if denom.is_zero() {
            return Err(Error::Domain("division by zero".into()));
        }
        // (a+bi)/(c+di) = ((ac+bd) + (bc-ad)i) / (c²+d²)
        let re = &(&self.re * &other.re) + &(&self.im * &other.im);
        let im = &(&self.im * &other.re) - &(&self.re * &other.im);
        Ok(Self::new(re.div(&denom)?, im.div(&denom)?))
    }

    /// Exact reciprocal `1/z` of a nonzero value.
    pub fn reciprocal(&self) -> Result<Self> {
        Complex::from_real(Rational::one()).div(self)
    }

    /// Integer power; negative exponents go through the exact reciprocal.
    pub fn pow(&self, exp: &BigInt) -> Result<Self> {
        if exp.is_negative() {
            if self.is_zero() {
                return Err(Error::Domain(
                    "zero cannot be raised to a negative power".into(),
                ));
            }
            return self.reciprocal()?.pow(&-exp);
        }
        let mut n = exp.clone();
        let mut base = self.clone();
        let mut acc = Complex::from_real(Rational::one());
        // binary exponentiation over the exact field
        while !n.is_zero() {
            if n.is_odd() {
                acc = &acc * &base;
            }
            base = &base * &base;
            n >>= 1;
        }
        Ok(acc)
    }

    /// Principal square root.
    ///
    /// Uses `sqrt(z) = sqrt((|z|+re)/2) + sign(im) * sqrt((|z|-re)/2) i`,
    /// which stays exact whenever the intermediate magnitudes are perfect
    /// squares (e.g. `sqrt(2i) = 1 + i`).
    pub fn sqrt(&self) -> Result<Self> {
        let mag = self.magnitude()?;
        let two = Rational::from_integer(2);
        let re_part = (&mag + &self.re).div(&two)?.sqrt_nonneg()?;
        let im_part = (&mag - &self.re).div(&two)?.sqrt_nonneg()?;
        let im_part = if self.im.is_negative() {
            -&im_part
        } else {
            im_part
        };
        Ok(Self::new(re_part, im_part))
    }
}

impl Add for &Complex {
    type Output = Complex;

    fn add(self, other: &Complex) -> Complex {
        Complex::new(&self.re + &other.re, &self.im + &other.im)
    }
}

impl Sub for &Complex {
    type Output = Complex;

    fn sub(self, other: &Complex) -> Complex {
        Complex::new(&self.re - &other.re, &self.im - &other.im)
    }
}

impl Mul for &Complex {
    type Output = Complex;

    fn mul(self, other: &Complex) -> Complex {
        let re = &(&self.re * &other.re) - &(&self.im * &other.im);
        let im = &(&self.re * &other.im) + &(&self.im * &other.re);
        Complex::new(re, im)
    }
}

impl Neg for &Complex {
    type Output = Complex;

    fn neg(self) -> Complex {
        Complex::new(-&self.re, -&self.im)
    }
}

impl fmt::Display for Complex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }
        if self.im.is_zero() {
            return write!(f, "{}", self.re);
        }
        let one = Rational::one();
        if self.re.is_zero() {
            return if self.im == one {
                write!(f, "i")
            } else if self.im == -&one {
                write!(f, "-i")
            } else {
                write!(f, "{}i", self.im)
            };
        }
        let (sign, im_abs) = if self.im.is_negative() {
            ("-", self.im.abs())
        } else {
            ("+", self.im.clone())
        };
        if im_abs == one {
            write!(f, "{} {} i", self.re, sign)
        } else {
            write!(f, "{} {} {}i", self.re, sign, im_abs)
        }
    }
}
