//! Property-based tests for the value algebra and the solver
//!
//! Random values go through local `Arb*` wrappers because quickcheck's
//! `Arbitrary` cannot be implemented for the engine types from here.

use num_bigint::BigInt;
use quickcheck::{quickcheck, Arbitrary, Gen, TestResult};
use rechner_engine::complex::Complex;
use rechner_engine::matrix::Matrix;
use rechner_engine::rational::Rational;
use rechner_engine::value::Value;
use rechner_engine::{Engine, Outcome, Roots};

#[derive(Debug, Clone)]
struct ArbRational(Rational);

impl Arbitrary for ArbRational {
    fn arbitrary(g: &mut Gen) -> Self {
        let numer = i64::arbitrary(g) % 1_000;
        let denom = (i64::arbitrary(g) % 1_000).abs() + 1;
        ArbRational(Rational::new(BigInt::from(numer), BigInt::from(denom)).expect("denom > 0"))
    }
}

#[derive(Debug, Clone)]
struct ArbComplex(Complex);

impl Arbitrary for ArbComplex {
    fn arbitrary(g: &mut Gen) -> Self {
        let re = ArbRational::arbitrary(g).0;
        let im = ArbRational::arbitrary(g).0;
        ArbComplex(Complex::new(re, im))
    }
}

#[derive(Debug, Clone)]
struct ArbMatrix2(Matrix);

impl Arbitrary for ArbMatrix2 {
    fn arbitrary(g: &mut Gen) -> Self {
        let cell = |g: &mut Gen| Value::Rational(ArbRational::arbitrary(g).0);
        let rows = vec![
            vec![cell(g), cell(g)],
            vec![cell(g), cell(g)],
        ];
        ArbMatrix2(Matrix::from_rows(rows).expect("2x2 is rectangular"))
    }
}

quickcheck! {
    fn rational_stays_normalized(a: ArbRational, b: ArbRational) -> bool {
        use num_integer::Integer;
        use num_traits::Zero;
        let sum = &a.0 + &b.0;
        let product = &a.0 * &b.0;
        [sum, product].iter().all(|r| {
            r.denom().sign() != num_bigint::Sign::Minus
                && !r.denom().is_zero()
                && r.numer().gcd(r.denom()) == BigInt::from(1)
                || r.numer().is_zero()
        })
    }

    fn rational_addition_is_associative(a: ArbRational, b: ArbRational, c: ArbRational) -> bool {
        let left = &(&a.0 + &b.0) + &c.0;
        let right = &a.0 + &(&b.0 + &c.0);
        left == right
    }

    fn rational_multiplication_is_associative(a: ArbRational, b: ArbRational, c: ArbRational) -> bool {
        let left = &(&a.0 * &b.0) * &c.0;
        let right = &a.0 * &(&b.0 * &c.0);
        left == right
    }

    fn complex_addition_is_associative(a: ArbComplex, b: ArbComplex, c: ArbComplex) -> bool {
        let left = &(&a.0 + &b.0) + &c.0;
        let right = &a.0 + &(&b.0 + &c.0);
        left == right
    }

    fn complex_multiplication_is_associative(a: ArbComplex, b: ArbComplex, c: ArbComplex) -> bool {
        let left = &(&a.0 * &b.0) * &c.0;
        let right = &a.0 * &(&b.0 * &c.0);
        left == right
    }

    fn complex_ops_collapse_zero_imaginary(a: ArbComplex, b: ArbComplex) -> bool {
        let lhs = Value::from_complex(a.0.clone());
        let rhs = Value::from_complex(b.0);
        [lhs.add(&rhs), lhs.sub(&rhs), lhs.mul(&rhs)]
            .into_iter()
            .flatten()
            .all(|v| match v {
                Value::Complex(c) => !c.im().is_zero(),
                _ => true,
            })
    }

    fn identity_is_neutral(m: ArbMatrix2) -> bool {
        let identity = Matrix::identity(2);
        m.0.mul(&identity).ok() == Some(m.0.clone())
            && identity.mul(&m.0).ok() == Some(m.0.clone())
    }

    fn inverse_multiplies_to_identity(m: ArbMatrix2) -> TestResult {
        let inverse = match m.0.inverse() {
            Ok(inverse) => inverse,
            // singular inputs are out of the law's domain
            Err(_) => return TestResult::discard(),
        };
        let product = match m.0.mul(&inverse) {
            Ok(product) => product,
            Err(_) => return TestResult::failed(),
        };
        TestResult::from_bool(product == Matrix::identity(2))
    }

    fn rendered_rational_parses_back(a: ArbRational) -> bool {
        roundtrips(&Value::Rational(a.0))
    }

    fn rendered_complex_parses_back(a: ArbComplex) -> bool {
        roundtrips(&Value::from_complex(a.0))
    }

    fn rendered_matrix_parses_back(m: ArbMatrix2) -> bool {
        roundtrips(&Value::Matrix(m.0))
    }

    fn quadratic_roots_substitute_to_zero(
        a: ArbRational,
        b: ArbRational,
        c: ArbRational
    ) -> TestResult {
        if a.0.is_zero() {
            return TestResult::discard();
        }
        let mut engine = Engine::new();
        engine.eval_line(&format!("qa = {}", a.0)).expect("bind a");
        engine.eval_line(&format!("qb = {}", b.0)).expect("bind b");
        engine.eval_line(&format!("qc = {}", c.0)).expect("bind c");
        let solution = match engine.eval_line("qa*x^2 + qb*x + qc = 0 ?") {
            Ok(Outcome::Solved(solution)) => solution,
            _ => return TestResult::failed(),
        };
        let roots = match solution.roots {
            Roots::Double(root) => vec![root],
            Roots::RealPair { plus, minus } => vec![plus, minus],
            Roots::ConjugatePair { plus, minus } => vec![plus, minus],
            _ => return TestResult::failed(),
        };
        for root in roots {
            let residual = substitute(&engine, &root);
            if residual > 1e-6 {
                return TestResult::failed();
            }
        }
        TestResult::passed()
    }
}

/// Render, reparse, reevaluate: the value must survive unchanged.
fn roundtrips(value: &Value) -> bool {
    let rendered = value.to_string();
    let mut engine = Engine::new();
    match engine.eval_line(&rendered) {
        Ok(Outcome::Value(parsed)) => parsed == *value,
        _ => false,
    }
}

/// |qa·r² + qb·r + qc| in floats, small when r is a root.
fn substitute(engine: &Engine, root: &Value) -> f64 {
    let mut check = Engine::new();
    for name in ["qa", "qb", "qc"] {
        let value = engine
            .environment()
            .get(name)
            .expect("coefficient is bound")
            .clone();
        match check.eval_line(&format!("{} = {}", name, value)) {
            Ok(_) => {}
            Err(_) => return f64::INFINITY,
        }
    }
    if check.eval_line(&format!("x = {}", root)).is_err() {
        return f64::INFINITY;
    }
    match check.eval_line("qa*x^2 + qb*x + qc") {
        Ok(Outcome::Value(Value::Rational(r))) => r.to_f64().abs(),
        Ok(Outcome::Value(Value::Complex(c))) => {
            c.re().to_f64().abs() + c.im().to_f64().abs()
        }
        _ => f64::INFINITY,
    }
}
