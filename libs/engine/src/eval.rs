//! Evaluator - walks an expression tree against the environment
//!
//! One recursive pass. Arithmetic goes through the value algebra, so
//! promotion and collapse rules apply uniformly. A function call evaluates
//! its argument, then evaluates the body with a single local binding (the
//! parameter) layered over the session environment; nothing else from the
//! calling scope leaks in. Call depth is capped so runaway recursion like
//! `f(x) = f(x)` surfaces as an error instead of a stack overflow.

use crate::ast::{BinaryOp, Expr};
use crate::builtins::{self, AngleMode};
use crate::env::Environment;
use crate::error::{Error, Result};
use crate::matrix::Matrix;
use crate::rational::Rational;
use crate::value::Value;

const MAX_CALL_DEPTH: usize = 64;

/// Evaluate an expression against the environment.
pub fn evaluate(expr: &Expr, env: &Environment, mode: AngleMode) -> Result<Value> {
    let mut cx = EvalContext {
        env,
        mode,
        call_depth: 0,
    };
    cx.eval(expr, None)
}

/// The parameter binding of the innermost active function call.
struct LocalBinding<'a> {
    name: &'a str,
    value: &'a Value,
}

struct EvalContext<'a> {
    env: &'a Environment,
    mode: AngleMode,
    call_depth: usize,
}

impl EvalContext<'_> {
    fn eval(&mut self, expr: &Expr, local: Option<&LocalBinding>) -> Result<Value> {
        match expr {
            Expr::Number(r) => Ok(Value::Rational(r.clone())),
            Expr::ImaginaryUnit => Ok(Value::complex(Rational::zero(), Rational::one())),
            Expr::Identifier(name) => {
                if let Some(binding) = local {
                    if binding.name == name {
                        return Ok(binding.value.clone());
                    }
                }
                self.env
                    .get(name)
                    .cloned()
                    .ok_or_else(|| Error::Name(format!("undefined variable '{}'", name)))
            }
            Expr::Negate(inner) => self.eval(inner, local)?.neg(),
            Expr::Binary { op, left, right } => {
                let lhs = self.eval(left, local)?;
                let rhs = self.eval(right, local)?;
                match op {
                    BinaryOp::Add => lhs.add(&rhs),
                    BinaryOp::Subtract => lhs.sub(&rhs),
                    BinaryOp::Multiply => lhs.mul(&rhs),
                    BinaryOp::Divide => lhs.div(&rhs),
                    BinaryOp::Power => lhs.pow(&rhs),
                }
            }
            Expr::MatrixLiteral(rows) => {
                let mut cells = Vec::with_capacity(rows.len());
                for row in rows {
                    let mut out = Vec::with_capacity(row.len());
                    for cell in row {
                        out.push(self.eval(cell, local)?);
                    }
                    cells.push(out);
                }
                Ok(Value::Matrix(Matrix::from_rows(cells)?))
            }
            Expr::Call { name, arg } => self.eval_call(name, arg, local),
        }
    }

    fn eval_call(&mut self, name: &str, arg: &Expr, local: Option<&LocalBinding>) -> Result<Value> {
        let arg_value = self.eval(arg, local)?;

        // built-ins shadow user bindings
        if let Some(builtin) = builtins::lookup(name) {
            return builtin.apply(&arg_value, self.mode);
        }

        match self.env.get(name) {
            Some(Value::Function(function)) => {
                self.call_depth += 1;
                if self.call_depth > MAX_CALL_DEPTH {
                    self.call_depth -= 1;
                    return Err(Error::Unsupported(format!(
                        "call depth exceeded {} levels, aborting",
                        MAX_CALL_DEPTH
                    )));
                }
                let binding = LocalBinding {
                    name: &function.param,
                    value: &arg_value,
                };
                // only the parameter shadows; every other lookup goes to the
                // session environment
                let result = self.eval(&function.body, Some(&binding));
                self.call_depth -= 1;
                result
            }
            Some(other) => Err(Error::Type(format!(
                "'{}' is a {}, not a function",
                name,
                other.type_name()
            ))),
            None => Err(Error::Name(format!("undefined function '{}'", name))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_expression;
    use crate::value::Function;
    use std::sync::Arc;

    fn eval(input: &str, env: &Environment) -> Result<Value> {
        evaluate(&parse_expression(input).unwrap(), env, AngleMode::Radians)
    }

    fn define(env: &mut Environment, name: &str, param: &str, body: &str) {
        env.insert(
            name.into(),
            Value::Function(Function {
                name: name.into(),
                param: param.into(),
                body: Arc::new(parse_expression(body).unwrap()),
            }),
        );
    }

    #[test]
    fn arithmetic_with_promotion() {
        let env = Environment::new();
        assert_eq!(eval("7 / 2", &env).unwrap().to_string(), "7/2");
        assert_eq!(
            eval("(2 + i) * (3 + 2*i)", &env).unwrap().to_string(),
            "4 + 7i"
        );
        assert_eq!(eval("i * i", &env).unwrap().to_string(), "-1");
    }

    #[test]
    fn undefined_identifier() {
        let env = Environment::new();
        assert!(matches!(eval("x + 1", &env), Err(Error::Name(_))));
    }

    #[test]
    fn negation_promotes() {
        let env = Environment::new();
        assert_eq!(eval("-(2 + i)", &env).unwrap().to_string(), "-2 - i");
        assert_eq!(eval("-[[1, 2]]", &env).unwrap().to_string(), "[ [ -1 , -2 ] ]");
    }

    #[test]
    fn matrix_cells_must_be_scalar() {
        let env = Environment::new();
        assert!(matches!(
            eval("[[ [[1]] ]]", &env),
            Err(Error::Type(_))
        ));
    }

    #[test]
    fn call_binds_only_the_parameter() {
        let mut env = Environment::new();
        env.insert("a".into(), Value::from_integer(10));
        define(&mut env, "f", "t", "t + a");
        assert_eq!(eval("f(5)", &env).unwrap(), Value::from_integer(15));

        // the parameter of an outer call is invisible inside a nested call
        define(&mut env, "g", "u", "u * 2");
        define(&mut env, "h", "t", "g(t) + a");
        assert_eq!(eval("h(3)", &env).unwrap(), Value::from_integer(16));
    }

    #[test]
    fn calling_a_non_function_is_a_type_error() {
        let mut env = Environment::new();
        env.insert("a".into(), Value::from_integer(5));
        assert!(matches!(eval("a(3)", &env), Err(Error::Type(_))));
        assert!(matches!(eval("b(3)", &env), Err(Error::Name(_))));
    }

    #[test]
    fn runaway_recursion_is_cut_off() {
        let mut env = Environment::new();
        define(&mut env, "f", "x", "f(x)");
        assert!(matches!(eval("f(1)", &env), Err(Error::Unsupported(_))));
    }
}
