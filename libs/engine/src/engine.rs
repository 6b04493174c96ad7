//! Session façade
//!
//! `Engine` owns the state of one interpreter session: the environment and
//! the angle mode. `eval_line` parses a line, routes the statement to the
//! evaluator or the solver, and only mutates the environment after the right
//! side evaluated successfully, so a failed statement leaves the session
//! exactly as it was.

use std::sync::Arc;

use crate::ast::Statement;
use crate::builtins::{self, AngleMode};
use crate::env::Environment;
use crate::error::{Error, Result};
use crate::eval::evaluate;
use crate::parser;
use crate::solve::{solve, Solution};
use crate::value::{Function, Value};

/// What a successfully handled line produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// An expression or assignment result to print.
    Value(Value),
    /// A function definition; prints nothing.
    FunctionDefined(String),
    /// A solved equation query.
    Solved(Solution),
}

/// One interpreter session.
#[derive(Debug, Default)]
pub struct Engine {
    env: Environment,
    angle_mode: AngleMode,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn angle_mode(&self) -> AngleMode {
        self.angle_mode
    }

    /// Angle-mode state is session-wide; this is its only mutator.
    pub fn set_angle_mode(&mut self, mode: AngleMode) {
        self.angle_mode = mode;
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    /// Parse and execute one input line.
    pub fn eval_line(&mut self, input: &str) -> Result<Outcome> {
        match parser::parse_statement(input)? {
            Statement::Expression(expr) => {
                let value = evaluate(&expr, &self.env, self.angle_mode)?;
                Ok(Outcome::Value(value))
            }
            Statement::Assignment { name, expr } => {
                if builtins::is_reserved_name(&name) {
                    return Err(Error::Name(format!(
                        "'{}' is a reserved name and cannot be assigned",
                        name
                    )));
                }
                let value = evaluate(&expr, &self.env, self.angle_mode)?;
                self.env.insert(name, value.clone());
                Ok(Outcome::Value(value))
            }
            Statement::FunctionDef { name, param, body } => {
                if builtins::is_reserved_name(&name) {
                    return Err(Error::Name(format!(
                        "'{}' is a reserved name and cannot be defined as a function",
                        name
                    )));
                }
                if builtins::is_reserved_name(&param) {
                    return Err(Error::Name(format!(
                        "'{}' is a reserved name and cannot be used as a parameter",
                        param
                    )));
                }
                let function = Function {
                    name: name.clone(),
                    param,
                    body: Arc::new(body),
                };
                self.env.insert(name.clone(), Value::Function(function));
                Ok(Outcome::FunctionDefined(name))
            }
            Statement::EquationQuery { lhs, rhs } => {
                let solution = solve(&lhs, &rhs, &self.env, self.angle_mode)?;
                Ok(Outcome::Solved(solution))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value_of(engine: &mut Engine, input: &str) -> String {
        match engine.eval_line(input).unwrap() {
            Outcome::Value(v) => v.to_string(),
            other => panic!("expected a value for '{}', got {:?}", input, other),
        }
    }

    #[test]
    fn assignment_prints_and_persists() {
        let mut engine = Engine::new();
        assert_eq!(value_of(&mut engine, "x = 7 / 2"), "7/2");
        assert_eq!(value_of(&mut engine, "x + x"), "7");
    }

    #[test]
    fn function_definition_is_quiet() {
        let mut engine = Engine::new();
        assert!(matches!(
            engine.eval_line("f(t) = t ^ 2").unwrap(),
            Outcome::FunctionDefined(name) if name == "f"
        ));
        assert_eq!(value_of(&mut engine, "f(3)"), "9");
    }

    #[test]
    fn failed_statement_leaves_environment_unchanged() {
        let mut engine = Engine::new();
        engine.eval_line("x = 5").unwrap();
        let before = engine.environment().clone();
        assert!(engine.eval_line("x = 1 / 0").is_err());
        assert!(engine.eval_line("y = nope + 1").is_err());
        assert_eq!(engine.environment(), &before);
    }

    #[test]
    fn reserved_names_are_rejected() {
        let mut engine = Engine::new();
        assert!(matches!(engine.eval_line("sin = 2"), Err(Error::Name(_))));
        assert!(matches!(
            engine.eval_line("sqrt(t) = t"),
            Err(Error::Name(_))
        ));
        assert!(matches!(
            engine.eval_line("f(sin) = 2"),
            Err(Error::Name(_))
        ));
        assert!(matches!(engine.eval_line("i = 3"), Err(Error::Name(_))));
        assert!(matches!(engine.eval_line("i(t) = t"), Err(Error::Name(_))));
        assert!(matches!(engine.eval_line("i(3)"), Err(Error::Name(_))));
    }

    #[test]
    fn angle_mode_changes_trig() {
        let mut engine = Engine::new();
        engine.set_angle_mode(AngleMode::Degrees);
        assert_eq!(value_of(&mut engine, "sin(90)"), "1");
    }
}
