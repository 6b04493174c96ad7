//! End-to-end tests of the session engine: parse, evaluate, render

use rechner_engine::{AngleMode, Engine, Error, Outcome};

/// Evaluate one line and render the outcome the way the REPL would.
fn eval(engine: &mut Engine, input: &str) -> String {
    match engine.eval_line(input).expect("statement should succeed") {
        Outcome::Value(v) => v.to_string(),
        Outcome::FunctionDefined(_) => String::new(),
        Outcome::Solved(s) => s.to_string(),
    }
}

#[test]
fn scenario_exact_division() {
    let mut engine = Engine::new();
    assert_eq!(eval(&mut engine, "7 / 2"), "7/2");
}

#[test]
fn scenario_complex_product() {
    let mut engine = Engine::new();
    assert_eq!(eval(&mut engine, "(2 + i) * (3 + 2*i)"), "4 + 7i");
}

#[test]
fn scenario_i_squared() {
    let mut engine = Engine::new();
    assert_eq!(eval(&mut engine, "i * i"), "-1");
}

#[test]
fn scenario_matrix_inverse() {
    let mut engine = Engine::new();
    assert_eq!(
        eval(&mut engine, "A = [[1,2],[3,4]]"),
        "[ [ 1 , 2 ] ; [ 3 , 4 ] ]"
    );
    assert_eq!(
        eval(&mut engine, "inv(A)"),
        "[ [ -2 , 1 ] ; [ 3/2 , -1/2 ] ]"
    );
}

#[test]
fn rendered_values_parse_back() {
    let mut engine = Engine::new();
    for input in [
        "7 / 2",
        "-3 / 4",
        "(2 + i) * (3 + 2*i)",
        "1/2 + i/3",
        "[[1, 2], [3, 4]]",
        "[[1/2, 2 + i]]",
    ] {
        let rendered = eval(&mut engine, input);
        let reparsed = eval(&mut engine, &rendered);
        assert_eq!(rendered, reparsed, "round-trip failed for '{}'", input);
    }
}

#[test]
fn decimal_literals_are_exact_rationals() {
    let mut engine = Engine::new();
    assert_eq!(eval(&mut engine, "0.5 + 0.25"), "3/4");
    assert_eq!(eval(&mut engine, "1.5 * 2"), "3");
}

#[test]
fn matrix_arithmetic() {
    let mut engine = Engine::new();
    eval(&mut engine, "A = [[1, 2], [3, 4]]");
    eval(&mut engine, "B = [[0, 1], [1, 0]]");
    assert_eq!(eval(&mut engine, "A + B"), "[ [ 1 , 3 ] ; [ 4 , 4 ] ]");
    assert_eq!(eval(&mut engine, "A * B"), "[ [ 2 , 1 ] ; [ 4 , 3 ] ]");
    assert_eq!(eval(&mut engine, "2 * A"), "[ [ 2 , 4 ] ; [ 6 , 8 ] ]");
    assert_eq!(eval(&mut engine, "A / 2"), "[ [ 1/2 , 1 ] ; [ 3/2 , 2 ] ]");
    assert_eq!(eval(&mut engine, "A ^ 0"), "[ [ 1 , 0 ] ; [ 0 , 1 ] ]");
    assert_eq!(eval(&mut engine, "A ^ -1"), eval(&mut engine, "inv(A)"));
}

#[test]
fn matrix_shape_errors() {
    let mut engine = Engine::new();
    eval(&mut engine, "A = [[1, 2], [3, 4]]");
    eval(&mut engine, "V = [[1], [2]]");
    assert!(matches!(
        engine.eval_line("A + V"),
        Err(Error::Shape(_))
    ));
    assert!(matches!(
        engine.eval_line("V * A"),
        Err(Error::Shape(_))
    ));
    assert!(matches!(
        engine.eval_line("inv(V)"),
        Err(Error::Shape(_))
    ));
}

#[test]
fn singular_matrix_inverse_fails() {
    let mut engine = Engine::new();
    eval(&mut engine, "S = [[1, 2], [2, 4]]");
    assert!(matches!(
        engine.eval_line("inv(S)"),
        Err(Error::Domain(_))
    ));
    assert!(matches!(engine.eval_line("S ^ -1"), Err(Error::Domain(_))));
}

#[test]
fn complex_matrix_inverts_exactly() {
    let mut engine = Engine::new();
    eval(&mut engine, "M = [[i, 0], [0, i]]");
    assert_eq!(eval(&mut engine, "inv(M)"), "[ [ -i , 0 ] ; [ 0 , -i ] ]");
    assert_eq!(eval(&mut engine, "M * inv(M)"), "[ [ 1 , 0 ] ; [ 0 , 1 ] ]");
}

#[test]
fn user_functions_compose_with_builtins() {
    let mut engine = Engine::new();
    assert_eq!(eval(&mut engine, "f(t) = t^2 + 1"), "");
    assert_eq!(eval(&mut engine, "f(3)"), "10");
    assert_eq!(eval(&mut engine, "sqrt(f(3) - 1)"), "3");

    // the body sees variables at call time
    eval(&mut engine, "g(t) = t + offset");
    assert!(matches!(engine.eval_line("g(1)"), Err(Error::Name(_))));
    eval(&mut engine, "offset = 10");
    assert_eq!(eval(&mut engine, "g(1)"), "11");
}

#[test]
fn builtins_shadow_user_bindings_in_call_position() {
    let mut engine = Engine::new();
    // a variable may not take a reserved name
    assert!(matches!(engine.eval_line("abs = 1"), Err(Error::Name(_))));
    assert_eq!(eval(&mut engine, "abs(-3)"), "3");
}

#[test]
fn angle_mode_is_session_state() {
    let mut engine = Engine::new();
    engine.set_angle_mode(AngleMode::Degrees);
    assert_eq!(eval(&mut engine, "sin(90)"), "1");
    assert_eq!(eval(&mut engine, "cos(0)"), "1");
    engine.set_angle_mode(AngleMode::Radians);
    assert_eq!(eval(&mut engine, "sin(0)"), "0");
}

#[test]
fn norm_on_scalars_vectors_and_matrices() {
    let mut engine = Engine::new();
    assert_eq!(eval(&mut engine, "norm(-7/2)"), "7/2");
    assert_eq!(eval(&mut engine, "norm(3 + 4*i)"), "5");
    assert_eq!(eval(&mut engine, "norm([[3, 4]])"), "5");
    assert_eq!(eval(&mut engine, "norm([[3], [4]])"), "5");
    // Frobenius norm of the 2x2 all-ones matrix is 2
    assert_eq!(eval(&mut engine, "norm([[1, 1], [1, 1]])"), "2");
}

#[test]
fn errors_do_not_poison_the_session() {
    let mut engine = Engine::new();
    eval(&mut engine, "x = 41");
    assert!(engine.eval_line("x + ").is_err());
    assert!(engine.eval_line("x / 0").is_err());
    assert!(engine.eval_line("x ^ (1/2)").is_err());
    assert_eq!(eval(&mut engine, "x + 1"), "42");
}

#[test]
fn sqrt_branches() {
    let mut engine = Engine::new();
    assert_eq!(eval(&mut engine, "sqrt(9/4)"), "3/2");
    assert_eq!(eval(&mut engine, "sqrt(-9)"), "3i");
    assert_eq!(eval(&mut engine, "sqrt(2*i)"), "1 + i");
    let approx = eval(&mut engine, "sqrt(2)");
    assert!(approx.starts_with("1.41421356"), "got '{}'", approx);
}
