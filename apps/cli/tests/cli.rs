//! End-to-end tests of the rechner binary
//!
//! Each test points XDG_CONFIG_HOME at a scratch directory so a developer's
//! real configuration and history never leak in.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn rechner(scratch: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("rechner").expect("binary builds");
    cmd.env("XDG_CONFIG_HOME", scratch.path());
    cmd.arg("--no-history");
    cmd
}

#[test]
fn one_shot_expression() {
    let scratch = TempDir::new().unwrap();
    rechner(&scratch)
        .args(["-c", "7 / 2"])
        .assert()
        .success()
        .stdout("7/2\n");
}

#[test]
fn one_shot_error_exits_nonzero() {
    let scratch = TempDir::new().unwrap();
    rechner(&scratch)
        .args(["-c", "1 / 0"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Error: division by zero"));
}

#[test]
fn piped_session_keeps_state() {
    let scratch = TempDir::new().unwrap();
    rechner(&scratch)
        .write_stdin("A = [[1,2],[3,4]]\ninv(A)\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("[ [ -2 , 1 ] ; [ 3/2 , -1/2 ] ]"));
}

#[test]
fn piped_errors_do_not_end_the_session() {
    let scratch = TempDir::new().unwrap();
    rechner(&scratch)
        .write_stdin("1 / 0\n2 + 2\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Error: division by zero").and(predicate::str::contains("4\n")));
}

#[test]
fn equation_query_report() {
    let scratch = TempDir::new().unwrap();
    rechner(&scratch)
        .write_stdin("x^2 - 5*x + 6 = 0 ?\n")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Reduced form: x^2 - 5 * x + 6 = 0")
                .and(predicate::str::contains("Polynomial degree: 2"))
                .and(predicate::str::contains("Discriminant: 1"))
                .and(predicate::str::contains(
                    "Discriminant is strictly positive, the two solutions are:\n3\n2",
                )),
        );
}

#[test]
fn function_definitions_print_nothing() {
    let scratch = TempDir::new().unwrap();
    rechner(&scratch)
        .write_stdin("f(t) = t^2\nf(4)\n")
        .assert()
        .success()
        .stdout("16\n");
}

#[test]
fn angles_command_switches_trig_mode() {
    let scratch = TempDir::new().unwrap();
    rechner(&scratch)
        .write_stdin("angles deg\nsin(90)\nangles\n")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("angle mode: degrees")
                .and(predicate::str::contains("1\n")),
        );
}

#[test]
fn vars_lists_bindings_sorted() {
    let scratch = TempDir::new().unwrap();
    rechner(&scratch)
        .write_stdin("b = 2\na = 1\nvars\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("a = 1\nb = 2"));
}

#[test]
fn exit_command_stops_reading() {
    let scratch = TempDir::new().unwrap();
    rechner(&scratch)
        .write_stdin("1 + 1\nexit\n3 + 3\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("2\n").and(predicate::str::contains("6").not()));
}

#[test]
fn config_file_sets_angle_mode() {
    let scratch = TempDir::new().unwrap();
    let dir = scratch.path().join("rechner");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("config.toml"), "angle-mode = \"degrees\"\n").unwrap();

    rechner(&scratch)
        .args(["-c", "sin(90)"])
        .assert()
        .success()
        .stdout("1\n");
}

#[test]
fn bad_config_fails_at_startup() {
    let scratch = TempDir::new().unwrap();
    let path = scratch.path().join("bad.toml");
    std::fs::write(&path, "angle-mode = \"gradians\"\n").unwrap();

    rechner(&scratch)
        .arg("--config")
        .arg(&path)
        .args(["-c", "1 + 1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration"));
}
