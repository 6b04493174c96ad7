//! Interactive session
//!
//! Two line sources share one dispatch path: rustyline with persistent
//! history when stdin is a terminal, a plain buffered reader otherwise
//! (piped input, tests). Meta-commands (`help`, `vars`, `angles`, `history`,
//! `exit`) are handled here; everything else goes to the engine. Errors are
//! reported as a single `Error: <message>` line and never end the session.

use std::fs;
use std::io::{self, BufRead, IsTerminal};
use std::path::PathBuf;

use anyhow::Context;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::debug;

use rechner_engine::{AngleMode, Engine, Outcome};

use crate::config::Config;

pub struct Session {
    engine: Engine,
    prompt: String,
    history_file: Option<PathBuf>,
    history_size: usize,
    /// Lines dispatched this session, for the `history` command.
    entered: Vec<String>,
}

/// What the dispatcher decided about one line.
enum Flow {
    Continue,
    Exit,
}

impl Session {
    pub fn new(config: &Config, no_history: bool) -> Self {
        let mut engine = Engine::new();
        engine.set_angle_mode(config.angle_mode);
        Self {
            engine,
            prompt: config.prompt.clone(),
            history_file: if no_history {
                None
            } else {
                config.history_file.clone()
            },
            history_size: config.history_size,
            entered: Vec::new(),
        }
    }

    /// Evaluate one statement, print the outcome or the error line.
    /// Returns false when the statement failed.
    pub fn eval_and_print(&mut self, line: &str) -> bool {
        match self.engine.eval_line(line) {
            Ok(Outcome::Value(value)) => {
                println!("{}", value);
                true
            }
            Ok(Outcome::FunctionDefined(_)) => true,
            Ok(Outcome::Solved(solution)) => {
                println!("{}", solution);
                true
            }
            Err(error) => {
                println!("Error: {}", error);
                false
            }
        }
    }

    pub fn run(&mut self, quiet: bool) -> anyhow::Result<()> {
        if io::stdin().is_terminal() {
            self.run_editor(quiet)
        } else {
            self.run_piped()
        }
    }

    fn run_piped(&mut self) -> anyhow::Result<()> {
        for line in io::stdin().lock().lines() {
            let line = line.context("failed to read from stdin")?;
            if matches!(self.dispatch(line.trim()), Flow::Exit) {
                break;
            }
        }
        Ok(())
    }

    fn run_editor(&mut self, quiet: bool) -> anyhow::Result<()> {
        let mut editor = DefaultEditor::new().context("failed to initialize the line editor")?;
        if let Some(path) = &self.history_file {
            // a missing history file is a fresh session, not an error
            let _ = editor.load_history(path);
        }

        if !quiet {
            println!(
                "rechner {} - type 'help' for commands, ctrl-d to quit",
                env!("CARGO_PKG_VERSION")
            );
        }

        loop {
            match editor.readline(&self.prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    let _ = editor.add_history_entry(line);
                    if matches!(self.dispatch(line), Flow::Exit) {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => break,
                Err(error) => return Err(error).context("line reader failure"),
            }
        }

        if let Some(path) = &self.history_file {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("cannot create {}", parent.display()))?;
            }
            editor
                .save_history(path)
                .with_context(|| format!("cannot save history to {}", path.display()))?;
            debug!(path = %path.display(), "history saved");
        }
        Ok(())
    }

    fn dispatch(&mut self, line: &str) -> Flow {
        if line.is_empty() {
            return Flow::Continue;
        }
        self.entered.push(line.to_string());
        if self.entered.len() > self.history_size {
            self.entered.remove(0);
        }

        let mut words = line.split_whitespace();
        let first = words.next().unwrap_or_default();
        let rest: Vec<&str> = words.collect();

        match (first, rest.as_slice()) {
            ("exit" | "quit", []) => return Flow::Exit,
            ("help", []) => self.print_help(),
            ("vars", []) => self.print_vars(),
            ("history", []) => self.print_history(),
            ("angles", []) => println!("angle mode: {}", self.engine.angle_mode()),
            ("angles", [mode]) if matches!(*mode, "rad" | "radians") => {
                self.engine.set_angle_mode(AngleMode::Radians);
                println!("angle mode: radians");
            }
            ("angles", [mode]) if matches!(*mode, "deg" | "degrees") => {
                self.engine.set_angle_mode(AngleMode::Degrees);
                println!("angle mode: degrees");
            }
            ("angles", [other]) => {
                println!("Error: unknown angle mode '{}', expected rad or deg", other);
            }
            _ => {
                self.eval_and_print(line);
            }
        }
        Flow::Continue
    }

    fn print_help(&self) {
        println!("expressions     7 / 2,  (2 + i) * 3,  [[1,2],[3,4]],  sqrt(2)");
        println!("assignment      x = 4 + 4");
        println!("function        f(t) = t^2 - 1        (prints nothing)");
        println!("equation        x^2 - 5*x + 6 = 0 ?   (solves for x, degree <= 2)");
        println!("built-ins       {}", rechner_engine::builtins::names().join(", "));
        println!("commands        help, vars, history, angles [rad|deg], exit");
    }

    fn print_vars(&self) {
        let env = self.engine.environment();
        if env.is_empty() {
            println!("no bindings yet");
            return;
        }
        for (name, value) in env.iter_sorted() {
            match value {
                rechner_engine::Value::Function(_) => println!("{}", value),
                _ => println!("{} = {}", name, value),
            }
        }
    }

    fn print_history(&self) {
        for (index, line) in self.entered.iter().enumerate() {
            println!("{:4}  {}", index + 1, line);
        }
    }
}
