//! rechner - interactive calculator entry point
//!
//! Exact rationals, complex numbers, matrices, user functions and quadratic
//! equation solving, driven from an interactive prompt or piped input.

mod config;
mod logging;
mod repl;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use crate::config::Config;
use crate::repl::Session;

#[derive(Parser)]
#[command(
    name = "rechner",
    version,
    about = "Exact-arithmetic expression interpreter"
)]
struct Cli {
    /// Evaluate a single statement and exit
    #[arg(short = 'c', long = "command", value_name = "STATEMENT")]
    command: Option<String>,

    /// Path to an explicit configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Do not load or save the interactive history
    #[arg(long)]
    no_history: bool,

    /// Suppress the startup banner
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    logging::init();

    let config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    let mut session = Session::new(&config, cli.no_history);

    if let Some(statement) = cli.command {
        let ok = session.eval_and_print(&statement);
        return Ok(if ok {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    session.run(cli.quiet)?;
    Ok(ExitCode::SUCCESS)
}
