//! # hako-lint CLI entry point
//!
//! Parses arguments, installs logging and maps the lint outcome to an exit
//! code. Logs go to stderr so stdout carries only the report.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use hako_cli::lint::{run_lint, LintArgs, EXIT_ERROR};

/// Cross-file consistency linter for Hakoniwa remote API configs.
///
/// Checks a participant manifest, the RPC service definition it references,
/// and every endpoint file reachable from there.
#[derive(Parser, Debug)]
#[command(name = "hako-lint", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(flatten)]
    lint: LintArgs,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run_lint(&cli.lint) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}
