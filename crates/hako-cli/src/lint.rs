//! # Lint Command
//!
//! Lints one participant manifest and the RPC document it references, then
//! prints the report to stdout.
//!
//! Text output is `LINT OK`, or `LINT FAILED:` followed by one ` - <message>`
//! line per finding. JSON output is the serialized [`LintReport`].

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use hako_core::LintConfig;
use hako_lint::{LintReport, Linter};

/// Exit code for a clean run.
pub const EXIT_OK: u8 = 0;
/// Exit code when at least one finding was reported.
pub const EXIT_FINDINGS: u8 = 1;
/// Exit code when the command itself could not run.
pub const EXIT_ERROR: u8 = 2;

/// Report rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Arguments for the lint command.
#[derive(Args, Debug)]
pub struct LintArgs {
    /// Participant manifest to lint (remote-api.json).
    #[arg(value_name = "MANIFEST")]
    pub manifest: PathBuf,

    /// YAML file overriding the lint constants.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Execute the lint command.
///
/// Returns exit code: 0 on success, 1 when findings were reported.
pub fn run_lint(args: &LintArgs) -> Result<u8> {
    let config = match &args.config {
        Some(path) => LintConfig::from_yaml_file(path)
            .with_context(|| format!("failed to load lint config {}", path.display()))?,
        None => LintConfig::default(),
    };
    tracing::debug!(manifest = %args.manifest.display(), "linting");

    let report = Linter::new(config).lint(&args.manifest);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_report(&mut out, &report, args.format)?;
    out.flush().context("failed to flush stdout")?;

    Ok(if report.is_ok() { EXIT_OK } else { EXIT_FINDINGS })
}

/// Render `report` in the requested format.
pub fn write_report(out: &mut impl Write, report: &LintReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            if report.is_ok() {
                writeln!(out, "LINT OK")?;
            } else {
                writeln!(out, "LINT FAILED:")?;
                for d in report.diagnostics() {
                    writeln!(out, " - {d}")?;
                }
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(report).context("failed to serialize report")?;
            writeln!(out, "{json}")?;
        }
    }
    Ok(())
}
