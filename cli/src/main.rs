//! ssa-earnings CLI - SSA.gov statement XML to Excel conversion
//!
//! Reads the XML file exported from "my Social Security" and writes an Excel
//! workbook with the earnings history and a salary trend chart.

use clap::{ArgAction, Parser};
use colored::*;
use ssa_earnings::render::{render_to_path, RenderOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

const MISSING_FILE_MESSAGE: &str = "Please supply a file with source data from SSA.gov XML export file";

/// Convert an SSA.gov statement export into an Excel workbook
#[derive(Parser)]
#[command(
    name = "ssa-earnings",
    version,
    about = "Convert an SSA.gov statement XML export to Excel",
    long_about = "ssa-earnings - SSA.gov statement to Excel converter.\n\n\
                  Writes an \"Earnings History\" worksheet and a salary trend chart\n\
                  to <input name>.xlsx in the current directory.",
    disable_version_flag = true
)]
struct Cli {
    /// Path to SSA.gov site XML file
    #[arg(short, long, value_name = "FILE")]
    file: Option<PathBuf>,

    /// Output workbook path (default: <input name>.xlsx)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Only report warnings and errors
    #[arg(short, long)]
    quiet: bool,

    /// Show version
    #[arg(short = 'v', long, action = ArgAction::Version)]
    version: Option<bool>,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.quiet);

    if let Err(e) = run(cli, &mut std::io::stdout()) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logging(quiet: bool) {
    let level = if quiet {
        tracing::Level::WARN
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli, out: &mut impl Write) -> Result<(), Box<dyn std::error::Error>> {
    let Some(input) = cli.file else {
        return Err(MISSING_FILE_MESSAGE.into());
    };

    let output = cli
        .output
        .unwrap_or_else(|| ssa_earnings::default_output_path(&input));

    let statement = ssa_earnings::parse_statement(&input)?;
    writeln!(out, "Writing file: {}", display_path(&output)?.display())?;

    let request = ssa_earnings::statement_request(&statement);
    let report = render_to_path(&request, &RenderOptions::default(), &output)?;

    for failure in report.failures() {
        writeln!(
            out,
            "{} Sheet '{}' is incomplete: {}",
            "!".yellow().bold(),
            failure.name,
            failure.error.as_deref().unwrap_or_default()
        )?;
    }

    if !cli.quiet {
        writeln!(
            out,
            "{} Converted to Excel: {}",
            "✓".green().bold(),
            output.display()
        )?;
    }

    Ok(())
}

/// Absolute form of `path` for display, resolved against the current directory.
fn display_path(path: &Path) -> std::io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}
