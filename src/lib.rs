//! # ssa-earnings
//!
//! Convert the XML statement exported from SSA.gov ("my Social Security")
//! into a formatted Excel workbook.
//!
//! The workbook holds an "Earnings History" worksheet (Year, Fica Earnings,
//! Medicare Earnings) and a chart sheet trending both earnings series by
//! year.
//!
//! ## Quick Start
//!
//! ```no_run
//! use ssa_earnings::{convert_file, default_output_path, render::RenderOptions};
//!
//! let input = "Statement.xml";
//! let output = default_output_path(input);
//! let report = convert_file(input, &output, &RenderOptions::default())?;
//! println!("wrote {} sheet(s) to {}", report.sheets.len(), output.display());
//! # Ok::<(), ssa_earnings::Error>(())
//! ```
//!
//! ## Building Blocks
//!
//! ```no_run
//! use ssa_earnings::statement::StatementParser;
//! use ssa_earnings::render::{render_to_path, RenderOptions};
//!
//! // Extract the statement
//! let statement = StatementParser::open("Statement.xml")?.parse()?;
//!
//! // Render any set of sheet specs, not just earnings
//! let request = ssa_earnings::statement_request(&statement);
//! render_to_path(&request, &RenderOptions::default(), "earnings.xlsx")?;
//! # Ok::<(), ssa_earnings::Error>(())
//! ```

pub mod error;
pub mod model;
pub mod render;
pub mod statement;

// Re-exports
pub use error::{Error, Result};
pub use model::{
    CellAlign, CellStyle, CellValue, Column, ColumnKind, EarningsRecord, Row, SheetSpec,
    Statement, WorkbookRequest,
};
pub use render::{LocalZone, RenderOptions, RenderReport};

use std::path::{Path, PathBuf};

/// Parse an SSA statement XML file.
///
/// # Example
///
/// ```no_run
/// let statement = ssa_earnings::parse_statement("Statement.xml")?;
/// println!("{}: {} years", statement.user_name, statement.earnings.len());
/// # Ok::<(), ssa_earnings::Error>(())
/// ```
pub fn parse_statement(path: impl AsRef<Path>) -> Result<Statement> {
    statement::StatementParser::open(path)?.parse()
}

/// Workbook request for a statement: titled after the user, one earnings sheet.
pub fn statement_request(statement: &Statement) -> WorkbookRequest {
    WorkbookRequest::new(statement.user_name.clone(), vec![statement.to_sheet_spec()])
}

/// Output path for an input file: its base name with an `.xlsx` extension,
/// relative to the current directory.
pub fn default_output_path(input: impl AsRef<Path>) -> PathBuf {
    let stem = input
        .as_ref()
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "statement".to_string());
    PathBuf::from(format!("{}.xlsx", stem))
}

/// Parse `input` and write its earnings workbook to `output`.
pub fn convert_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    options: &RenderOptions,
) -> Result<RenderReport> {
    let statement = parse_statement(input)?;
    let request = statement_request(&statement);
    render::render_to_path(&request, options, output)
}
