//! Workbook rendering.
//!
//! Turns a [`WorkbookRequest`](crate::model::WorkbookRequest) into an XLSX
//! file. Each sheet spec becomes a formatted worksheet followed by a chart
//! sheet with a smoothed scatter chart of its first two value columns.
//!
//! Rendering is best effort per sheet: if writing a sheet's body fails, the
//! error is logged and recorded in the [`RenderReport`], and the chart sheet
//! and the remaining sheets are still produced.
//!
//! # Example
//!
//! ```no_run
//! use ssa_earnings::model::{CellValue, Row, SheetSpec, WorkbookRequest};
//! use ssa_earnings::render::{render_to_buffer, RenderOptions};
//!
//! let mut row = Row::new();
//! row.insert("Year".into(), CellValue::text("2023"));
//! row.insert("Fica Earnings".into(), CellValue::Integer(61000));
//!
//! let sheet = SheetSpec::new("History", ["Year", "Fica Earnings"]).with_rows(vec![row]);
//! let request = WorkbookRequest::new("Jane Doe", vec![sheet]);
//!
//! let (bytes, _report) = render_to_buffer(&request, &RenderOptions::default())?;
//! std::fs::write("history.xlsx", bytes)?;
//! # Ok::<(), ssa_earnings::Error>(())
//! ```

mod chart;
mod formats;
mod options;
mod workbook;
mod worksheet;

pub use options::{LocalZone, RenderOptions, DEFAULT_PAGE_FOOTER};
pub use workbook::{render_to_buffer, render_to_path, RenderReport, SheetOutcome};
