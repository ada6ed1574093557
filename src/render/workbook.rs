//! Workbook assembly: one worksheet and one chart sheet per sheet spec.

use std::collections::HashSet;
use std::path::Path;

use rust_xlsxwriter::{DocProperties, Workbook, Worksheet};

use super::chart::build_chart;
use super::formats::Formats;
use super::options::RenderOptions;
use super::worksheet::{populate, SheetContext, SheetProgress};
use crate::error::{Error, Result};
use crate::model::WorkbookRequest;

/// Outcome of rendering one sheet spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetOutcome {
    /// Worksheet name as created
    pub name: String,
    /// Data rows completely written
    pub data_rows: u32,
    /// Header, complete data rows and footer. A row left partly written by
    /// a failure is in the worksheet but not counted.
    pub total_rows: u32,
    /// Population error that was logged and skipped, if any
    pub error: Option<String>,
}

/// Summary of a workbook render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderReport {
    /// One entry per sheet spec, in order
    pub sheets: Vec<SheetOutcome>,
}

impl RenderReport {
    /// Sheets whose population stopped early.
    pub fn failures(&self) -> impl Iterator<Item = &SheetOutcome> {
        self.sheets.iter().filter(|s| s.error.is_some())
    }

    /// Check if every sheet was written in full.
    pub fn is_complete(&self) -> bool {
        self.failures().next().is_none()
    }
}

/// Render a request and save it to `path`.
///
/// # Example
///
/// ```no_run
/// use ssa_earnings::model::{SheetSpec, WorkbookRequest};
/// use ssa_earnings::render::{render_to_path, RenderOptions};
///
/// let sheet = SheetSpec::new("Sales", ["Year", "Gross Earnings", "Net Earnings"]);
/// let request = WorkbookRequest::new("ACME", vec![sheet]);
/// let report = render_to_path(&request, &RenderOptions::default(), "acme.xlsx")?;
/// assert!(report.is_complete());
/// # Ok::<(), ssa_earnings::Error>(())
/// ```
pub fn render_to_path(
    request: &WorkbookRequest,
    options: &RenderOptions,
    path: impl AsRef<Path>,
) -> Result<RenderReport> {
    let (mut workbook, report) = build_workbook(request, options)?;
    workbook.save(path.as_ref())?;
    Ok(report)
}

/// Render a request into an in-memory XLSX file.
pub fn render_to_buffer(
    request: &WorkbookRequest,
    options: &RenderOptions,
) -> Result<(Vec<u8>, RenderReport)> {
    let (mut workbook, report) = build_workbook(request, options)?;
    let buffer = workbook.save_to_buffer()?;
    Ok((buffer, report))
}

/// Build every worksheet and chart sheet, in request order.
fn build_workbook(
    request: &WorkbookRequest,
    options: &RenderOptions,
) -> Result<(Workbook, RenderReport)> {
    let names = sheet_names(request)?;

    let mut workbook = Workbook::new();
    let properties = DocProperties::new()
        .set_title(&request.title)
        .set_comment(&options.comments);
    workbook.set_properties(&properties);

    let formats = Formats::new();
    let mut report = RenderReport::default();

    for (spec, name) in request.sheets.iter().zip(names) {
        tracing::debug!(sheet = %name, rows = spec.row_count(), "rendering sheet");

        let mut worksheet = Worksheet::new();
        worksheet.set_name(&name)?;

        let ctx = SheetContext {
            spec,
            name: &name,
            formats: &formats,
            options,
            timestamp: &request.timestamp,
        };
        let mut progress = SheetProgress::default();
        let error = match populate(&mut worksheet, &ctx, &mut progress) {
            Ok(()) => None,
            Err(e) => {
                tracing::warn!(sheet = %name, error = %e, "sheet incomplete, continuing");
                Some(e.to_string())
            }
        };
        workbook.push_worksheet(worksheet);

        let chart = build_chart(
            &name,
            &request.title,
            spec.columns.len(),
            progress.data_rows,
            options.chart_style,
        );
        workbook.add_chartsheet().insert_chart(0, 0, &chart)?;

        report.sheets.push(SheetOutcome {
            name,
            data_rows: progress.data_rows,
            total_rows: progress.total_rows(),
            error,
        });
    }

    Ok((workbook, report))
}

/// Worksheet names for a request, rejecting names that collide.
///
/// Excel compares sheet names without regard to case, and chart sheets take
/// the default names `Chart1`, `Chart2`, ...
fn sheet_names(request: &WorkbookRequest) -> Result<Vec<String>> {
    let mut seen: HashSet<String> = (1..=request.sheets.len())
        .map(|n| format!("chart{}", n))
        .collect();

    let mut names = Vec::with_capacity(request.sheets.len());
    for (index, spec) in request.sheets.iter().enumerate() {
        let name = spec.worksheet_name(index);
        if !seen.insert(name.to_lowercase()) {
            return Err(Error::InvalidData(format!(
                "sheet name '{}' is used more than once",
                name
            )));
        }
        names.push(name);
    }
    Ok(names)
}
