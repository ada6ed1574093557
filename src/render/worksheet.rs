//! Worksheet population: page setup, header, typed body cells, footer.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use rust_xlsxwriter::{ColNum, Format, RowNum, Worksheet};
use unicode_width::UnicodeWidthStr;

use super::formats::{column_formats, Formats};
use super::options::{LocalZone, RenderOptions};
use crate::error::{Error, Result};
use crate::model::{CellValue, Column, ColumnKind, SheetSpec};

/// Page margins in inches: left, right, top, bottom, header, footer.
const MARGINS: (f64, f64, f64, f64, f64, f64) = (0.5, 0.5, 0.5, 0.75, 0.3, 0.3);

/// Everything one sheet render needs; built fresh for every sheet.
pub(crate) struct SheetContext<'a> {
    pub spec: &'a SheetSpec,
    pub name: &'a str,
    pub formats: &'a Formats,
    pub options: &'a RenderOptions,
    pub timestamp: &'a DateTime<FixedOffset>,
}

/// How far population got. Survives a failed [`populate`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct SheetProgress {
    pub header_written: bool,
    pub data_rows: u32,
    pub footer_written: bool,
}

impl SheetProgress {
    /// Rows present in the sheet: header, complete data rows and footer.
    pub fn total_rows(&self) -> u32 {
        u32::from(self.header_written) + self.data_rows + u32::from(self.footer_written)
    }
}

/// Write one sheet spec into `ws`, recording progress as rows complete.
pub(crate) fn populate(
    ws: &mut Worksheet,
    ctx: &SheetContext<'_>,
    progress: &mut SheetProgress,
) -> Result<()> {
    let spec = ctx.spec;
    let options = ctx.options;
    let last_col = last_column(spec)?;

    setup_page(ws, options, last_col)?;

    for (col, label) in spec.header_labels().iter().enumerate() {
        ws.write_string_with_format(0, col as ColNum, label, &ctx.formats.header)?;
    }
    progress.header_written = true;

    let overrides = column_formats(&spec.column_formats);
    let mut widths = vec![options.default_column_width; spec.columns.len()];

    for (index, row) in spec.data.iter().enumerate() {
        let row_num = sheet_row(index + 1)?;
        for (col, column) in spec.columns.iter().enumerate() {
            let col = col as ColNum;
            let value = row.get(&column.key).unwrap_or(&CellValue::Blank);

            match column.kind {
                ColumnKind::Date => write_date(ws, row_num, col, column, value, ctx)?,
                ColumnKind::Number => write_integer(ws, row_num, col, column, value, ctx)?,
                ColumnKind::Text => {
                    let format = overrides.get(&column.key).unwrap_or(&ctx.formats.body);
                    write_general(ws, row_num, col, value, format, ctx)?;

                    if let CellValue::Text(text) = value {
                        widen_column(ws, col, text, options, &mut widths)?;
                    }
                }
            }
        }
        progress.data_rows += 1;
    }

    let footer_row = sheet_row(spec.data.len() + 1)?;
    let footer = format!("Prepared {}", options.local_zone.stamp(ctx.timestamp));
    if last_col == 0 {
        ws.write_string_with_format(footer_row, 0, &footer, &ctx.formats.footer)?;
    } else {
        ws.merge_range(footer_row, 0, footer_row, last_col, &footer, &ctx.formats.footer)?;
    }
    progress.footer_written = true;

    tracing::info!(sheet = ctx.name, rows = progress.total_rows(), "rows output");
    Ok(())
}

/// Gridlines, margins, footer, fit-to-width, repeated header, column widths.
fn setup_page(ws: &mut Worksheet, options: &RenderOptions, last_col: ColNum) -> Result<()> {
    let (left, right, top, bottom, header, footer) = MARGINS;

    ws.set_screen_gridlines(false);
    ws.set_print_gridlines(false);
    ws.set_margins(left, right, top, bottom, header, footer);
    ws.set_footer(&format!("&C{}", options.page_footer.replace('&', "&&")));
    ws.set_print_fit_to_pages(1, 0);
    ws.set_repeat_rows(0, 0)?;

    for col in 0..=last_col {
        ws.set_column_width(col, options.default_column_width)?;
    }
    Ok(())
}

fn last_column(spec: &SheetSpec) -> Result<ColNum> {
    let count = spec.columns.len().max(1);
    ColNum::try_from(count - 1)
        .map_err(|_| Error::InvalidData(format!("too many columns: {}", spec.columns.len())))
}

fn sheet_row(index: usize) -> Result<RowNum> {
    RowNum::try_from(index).map_err(|_| Error::InvalidData(format!("too many rows: {}", index)))
}

/// Widen a column to fit `text`, never shrinking it.
fn widen_column(
    ws: &mut Worksheet,
    col: ColNum,
    text: &str,
    options: &RenderOptions,
    widths: &mut [f64],
) -> Result<()> {
    let current = &mut widths[col as usize];
    if let Some(wanted) = widened_width(text, options, *current) {
        ws.set_column_width(col, wanted)?;
        *current = wanted;
    }
    Ok(())
}

/// New width for a column holding `text`, if it has to grow.
fn widened_width(text: &str, options: &RenderOptions, current: f64) -> Option<f64> {
    let width = UnicodeWidthStr::width(text) as f64;
    if width <= options.default_column_width {
        return None;
    }
    let wanted = width + options.width_padding;
    (wanted > current).then_some(wanted)
}

fn write_date(
    ws: &mut Worksheet,
    row: RowNum,
    col: ColNum,
    column: &Column,
    value: &CellValue,
    ctx: &SheetContext<'_>,
) -> Result<()> {
    let zone = &ctx.options.local_zone;
    let format = &ctx.formats.date_time;

    let datetime = match value {
        CellValue::Blank => {
            ws.write_blank(row, col, format)?;
            return Ok(());
        }
        CellValue::DateTime(dt) => zone.localize(dt),
        CellValue::NaiveDateTime(dt) => *dt,
        CellValue::Text(text) => parse_datetime(text, zone).ok_or_else(|| {
            Error::InvalidData(format!(
                "column '{}' value '{}' is not a date",
                column.key, text
            ))
        })?,
        other => {
            return Err(Error::InvalidData(format!(
                "column '{}' value '{}' is not a date",
                column.key, other
            )))
        }
    };

    ws.write_datetime_with_format(row, col, &datetime, format)?;
    Ok(())
}

fn write_integer(
    ws: &mut Worksheet,
    row: RowNum,
    col: ColNum,
    column: &Column,
    value: &CellValue,
    ctx: &SheetContext<'_>,
) -> Result<()> {
    let number = value.as_integer().ok_or_else(|| {
        Error::InvalidData(format!(
            "column '{}' value '{}' is not an integer",
            column.key, value
        ))
    })?;

    ws.write_number_with_format(row, col, number as f64, &ctx.formats.number)?;
    Ok(())
}

/// Write a text-kind cell according to the value's own type.
fn write_general(
    ws: &mut Worksheet,
    row: RowNum,
    col: ColNum,
    value: &CellValue,
    format: &Format,
    ctx: &SheetContext<'_>,
) -> Result<()> {
    match value {
        CellValue::Blank => {
            ws.write_blank(row, col, format)?;
        }
        CellValue::Bool(b) => {
            ws.write_boolean_with_format(row, col, *b, format)?;
        }
        CellValue::Integer(n) => {
            ws.write_number_with_format(row, col, *n as f64, format)?;
        }
        CellValue::Number(n) => {
            ws.write_number_with_format(row, col, *n, format)?;
        }
        CellValue::DateTime(dt) => {
            let local = ctx.options.local_zone.localize(dt);
            ws.write_datetime_with_format(row, col, &local, &ctx.formats.date_time)?;
        }
        CellValue::NaiveDateTime(dt) => {
            ws.write_datetime_with_format(row, col, dt, &ctx.formats.date_time)?;
        }
        CellValue::Text(text) => {
            ws.write_string_with_format(row, col, text, format)?;
        }
    }
    Ok(())
}

/// Parse a date/time string: RFC 3339, ISO without zone, or a bare date.
pub(crate) fn parse_datetime(text: &str, zone: &LocalZone) -> Option<NaiveDateTime> {
    let text = text.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(zone.localize(&dt));
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, pattern) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
