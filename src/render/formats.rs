//! Cell formats used by the worksheet renderer.

use std::collections::HashMap;

use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder};

use crate::model::{CellAlign, CellStyle};

/// Number format of the "Prepared" footer cell.
const FOOTER_NUM_FORMAT: &str = "dd-mmm-yyyy hh:mm";

/// Number format of date/time cells.
const DATE_TIME_NUM_FORMAT: &str = "yyyy-mm-dd hh:mm AM/PM";

/// Number format of integer (earnings) cells.
const NUMBER_NUM_FORMAT: &str = "#,###";

/// Font size of body cells.
const BODY_FONT_SIZE: f64 = 12.0;

/// The fixed set of formats shared by every sheet of a workbook.
#[derive(Debug, Clone)]
pub(crate) struct Formats {
    pub header: Format,
    pub footer: Format,
    pub date_time: Format,
    pub body: Format,
    pub number: Format,
}

impl Formats {
    /// Build the standard formats.
    pub fn new() -> Self {
        Self {
            header: Format::new()
                .set_bold()
                .set_font_color(Color::White)
                .set_background_color(Color::Black)
                .set_border(FormatBorder::Thin),
            footer: Format::new()
                .set_align(FormatAlign::Right)
                .set_num_format(FOOTER_NUM_FORMAT)
                .set_italic(),
            date_time: Format::new()
                .set_num_format(DATE_TIME_NUM_FORMAT)
                .set_border(FormatBorder::Thin)
                .set_font_size(BODY_FONT_SIZE),
            body: Format::new()
                .set_font_size(BODY_FONT_SIZE)
                .set_border(FormatBorder::Thin)
                .set_num_format("@"),
            number: Format::new()
                .set_num_format(NUMBER_NUM_FORMAT)
                .set_font_size(BODY_FONT_SIZE)
                .set_border(FormatBorder::Thin)
                .set_align(FormatAlign::Right),
        }
    }
}

/// Convert a column style override to a writer format.
pub(crate) fn style_to_format(style: &CellStyle) -> Format {
    let mut format = Format::new();

    if style.bold {
        format = format.set_bold();
    }
    if style.italic {
        format = format.set_italic();
    }
    if style.border {
        format = format.set_border(FormatBorder::Thin);
    }
    if let Some(size) = style.font_size {
        format = format.set_font_size(size);
    }
    if let Some(rgb) = style.font_color {
        format = format.set_font_color(Color::RGB(rgb));
    }
    if let Some(rgb) = style.background_color {
        format = format.set_background_color(Color::RGB(rgb));
    }
    if let Some(ref num_format) = style.num_format {
        format = format.set_num_format(num_format);
    }
    if let Some(align) = style.align {
        format = format.set_align(match align {
            CellAlign::Left => FormatAlign::Left,
            CellAlign::Center => FormatAlign::Center,
            CellAlign::Right => FormatAlign::Right,
        });
    }

    format
}

/// Convert every column override of a sheet up front.
pub(crate) fn column_formats(styles: &HashMap<String, CellStyle>) -> HashMap<String, Format> {
    styles
        .iter()
        .map(|(key, style)| (key.clone(), style_to_format(style)))
        .collect()
}
