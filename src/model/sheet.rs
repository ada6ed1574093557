//! Declarative sheet and workbook descriptions consumed by the renderer.

use super::CellValue;
use crate::error::Result;
use chrono::{DateTime, FixedOffset, Local};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Longest sheet name the renderer will create.
pub const MAX_SHEET_NAME_LEN: usize = 30;

/// One row of a sheet: column key to value.
pub type Row = HashMap<String, CellValue>;

/// How the cells of a column are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    /// General bordered cell, written by value type.
    #[default]
    Text,
    /// Integer with thousands separators.
    Number,
    /// Date/time value.
    Date,
}

impl ColumnKind {
    /// Infer the kind from a column key's naming convention.
    ///
    /// Keys containing "date" are dates, keys containing "earnings" are
    /// numbers, everything else is text. Matching ignores case.
    pub fn infer(key: &str) -> Self {
        let key = key.to_lowercase();
        if key.contains("date") {
            ColumnKind::Date
        } else if key.contains("earnings") {
            ColumnKind::Number
        } else {
            ColumnKind::Text
        }
    }
}

/// A column of a sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Key used to look the value up in each row
    pub key: String,
    /// Resolved cell kind
    pub kind: ColumnKind,
}

impl Column {
    /// Create a column whose kind is inferred from its key.
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        let kind = ColumnKind::infer(&key);
        Self { key, kind }
    }

    /// Create a column with an explicit kind.
    pub fn with_kind(key: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            key: key.into(),
            kind,
        }
    }
}

/// Horizontal alignment for a styled cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellAlign {
    Left,
    Center,
    Right,
}

/// Per-column cell formatting override.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CellStyle {
    pub bold: bool,
    pub italic: bool,
    /// Thin border on all sides
    pub border: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    /// RGB color, e.g. 0xFF0000
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_color: Option<u32>,
    /// RGB color, e.g. 0xFFFF00
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align: Option<CellAlign>,
}

impl CellStyle {
    /// Create an empty style.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set bold text.
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Set italic text.
    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    /// Add a thin border.
    pub fn bordered(mut self) -> Self {
        self.border = true;
        self
    }

    /// Set the font size in points.
    pub fn font_size(mut self, size: f64) -> Self {
        self.font_size = Some(size);
        self
    }

    /// Set the font color.
    pub fn font_color(mut self, rgb: u32) -> Self {
        self.font_color = Some(rgb);
        self
    }

    /// Set the background fill color.
    pub fn background_color(mut self, rgb: u32) -> Self {
        self.background_color = Some(rgb);
        self
    }

    /// Set the number format string.
    pub fn num_format(mut self, format: impl Into<String>) -> Self {
        self.num_format = Some(format.into());
        self
    }

    /// Set horizontal alignment.
    pub fn align(mut self, align: CellAlign) -> Self {
        self.align = Some(align);
        self
    }
}

/// Description of one worksheet: name, columns, rows, and presentation hints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "SheetSpecDef", into = "SheetSpecDef")]
pub struct SheetSpec {
    /// Requested sheet name (truncated when rendered)
    pub sheet_name: String,
    /// Columns in output order
    pub columns: Vec<Column>,
    /// Rows in output order
    pub data: Vec<Row>,
    /// Format overrides for text columns, by key
    pub column_formats: HashMap<String, CellStyle>,
    /// Header label overrides, by key
    pub column_label_overrides: HashMap<String, String>,
}

impl SheetSpec {
    /// Create a sheet spec with inferred column kinds and no rows.
    pub fn new<I, S>(sheet_name: impl Into<String>, column_order: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            sheet_name: sheet_name.into(),
            columns: column_order.into_iter().map(Column::new).collect(),
            data: Vec::new(),
            column_formats: HashMap::new(),
            column_label_overrides: HashMap::new(),
        }
    }

    /// Replace the rows.
    pub fn with_rows(mut self, rows: Vec<Row>) -> Self {
        self.data = rows;
        self
    }

    /// Append a row.
    pub fn add_row(&mut self, row: Row) {
        self.data.push(row);
    }

    /// Override the header label for a column.
    pub fn with_label_override(mut self, key: impl Into<String>, label: impl Into<String>) -> Self {
        self.column_label_overrides.insert(key.into(), label.into());
        self
    }

    /// Override the cell format for a text column.
    pub fn with_column_format(mut self, key: impl Into<String>, style: CellStyle) -> Self {
        self.column_formats.insert(key.into(), style);
        self
    }

    /// Force the kind of an existing column.
    pub fn with_column_kind(mut self, key: &str, kind: ColumnKind) -> Self {
        if let Some(column) = self.columns.iter_mut().find(|c| c.key == key) {
            column.kind = kind;
        }
        self
    }

    /// Column keys in output order.
    pub fn column_order(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.key.as_str())
    }

    /// Number of data rows.
    pub fn row_count(&self) -> usize {
        self.data.len()
    }

    /// Header labels in column order.
    ///
    /// With overrides present each key maps through them (unmapped keys stay
    /// verbatim); otherwise labels are title-cased with underscores as spaces.
    pub fn header_labels(&self) -> Vec<String> {
        if self.column_label_overrides.is_empty() {
            self.column_order().map(default_label).collect()
        } else {
            self.column_order()
                .map(|key| {
                    self.column_label_overrides
                        .get(key)
                        .cloned()
                        .unwrap_or_else(|| key.to_string())
                })
                .collect()
        }
    }

    /// Name the worksheet is created with.
    ///
    /// `index` is the zero-based position in the workbook, used when the
    /// requested name is empty.
    pub fn worksheet_name(&self, index: usize) -> String {
        let name: String = self.sheet_name.chars().take(MAX_SHEET_NAME_LEN).collect();
        if name.is_empty() {
            format!("Sheet{}", index + 1)
        } else {
            name
        }
    }
}

/// Title-case a column key, treating underscores as spaces.
pub fn default_label(key: &str) -> String {
    let mut label = String::with_capacity(key.len());
    let mut prev_alpha = false;
    for ch in key.replace('_', " ").chars() {
        if ch.is_alphabetic() {
            if prev_alpha {
                label.extend(ch.to_lowercase());
            } else {
                label.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            label.push(ch);
            prev_alpha = false;
        }
    }
    label
}

/// Serialized form of a sheet spec, with a flat column order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct SheetSpecDef {
    sheet_name: String,
    column_order: Vec<String>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    column_kinds: HashMap<String, ColumnKind>,
    data: Vec<Row>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    column_formats: HashMap<String, CellStyle>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    column_label_overrides: HashMap<String, String>,
}

impl From<SheetSpecDef> for SheetSpec {
    fn from(def: SheetSpecDef) -> Self {
        let columns = def
            .column_order
            .into_iter()
            .map(|key| match def.column_kinds.get(&key) {
                Some(kind) => Column::with_kind(key, *kind),
                None => Column::new(key),
            })
            .collect();

        Self {
            sheet_name: def.sheet_name,
            columns,
            data: def.data,
            column_formats: def.column_formats,
            column_label_overrides: def.column_label_overrides,
        }
    }
}

impl From<SheetSpec> for SheetSpecDef {
    fn from(spec: SheetSpec) -> Self {
        let column_kinds = spec
            .columns
            .iter()
            .filter(|c| c.kind != ColumnKind::infer(&c.key))
            .map(|c| (c.key.clone(), c.kind))
            .collect();

        Self {
            sheet_name: spec.sheet_name,
            column_order: spec.columns.into_iter().map(|c| c.key).collect(),
            column_kinds,
            data: spec.data,
            column_formats: spec.column_formats,
            column_label_overrides: spec.column_label_overrides,
        }
    }
}

/// Everything needed for one workbook render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkbookRequest {
    /// Workbook title; also prefixes each chart title
    pub title: String,
    /// Sheets in output order
    pub sheets: Vec<SheetSpec>,
    /// Generation time shown in each sheet footer
    #[serde(default = "now")]
    pub timestamp: DateTime<FixedOffset>,
}

fn now() -> DateTime<FixedOffset> {
    Local::now().fixed_offset()
}

impl WorkbookRequest {
    /// Create a request stamped with the current local time.
    pub fn new(title: impl Into<String>, sheets: Vec<SheetSpec>) -> Self {
        Self {
            title: title.into(),
            sheets,
            timestamp: now(),
        }
    }

    /// Override the generation timestamp.
    pub fn with_timestamp(mut self, timestamp: DateTime<FixedOffset>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Parse a request from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
