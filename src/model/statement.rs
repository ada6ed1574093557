//! Statement model: the user name and the yearly earnings records.

use super::{CellValue, Row, SheetSpec};
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

/// Sheet name used for the earnings worksheet.
pub const EARNINGS_SHEET_NAME: &str = "Earnings History";

/// Column keys of the earnings worksheet.
pub const YEAR_COLUMN: &str = "Year";
pub const FICA_COLUMN: &str = "Fica Earnings";
pub const MEDICARE_COLUMN: &str = "Medicare Earnings";

/// One year of earnings, with values kept as they appear in the export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarningsRecord {
    /// Value of the `endYear` attribute
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    /// Text of the `FicaEarnings` element
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fica_earnings: Option<String>,
    /// Text of the `MedicareEarnings` element
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medicare_earnings: Option<String>,
}

impl EarningsRecord {
    /// Year as a number, if it parses.
    pub fn year_number(&self) -> Option<i32> {
        self.year.as_deref().and_then(|y| y.trim().parse().ok())
    }

    /// Social Security (FICA) earnings as a number, if present and numeric.
    pub fn fica_amount(&self) -> Option<f64> {
        self.fica_earnings.as_deref().and_then(|v| v.trim().parse().ok())
    }

    /// Medicare earnings as a number, if present and numeric.
    pub fn medicare_amount(&self) -> Option<f64> {
        self.medicare_earnings
            .as_deref()
            .and_then(|v| v.trim().parse().ok())
    }

    /// Row mapping for the earnings sheet. Absent values are left out.
    pub fn to_row(&self) -> Row {
        let mut row = Row::new();
        let fields = [
            (YEAR_COLUMN, &self.year),
            (FICA_COLUMN, &self.fica_earnings),
            (MEDICARE_COLUMN, &self.medicare_earnings),
        ];
        for (key, value) in fields {
            if let Some(value) = value {
                row.insert(key.to_string(), CellValue::text(value.as_str()));
            }
        }
        row
    }
}

/// A parsed SSA statement export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    /// Name with `.`, `,` and `-` removed; used as workbook title
    pub user_name: String,
    /// Name exactly as found in the document
    pub raw_name: String,
    /// Earnings records in document order
    pub earnings: Vec<EarningsRecord>,
}

impl Statement {
    /// Create a statement from a raw user name, sanitizing it.
    pub fn new(raw_name: impl Into<String>, earnings: Vec<EarningsRecord>) -> Self {
        let raw_name = raw_name.into();
        Self {
            user_name: sanitize_name(&raw_name),
            raw_name,
            earnings,
        }
    }

    /// Build the "Earnings History" sheet spec, one row per record.
    pub fn to_sheet_spec(&self) -> SheetSpec {
        SheetSpec::new(
            EARNINGS_SHEET_NAME,
            [YEAR_COLUMN, FICA_COLUMN, MEDICARE_COLUMN],
        )
        .with_rows(self.earnings.iter().map(EarningsRecord::to_row).collect())
    }
}

/// Normalize a user name and strip the punctuation `.`, `,` and `-`.
pub fn sanitize_name(name: &str) -> String {
    name.trim()
        .nfc()
        .filter(|c| !matches!(c, '.' | ',' | '-'))
        .collect()
}
