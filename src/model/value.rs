//! Cell values carried by sheet rows.

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single value in a row mapping.
///
/// Deserializes untagged, so JSON `null`, booleans, numbers, RFC 3339
/// timestamps, naive ISO timestamps and plain strings map to the obvious
/// variant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// No value.
    #[default]
    Blank,
    /// Boolean value.
    Bool(bool),
    /// Whole number.
    Integer(i64),
    /// Floating point number.
    Number(f64),
    /// Timestamp carrying a UTC offset.
    DateTime(DateTime<FixedOffset>),
    /// Timestamp without zone information.
    NaiveDateTime(NaiveDateTime),
    /// Text, exactly as supplied.
    Text(String),
}

impl CellValue {
    /// Create a text value.
    pub fn text(s: impl Into<String>) -> Self {
        CellValue::Text(s.into())
    }

    /// Check if this value is blank.
    pub fn is_blank(&self) -> bool {
        matches!(self, CellValue::Blank)
    }

    /// Coerce the value to a whole number.
    ///
    /// Floats are truncated toward zero and text must parse as an integer
    /// once surrounding whitespace is removed.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            CellValue::Integer(n) => Some(*n),
            CellValue::Number(n) if n.is_finite() => Some(n.trunc() as i64),
            CellValue::Bool(b) => Some(i64::from(*b)),
            CellValue::Text(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Blank => Ok(()),
            CellValue::Bool(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            CellValue::Integer(n) => write!(f, "{}", n),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S%:z")),
            CellValue::NaiveDateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Integer(n)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(dt: NaiveDateTime) -> Self {
        CellValue::NaiveDateTime(dt)
    }
}

impl From<DateTime<FixedOffset>> for CellValue {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        CellValue::DateTime(dt)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}
