//! Error types for the ssa-earnings library.

use std::io;
use thiserror::Error;

/// Result type alias for ssa-earnings operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while extracting a statement or rendering a workbook.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error parsing XML content.
    #[error("XML parse error: {0}")]
    XmlParse(String),

    /// A required statement element is missing.
    #[error("Missing component: {0}")]
    MissingComponent(String),

    /// Invalid or malformed data in a statement or sheet spec.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Error reported by the workbook writer.
    #[error("Workbook error: {0}")]
    Workbook(String),

    /// Error reading a JSON workbook request.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlParse(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::XmlParse(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for Error {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        Error::Workbook(err.to_string())
    }
}
