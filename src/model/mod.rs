//! Data model shared by the statement extractor and the workbook renderer.
//!
//! The extractor produces a [`Statement`], which turns into a [`SheetSpec`];
//! the renderer consumes [`WorkbookRequest`]s made of sheet specs and rows of
//! [`CellValue`]s.

mod sheet;
mod statement;
mod value;

pub use sheet::*;
pub use statement::*;
pub use value::*;
