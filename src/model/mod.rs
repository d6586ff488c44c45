//! Data model shared by the extractors.
//!
//! `ParseResult` and `ParseMetadata` are what extractors hand back to callers;
//! `Workbook` is the decoded form of a spreadsheet before it is flattened
//! into text.

mod result;
mod workbook;

pub use result::*;
pub use workbook::*;
