//! XLSX (Excel) text extraction.
//!
//! Each sheet with content becomes a block headed by `# <sheet name>`,
//! one line per row, cells joined with `" | "`.
//!
//! # Example
//!
//! ```no_run
//! use officetext::{xlsx::extract_xlsx, ParserOptions};
//!
//! let data = std::fs::read("data.xlsx")?;
//! let result = extract_xlsx(&data, &ParserOptions::default())?;
//! println!("{}", result.text);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod decoder;
mod shared_strings;

pub use decoder::decode_workbook;

use crate::detect::SupportedFileType;
use crate::error::{Error, Result};
use crate::model::{ParseResult, Workbook};
use crate::options::ParserOptions;
use crate::validate::validate_bytes;
use tracing::debug;

/// Extract the text of an XLSX workbook.
///
/// Decoding is permissive: input that is not a spreadsheet may still decode
/// to an empty or unexpected workbook rather than fail.
pub fn extract_xlsx(data: &[u8], options: &ParserOptions) -> Result<ParseResult> {
    debug!(bytes = data.len(), "extracting XLSX");

    let workbook = validate_bytes(data)
        .and_then(decode_workbook)
        .map_err(|e| Error::parse(SupportedFileType::Xlsx, e))?;

    let raw = workbook_text(&workbook);
    Ok(crate::finish_result(&raw, data.len(), options))
}

/// Flatten a workbook into text, one block per non-empty sheet.
///
/// Sheets without rows are omitted entirely; blocks are separated by a
/// blank line.
pub fn workbook_text(workbook: &Workbook) -> String {
    workbook
        .sheets
        .iter()
        .filter_map(|sheet| {
            let rows = sheet.text_rows();
            if rows.is_empty() {
                None
            } else {
                Some(format!("# {}\n{}", sheet.name, rows.join("\n")))
            }
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
