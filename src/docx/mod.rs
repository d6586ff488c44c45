//! DOCX (Word) text extraction.
//!
//! # Example
//!
//! ```no_run
//! use officetext::{docx::extract_docx, ParserOptions};
//!
//! let data = std::fs::read("report.docx")?;
//! let result = extract_docx(&data, &ParserOptions::default())?;
//! println!("{}", result.text);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod decoder;

pub use decoder::extract_raw_text;

use crate::detect::SupportedFileType;
use crate::error::{Error, Result};
use crate::model::ParseResult;
use crate::options::ParserOptions;
use crate::validate::validate_bytes;
use tracing::debug;

/// Extract the text of a DOCX document.
///
/// Any failure, including an empty buffer, is reported as
/// [`Error::Parse`] carrying the underlying message.
pub fn extract_docx(data: &[u8], options: &ParserOptions) -> Result<ParseResult> {
    debug!(bytes = data.len(), "extracting DOCX");

    let raw = validate_bytes(data)
        .and_then(extract_raw_text)
        .map_err(|e| Error::parse(SupportedFileType::Docx, e))?;

    Ok(crate::finish_result(&raw, data.len(), options))
}
