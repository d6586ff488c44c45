//! # officetext
//!
//! Plain text and metadata extraction from DOCX and XLSX documents.
//!
//! The format is chosen from the file extension, the matching extractor
//! decodes the document, and the text is whitespace-normalized before it is
//! returned as a [`ParseResult`].
//!
//! ## Quick Start
//!
//! ```no_run
//! use officetext::{extract_file, ParserOptions};
//!
//! let result = extract_file("report.docx", &ParserOptions::default())?;
//! println!("{}", result.text);
//!
//! // With a metadata record, serialized as JSON
//! let options = ParserOptions::new().with_metadata(true);
//! let result = extract_file("data.xlsx", &options)?;
//! println!("{}", result.to_json_pretty()?);
//! # Ok::<(), officetext::Error>(())
//! ```
//!
//! ## Format-Specific APIs
//!
//! ```no_run
//! use officetext::{docx::extract_docx, xlsx::extract_xlsx, ParserOptions};
//!
//! let options = ParserOptions::default();
//! let doc = extract_docx(&std::fs::read("report.docx")?, &options)?;
//! let sheet = extract_xlsx(&std::fs::read("data.xlsx")?, &options)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Features
//!
//! - `docx` (default): Word document support
//! - `xlsx` (default): Excel spreadsheet support

pub mod container;
pub mod detect;
pub mod error;
pub mod metadata;
pub mod model;
pub mod normalize;
pub mod options;
pub mod validate;

#[cfg(feature = "docx")]
pub mod docx;

#[cfg(feature = "xlsx")]
pub mod xlsx;

// Re-exports
pub use detect::{resolve_file_type, SupportedFileType};
pub use error::{Error, Result};
pub use metadata::{create_parse_metadata, DEFAULT_PARSER_VERSION};
pub use model::{CellValue, ParseMetadata, ParseResult, Sheet, Workbook};
pub use normalize::{apply_parser_options, normalize_whitespace};
pub use options::ParserOptions;
pub use validate::{validate_buffer, validate_bytes};

use std::path::Path;
use tracing::debug;

/// Extract text from a file on disk.
///
/// The format is resolved from the extension before the file is touched, so
/// an unsupported name fails without any I/O.
///
/// # Example
///
/// ```no_run
/// use officetext::{extract_file, ParserOptions};
///
/// let result = extract_file("document.docx", &ParserOptions::default())?;
/// println!("{}", result.text);
/// # Ok::<(), officetext::Error>(())
/// ```
pub fn extract_file(path: impl AsRef<Path>, options: &ParserOptions) -> Result<ParseResult> {
    let path = path.as_ref();
    let name = path.to_string_lossy();
    let file_type = require_file_type(&name)?;

    let data = std::fs::read(path).map_err(|source| Error::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = data.len(), "read input file");

    extract_typed(file_type, &data, options)
}

/// Extract text from bytes, choosing the format from `file_name`.
///
/// # Example
///
/// ```no_run
/// use officetext::{extract_bytes, ParserOptions};
///
/// let data = std::fs::read("data.xlsx")?;
/// let result = extract_bytes("data.xlsx", &data, &ParserOptions::default())?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn extract_bytes(file_name: &str, data: &[u8], options: &ParserOptions) -> Result<ParseResult> {
    let file_type = require_file_type(file_name)?;
    extract_typed(file_type, data, options)
}

/// Resolve the format of `file_name`, failing with
/// [`Error::UnsupportedFileType`] naming the file as given.
pub fn require_file_type(file_name: &str) -> Result<SupportedFileType> {
    resolve_file_type(file_name).ok_or_else(|| Error::UnsupportedFileType {
        file: file_name.to_string(),
        supported: SupportedFileType::ALL,
    })
}

fn extract_typed(
    file_type: SupportedFileType,
    data: &[u8],
    options: &ParserOptions,
) -> Result<ParseResult> {
    match file_type {
        #[cfg(feature = "docx")]
        SupportedFileType::Docx => docx::extract_docx(data, options),
        #[cfg(feature = "xlsx")]
        SupportedFileType::Xlsx => xlsx::extract_xlsx(data, options),
        #[cfg(not(all(feature = "docx", feature = "xlsx")))]
        _ => Err(Error::UnsupportedFileType {
            file: file_type.extension().to_string(),
            supported: SupportedFileType::ALL,
        }),
    }
}

/// Apply options to decoded text and attach metadata when requested.
#[cfg(any(feature = "docx", feature = "xlsx"))]
pub(crate) fn finish_result(raw: &str, size: usize, options: &ParserOptions) -> ParseResult {
    let result = ParseResult::new(apply_parser_options(raw, options));
    if !options.include_metadata {
        return result;
    }

    let metadata = create_parse_metadata(options.file_name.as_deref(), Some(size as u64), None);
    result.with_metadata(metadata)
}
