//! Error types for the officetext library.

use crate::detect::SupportedFileType;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for officetext operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during text extraction.
#[derive(Error, Debug)]
pub enum Error {
    /// The file extension is not one of the supported formats.
    #[error(
        "Unsupported file type for {file}. Supported types: {}",
        extension_list(.supported)
    )]
    UnsupportedFileType {
        /// The file that was rejected
        file: String,
        /// Formats that would have been accepted
        supported: &'static [SupportedFileType],
    },

    /// The source file could not be read.
    #[error("Failed to read file {}: {source}", .path.display())]
    FileRead {
        /// Path that was being read
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: io::Error,
    },

    /// An extractor failed to decode its input.
    #[error("Failed to parse {file_type}: {message}")]
    Parse {
        /// Format the extractor was handling
        file_type: SupportedFileType,
        /// Message of the underlying failure
        message: String,
    },

    /// The input is not a byte buffer.
    #[error("Input must be a byte buffer")]
    InvalidInput,

    /// The input buffer has no content.
    #[error("Buffer cannot be empty")]
    EmptyInput,

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error reading ZIP archive.
    #[error("ZIP archive error: {0}")]
    ZipArchive(String),

    /// Error parsing XML content.
    #[error("XML parse error: {0}")]
    XmlParse(String),

    /// A required document part is missing.
    #[error("Missing component: {0}")]
    MissingComponent(String),

    /// Error serializing a result.
    #[error("Serialization error: {0}")]
    Serialize(String),
}

impl Error {
    /// Wrap any failure as a parse error for the given format.
    ///
    /// The original message is kept verbatim; no distinction is made between
    /// corrupt input and unsupported internal structure.
    pub fn parse(file_type: SupportedFileType, err: impl std::fmt::Display) -> Self {
        Error::Parse {
            file_type,
            message: err.to_string(),
        }
    }

    /// Process exit code for this error when surfaced by the CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::UnsupportedFileType { .. } => 1,
            Error::FileRead { .. } => 2,
            Error::Parse { .. } | Error::InvalidInput | Error::EmptyInput => 3,
            _ => 4,
        }
    }
}

fn extension_list(types: &[SupportedFileType]) -> String {
    types
        .iter()
        .map(|t| t.extension())
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::ZipArchive(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlParse(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialize(err.to_string())
    }
}
