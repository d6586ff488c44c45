//! File type resolution for supported Office Open XML documents.

/// ZIP file magic bytes: PK\x03\x04
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// Document formats the extractors understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SupportedFileType {
    /// Microsoft Word document (.docx)
    Docx,
    /// Microsoft Excel workbook (.xlsx)
    Xlsx,
}

impl SupportedFileType {
    /// Every supported format, in the order they are reported to users.
    pub const ALL: &'static [SupportedFileType] = &[SupportedFileType::Docx, SupportedFileType::Xlsx];

    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            SupportedFileType::Docx => "docx",
            SupportedFileType::Xlsx => "xlsx",
        }
    }

    /// Returns the upper-case label used in messages.
    pub fn label(&self) -> &'static str {
        match self {
            SupportedFileType::Docx => "DOCX",
            SupportedFileType::Xlsx => "XLSX",
        }
    }
}

impl std::fmt::Display for SupportedFileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Resolve the file type from a file name by its extension.
///
/// Only the text after the last `.` is considered, case-insensitively.
/// Names without a supported extension resolve to `None`.
///
/// # Example
///
/// ```
/// use officetext::detect::{resolve_file_type, SupportedFileType};
///
/// assert_eq!(resolve_file_type("Report.DOCX"), Some(SupportedFileType::Docx));
/// assert_eq!(resolve_file_type("notes.txt"), None);
/// ```
pub fn resolve_file_type(file_name: &str) -> Option<SupportedFileType> {
    let (_, ext) = file_name.rsplit_once('.')?;
    match ext.to_lowercase().as_str() {
        "docx" => Some(SupportedFileType::Docx),
        "xlsx" => Some(SupportedFileType::Xlsx),
        _ => None,
    }
}

/// Check if data starts with ZIP magic bytes.
pub fn is_zip_file(data: &[u8]) -> bool {
    data.len() >= 4 && data[..4] == ZIP_MAGIC
}
