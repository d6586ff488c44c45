//! Parser options configuration.

/// Options controlling how extractors post-process their output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserOptions {
    /// Apply whitespace normalization to the extracted text
    pub normalize_whitespace: bool,

    /// Attach a metadata record to the result
    pub include_metadata: bool,

    /// File name recorded in metadata (not set by the CLI)
    pub file_name: Option<String>,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            normalize_whitespace: true,
            include_metadata: false,
            file_name: None,
        }
    }
}

impl ParserOptions {
    /// Create new options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable whitespace normalization.
    pub fn with_normalize_whitespace(mut self, enabled: bool) -> Self {
        self.normalize_whitespace = enabled;
        self
    }

    /// Enable or disable the metadata record.
    pub fn with_metadata(mut self, enabled: bool) -> Self {
        self.include_metadata = enabled;
        self
    }

    /// Record a file name in the metadata.
    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }
}
