//! Extraction result structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata describing a single parse call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseMetadata {
    /// Name of the parsed file
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub file_name: Option<String>,

    /// Size of the parsed input in bytes
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub file_size: Option<u64>,

    /// When the parse happened, RFC 3339 with millisecond precision
    #[serde(with = "iso_millis")]
    pub parsed_at: DateTime<Utc>,

    /// Version of the parser that produced the result
    pub parser_version: String,
}

mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        DateTime::<Utc>::deserialize(deserializer)
    }
}

/// Text extracted from a document, with optional metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseResult {
    /// Extracted text, normalized unless normalization was disabled
    pub text: String,

    /// Metadata, present only when requested
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub metadata: Option<ParseMetadata>,
}

impl ParseResult {
    /// Create a result without metadata.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            metadata: None,
        }
    }

    /// Attach a metadata record.
    pub fn with_metadata(mut self, metadata: ParseMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Serialize to pretty-printed JSON with 2-space indentation.
    pub fn to_json_pretty(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
