//! Metadata record construction.

use crate::model::ParseMetadata;
use chrono::{SubsecRound, Utc};

/// Parser version reported when the caller does not supply one.
pub const DEFAULT_PARSER_VERSION: &str = "1.0.0";

/// Build a metadata record stamped with the current time, to the
/// millisecond.
///
/// Fields the caller leaves as `None` stay absent in the record.
pub fn create_parse_metadata(
    file_name: Option<&str>,
    file_size: Option<u64>,
    parser_version: Option<&str>,
) -> ParseMetadata {
    ParseMetadata {
        file_name: file_name.map(str::to_string),
        file_size,
        parsed_at: Utc::now().trunc_subsecs(3),
        parser_version: parser_version.unwrap_or(DEFAULT_PARSER_VERSION).to_string(),
    }
}
