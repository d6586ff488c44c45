//! Input buffer validation.

use crate::error::{Error, Result};
use std::any::Any;

/// Check that a dynamically typed value is a non-empty byte buffer.
///
/// Accepts `Vec<u8>`, `Box<[u8]>` and `&'static [u8]`. Any other type fails
/// with [`Error::InvalidInput`]; an empty buffer fails with
/// [`Error::EmptyInput`].
///
/// # Example
///
/// ```
/// use officetext::validate::validate_buffer;
///
/// let data: Vec<u8> = b"PK\x03\x04".to_vec();
/// assert!(validate_buffer(&data).is_ok());
/// assert!(validate_buffer(&"not bytes").is_err());
/// ```
pub fn validate_buffer(input: &dyn Any) -> Result<&[u8]> {
    let bytes: &[u8] = if let Some(v) = input.downcast_ref::<Vec<u8>>() {
        v.as_slice()
    } else if let Some(b) = input.downcast_ref::<Box<[u8]>>() {
        &b[..]
    } else if let Some(s) = input.downcast_ref::<&'static [u8]>() {
        *s
    } else {
        return Err(Error::InvalidInput);
    };

    validate_bytes(bytes)
}

/// Check that a byte slice is non-empty.
pub fn validate_bytes(data: &[u8]) -> Result<&[u8]> {
    if data.is_empty() {
        return Err(Error::EmptyInput);
    }
    Ok(data)
}
