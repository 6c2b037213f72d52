pub mod ocr;
pub mod ooxml;
pub mod pdf;

use crate::error::{DocmarkError, Result};

/// Decode a plain text file. Invalid UTF-8 is a decode failure rather
/// than a lossy read.
pub fn txt(name: &str, bytes: &[u8]) -> Result<String> {
    String::from_utf8(bytes.to_vec()).map_err(|e| DocmarkError::Decode {
        name: name.into(),
        detail: format!("invalid UTF-8: {e}"),
    })
}
