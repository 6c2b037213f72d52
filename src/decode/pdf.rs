use crate::error::{DocmarkError, Result};

/// Extract text from PDF bytes.
pub fn extract_text(name: &str, bytes: &[u8]) -> Result<String> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| DocmarkError::Decode {
        name: name.into(),
        detail: format!("PDF extraction error: {e}"),
    })
}
