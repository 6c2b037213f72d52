use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DocmarkError, Result};

/// Closed set of supported source file types, derived from the file
/// name extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Pdf,
    Docx,
    Xlsx,
    Pptx,
    Txt,
    Png,
    Jpeg,
}

impl FileType {
    /// Resolve a file type from a file name. Extensions are matched
    /// case-insensitively; unknown or missing extensions are rejected
    /// before any decoding work happens.
    pub fn from_name(name: &str) -> Result<Self> {
        let ext = Path::new(name)
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "pdf" => Ok(Self::Pdf),
            "docx" => Ok(Self::Docx),
            "xlsx" => Ok(Self::Xlsx),
            "ppt" | "pptx" => Ok(Self::Pptx),
            "txt" => Ok(Self::Txt),
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            _ => Err(DocmarkError::UnsupportedType { ext }),
        }
    }

    /// Canonical MIME type for the source format.
    #[must_use]
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            Self::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            Self::Pptx => {
                "application/vnd.openxmlformats-officedocument.presentationml.presentation"
            }
            Self::Txt => "text/plain",
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }

    /// Short format identifier used in output and logs.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Xlsx => "xlsx",
            Self::Pptx => "pptx",
            Self::Txt => "txt",
            Self::Png => "png",
            Self::Jpeg => "jpeg",
        }
    }

    /// File name extensions mapped to this type.
    #[must_use]
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Pdf => &["pdf"],
            Self::Docx => &["docx"],
            Self::Xlsx => &["xlsx"],
            Self::Pptx => &["ppt", "pptx"],
            Self::Txt => &["txt"],
            Self::Png => &["png"],
            Self::Jpeg => &["jpg", "jpeg"],
        }
    }

    /// Whether this type is decoded through the OCR engine.
    #[must_use]
    pub fn is_image(&self) -> bool {
        matches!(self, Self::Png | Self::Jpeg)
    }

    /// All supported types, in display order.
    #[must_use]
    pub fn all() -> &'static [FileType] {
        &[
            Self::Pdf,
            Self::Docx,
            Self::Xlsx,
            Self::Pptx,
            Self::Txt,
            Self::Png,
            Self::Jpeg,
        ]
    }
}
