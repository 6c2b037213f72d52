//! Document parsing pipeline: decode, normalize, extract sections.

pub mod normalize;
pub mod sections;

use std::cell::Cell;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::decode::{self, ocr::OcrEngine, ooxml, pdf};
use crate::error::{DocmarkError, Result};
use crate::models::{DocumentMetadata, FileType, ParsedDocument};

/// Progress callback: percent complete (0-100) and a stage message.
pub type ProgressFn<'a> = &'a (dyn Fn(u8, &str) + Send + Sync);

/// A source document: name, raw bytes, and provenance timestamp.
#[derive(Debug, Clone)]
pub struct DocumentInput {
    pub name: String,
    pub bytes: Vec<u8>,
    pub last_modified: DateTime<Utc>,
}

impl DocumentInput {
    #[must_use]
    pub fn new(name: impl Into<String>, bytes: Vec<u8>, last_modified: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            bytes,
            last_modified,
        }
    }

    /// Read a source document from the filesystem. Falls back to "now"
    /// when the platform reports no modification time.
    pub fn from_path(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| DocmarkError::Other(format!("not a file path: {}", path.display())))?;
        let meta = std::fs::metadata(path)?;
        let last_modified = meta
            .modified()
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| Utc::now());
        let bytes = std::fs::read(path)?;
        Ok(Self {
            name,
            bytes,
            last_modified,
        })
    }
}

/// Clamps reported progress so the sequence a callback observes is
/// never decreasing, regardless of stage interleaving.
struct Reporter<'a> {
    callback: Option<ProgressFn<'a>>,
    last: Cell<u8>,
}

impl<'a> Reporter<'a> {
    fn new(callback: Option<ProgressFn<'a>>) -> Self {
        Self {
            callback,
            last: Cell::new(0),
        }
    }

    fn emit(&self, percent: u8, message: &str) {
        let percent = percent.max(self.last.get());
        self.last.set(percent);
        tracing::debug!(percent, message, "pipeline progress");
        if let Some(cb) = self.callback {
            cb(percent, message);
        }
    }
}

/// Orchestrates decoder, normalizer and section extractor into one
/// `ParsedDocument`. Reentrant: holds no per-call state, only the
/// injected OCR engine shared across calls.
pub struct DocumentAssembler {
    ocr: Arc<dyn OcrEngine>,
}

impl DocumentAssembler {
    #[must_use]
    pub fn new(ocr: Arc<dyn OcrEngine>) -> Self {
        Self { ocr }
    }

    /// Parse one document. Fails fast on unsupported extensions; any
    /// stage failure aborts the whole parse with a single wrapped
    /// error, never a partial document.
    pub async fn parse(
        &self,
        input: &DocumentInput,
        on_progress: Option<ProgressFn<'_>>,
    ) -> Result<ParsedDocument> {
        let file_type = FileType::from_name(&input.name)?;
        let metadata = create_metadata(input, file_type);
        let progress = Reporter::new(on_progress);

        progress.emit(10, "Starting document parsing...");
        tracing::debug!(name = %input.name, format = file_type.as_str(), "decoding");

        let original_content = self
            .decode_stage(file_type, input, &progress)
            .await
            .map_err(|e| DocmarkError::Parse {
                name: input.name.clone(),
                detail: e.to_string(),
            })?;

        progress.emit(80, "Converting to markdown...");
        let markdown_content = normalize::normalize(&original_content, file_type);

        progress.emit(90, "Extracting sections...");
        let doc_sections = sections::extract_sections(&markdown_content);

        progress.emit(100, "Parsing complete");
        Ok(ParsedDocument {
            id: metadata.id,
            metadata,
            original_content,
            markdown_content,
            sections: doc_sections,
        })
    }

    async fn decode_stage(
        &self,
        file_type: FileType,
        input: &DocumentInput,
        progress: &Reporter<'_>,
    ) -> Result<String> {
        match file_type {
            FileType::Txt => {
                progress.emit(30, "Reading text file...");
                decode::txt(&input.name, &input.bytes)
            }
            FileType::Pdf => {
                progress.emit(30, "Parsing PDF file...");
                pdf::extract_text(&input.name, &input.bytes)
            }
            FileType::Docx => {
                progress.emit(30, "Parsing DOCX file...");
                ooxml::docx(&input.name, &input.bytes)
            }
            FileType::Xlsx => {
                progress.emit(30, "Parsing Excel file...");
                ooxml::xlsx(&input.name, &input.bytes)
            }
            FileType::Pptx => {
                progress.emit(30, "Parsing PowerPoint file...");
                ooxml::pptx(&input.name, &input.bytes)
            }
            FileType::Png | FileType::Jpeg => {
                progress.emit(30, "Initializing OCR...");
                self.ocr.prepare().await?;
                progress.emit(50, "Extracting text from image...");
                self.ocr.recognize(&input.bytes, file_type.as_str()).await
            }
        }
    }
}

fn create_metadata(input: &DocumentInput, file_type: FileType) -> DocumentMetadata {
    let id = Uuid::new_v4();
    DocumentMetadata {
        id,
        name: input.name.clone(),
        mime_type: file_type.mime_type().to_string(),
        size: input.bytes.len() as u64,
        upload_date: Utc::now(),
        last_modified: input.last_modified,
    }
}
