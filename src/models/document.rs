use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::section::DocumentSection;

/// Identity and provenance of a source file, fixed at parse time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Generated when the document is parsed, never changes afterwards.
    pub id: Uuid,
    /// Source file name as given.
    pub name: String,
    /// Canonical MIME type derived from the extension.
    pub mime_type: String,
    /// Source size in bytes.
    pub size: u64,
    /// When the document was parsed.
    pub upload_date: DateTime<Utc>,
    /// Last-modified timestamp of the source file.
    pub last_modified: DateTime<Utc>,
}

/// A fully parsed document: the unit of pipeline output and of history
/// storage. Created atomically by the assembler; edits produce a new
/// value with the same id and metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedDocument {
    /// Equals `metadata.id`.
    pub id: Uuid,
    pub metadata: DocumentMetadata,
    /// Raw decoder output, read-only.
    pub original_content: String,
    /// Normalized markdown body.
    pub markdown_content: String,
    /// Heading-delimited sections in document order.
    pub sections: Vec<DocumentSection>,
}

/// Persisted history payload: most-recently-added first, bounded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentHistory {
    pub documents: Vec<ParsedDocument>,
    pub last_accessed: DateTime<Utc>,
}

impl Default for DocumentHistory {
    fn default() -> Self {
        Self {
            documents: Vec::new(),
            last_accessed: Utc::now(),
        }
    }
}
