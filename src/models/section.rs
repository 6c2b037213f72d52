use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One heading-delimited region of a markdown document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSection {
    /// Unique per section, generated at extraction time.
    pub id: Uuid,
    /// Text following the heading marker, trimmed.
    pub title: String,
    /// Text between this heading line and the next heading, trimmed of
    /// surrounding blank lines.
    pub content: String,
    /// Byte offset of the heading line's first character in the source
    /// markdown string.
    pub start_index: usize,
    /// Byte offset just past the trimmed section content.
    pub end_index: usize,
    /// Heading level, 1-6.
    pub level: u8,
}
