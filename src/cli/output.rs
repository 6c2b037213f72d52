use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{DocumentSection, ParsedDocument};

/// Format a result as JSON, minified by default or pretty when the
/// configured output format says so.
pub fn format_for<T: Serialize>(result: &T, format: &str) -> String {
    let rendered = if format == "pretty" {
        serde_json::to_string_pretty(result)
    } else {
        serde_json::to_string(result)
    };
    rendered.unwrap_or_else(|e| format!("{{\"error\":\"{e}\"}}"))
}

/// Format a result as minified JSON.
pub fn format_json<T: Serialize>(result: &T) -> String {
    serde_json::to_string(result).unwrap_or_else(|e| format!("{{\"error\":\"{e}\"}}"))
}

/// Format an error as JSON.
pub fn format_error(err: &dyn std::fmt::Display) -> String {
    format!("{{\"error\":\"{}\"}}", err.to_string().replace('"', "\\\""))
}

/// Compact per-document listing used by convert/history/search output.
#[derive(Debug, Serialize)]
pub struct DocumentSummary {
    pub id: Uuid,
    pub name: String,
    pub mime_type: String,
    pub size: u64,
    pub sections: usize,
    pub uploaded: DateTime<Utc>,
}

impl From<&ParsedDocument> for DocumentSummary {
    fn from(doc: &ParsedDocument) -> Self {
        Self {
            id: doc.id,
            name: doc.metadata.name.clone(),
            mime_type: doc.metadata.mime_type.clone(),
            size: doc.metadata.size,
            sections: doc.sections.len(),
            uploaded: doc.metadata.upload_date,
        }
    }
}

/// Section outline row without the content body.
#[derive(Debug, Serialize)]
pub struct SectionOutline {
    pub title: String,
    pub level: u8,
    pub start_index: usize,
    pub end_index: usize,
}

impl From<&DocumentSection> for SectionOutline {
    fn from(s: &DocumentSection) -> Self {
        Self {
            title: s.title.clone(),
            level: s.level,
            start_index: s.start_index,
            end_index: s.end_index,
        }
    }
}
