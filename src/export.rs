//! Export a stored document to a file.

use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::error::{DocmarkError, Result};
use crate::models::{DocumentSection, ParsedDocument};

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Markdown,
    Json,
    Text,
}

impl ExportFormat {
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "markdown" | "md" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            "text" | "txt" => Ok(Self::Text),
            other => Err(DocmarkError::Other(format!(
                "unknown export format: {other} (expected markdown, json or text)"
            ))),
        }
    }

    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Json => "json",
            Self::Text => "txt",
        }
    }
}

#[derive(Serialize)]
struct JsonExport<'a> {
    metadata: &'a crate::models::DocumentMetadata,
    content: &'a str,
    sections: &'a [DocumentSection],
    export_date: DateTime<Utc>,
}

/// Render a document in the given format.
#[must_use]
pub fn render(document: &ParsedDocument, format: ExportFormat) -> String {
    match format {
        ExportFormat::Markdown => markdown_with_front_matter(document),
        ExportFormat::Json => serde_json::to_string_pretty(&JsonExport {
            metadata: &document.metadata,
            content: &document.markdown_content,
            sections: &document.sections,
            export_date: Utc::now(),
        })
        .unwrap_or_else(|e| format!("{{\"error\":\"{e}\"}}")),
        ExportFormat::Text => document.markdown_content.clone(),
    }
}

/// Default export filename: source name with its extension replaced.
#[must_use]
pub fn default_filename(document: &ParsedDocument, format: ExportFormat) -> PathBuf {
    let stem = Path::new(&document.metadata.name)
        .file_stem()
        .map_or_else(|| document.metadata.name.clone(), |s| s.to_string_lossy().into_owned());
    PathBuf::from(format!("{stem}.{}", format.extension()))
}

/// Write a document to `output`, or to the default filename in the
/// current directory when `output` is `None`. Returns the path written.
pub fn export_to_file(
    document: &ParsedDocument,
    format: ExportFormat,
    output: Option<&Path>,
) -> Result<PathBuf> {
    let path = output.map_or_else(|| default_filename(document, format), Path::to_path_buf);
    std::fs::write(&path, render(document, format))?;
    Ok(path)
}

fn markdown_with_front_matter(document: &ParsedDocument) -> String {
    format!(
        "---\ntitle: {}\ntype: {}\nsize: {}\nuploaded: {}\nexported: {}\n---\n\n{}",
        document.metadata.name,
        document.metadata.mime_type,
        document.metadata.size,
        document
            .metadata
            .upload_date
            .to_rfc3339_opts(SecondsFormat::Secs, true),
        Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        document.markdown_content
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DocumentMetadata;
    use uuid::Uuid;

    fn sample() -> ParsedDocument {
        let id = Uuid::new_v4();
        ParsedDocument {
            id,
            metadata: DocumentMetadata {
                id,
                name: "report.docx".into(),
                mime_type: "application/vnd.openxmlformats-officedocument.wordprocessingml.document".into(),
                size: 1024,
                upload_date: Utc::now(),
                last_modified: Utc::now(),
            },
            original_content: "Body".into(),
            markdown_content: "# Report\n\nBody".into(),
            sections: Vec::new(),
        }
    }

    #[test]
    fn parse_format_aliases() {
        assert_eq!(ExportFormat::parse("md").unwrap(), ExportFormat::Markdown);
        assert_eq!(ExportFormat::parse("txt").unwrap(), ExportFormat::Text);
        assert!(ExportFormat::parse("yaml").is_err());
    }

    #[test]
    fn markdown_export_carries_front_matter() {
        let out = render(&sample(), ExportFormat::Markdown);
        assert!(out.starts_with("---\ntitle: report.docx\n"));
        assert!(out.contains("size: 1024"));
        assert!(out.ends_with("# Report\n\nBody"));
    }

    #[test]
    fn json_export_includes_sections_and_date() {
        let out = render(&sample(), ExportFormat::Json);
        assert!(out.contains("\"export_date\""));
        assert!(out.contains("\"sections\""));
    }

    #[test]
    fn text_export_is_bare_markdown() {
        assert_eq!(render(&sample(), ExportFormat::Text), "# Report\n\nBody");
    }

    #[test]
    fn default_filename_swaps_extension() {
        let doc = sample();
        assert_eq!(
            default_filename(&doc, ExportFormat::Markdown),
            PathBuf::from("report.md")
        );
        assert_eq!(
            default_filename(&doc, ExportFormat::Json),
            PathBuf::from("report.json")
        );
    }

    #[test]
    fn export_writes_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let target = tmp.path().join("out.md");
        let written = export_to_file(&sample(), ExportFormat::Markdown, Some(&target)).unwrap();
        assert_eq!(written, target);
        assert!(std::fs::read_to_string(&target).unwrap().contains("# Report"));
    }
}
