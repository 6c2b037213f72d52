//! Heading-based section extraction over a markdown string.

use uuid::Uuid;

use crate::models::DocumentSection;

struct OpenSection {
    title: String,
    level: u8,
    start_index: usize,
    content_start: usize,
    buffer: String,
}

/// Split a markdown string into heading-delimited sections, in document
/// order. Sections never overlap and their `start_index` values are
/// strictly increasing. Text before the first heading belongs to no
/// section and is dropped.
#[must_use]
pub fn extract_sections(markdown: &str) -> Vec<DocumentSection> {
    let mut sections = Vec::new();
    let mut open: Option<OpenSection> = None;
    let mut offset = 0usize;

    for line in markdown.split('\n') {
        if let Some((level, title)) = heading_line(line) {
            if let Some(prev) = open.take() {
                sections.push(close_section(prev));
            }
            open = Some(OpenSection {
                title: title.to_string(),
                level,
                start_index: offset,
                content_start: (offset + line.len() + 1).min(markdown.len()),
                buffer: String::new(),
            });
        } else if let Some(current) = open.as_mut() {
            current.buffer.push_str(line);
            current.buffer.push('\n');
        }
        offset += line.len() + 1;
    }

    if let Some(last) = open.take() {
        sections.push(close_section(last));
    }
    sections
}

/// A heading is a line whose content, after leading whitespace, starts
/// with 1-6 `#` followed by whitespace and a non-empty title.
fn heading_line(line: &str) -> Option<(u8, &str)> {
    let trimmed = line.trim_start();
    let marker_len = trimmed.chars().take_while(|c| *c == '#').count();
    if marker_len == 0 || marker_len > 6 {
        return None;
    }
    let rest = &trimmed[marker_len..];
    if !rest.starts_with([' ', '\t']) {
        return None;
    }
    let title = rest.trim();
    if title.is_empty() {
        return None;
    }
    Some((marker_len as u8, title))
}

fn close_section(open: OpenSection) -> DocumentSection {
    let content = open.buffer.trim();
    let leading = open.buffer.len() - open.buffer.trim_start().len();
    let end_index = if content.is_empty() {
        open.content_start
    } else {
        open.content_start + leading + content.len()
    };
    DocumentSection {
        id: Uuid::new_v4(),
        title: open.title,
        content: content.to_string(),
        start_index: open.start_index,
        end_index,
        level: open.level,
    }
}
