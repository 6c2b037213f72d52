use crate::models::FileType;

/// Convert raw decoder output into a markdown string. Never fails;
/// empty input yields empty output.
#[must_use]
pub fn normalize(raw: &str, file_type: FileType) -> String {
    match file_type {
        FileType::Txt => txt_to_markdown(raw),
        // Spreadsheet decoder output is already markdown-shaped
        FileType::Xlsx => raw.to_string(),
        _ => generic_to_markdown(raw),
    }
}

/// Plain text: paragraphs separated by a blank line are kept, trimmed,
/// and re-joined with exactly one blank line. Empty paragraphs drop.
fn txt_to_markdown(raw: &str) -> String {
    raw.split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Generic pass: collapse runs of 3+ newlines down to one blank line
/// and trim the whole string. No structural reformatting.
fn generic_to_markdown(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut newlines = 0usize;
    for c in raw.chars() {
        if c == '\n' {
            newlines += 1;
            if newlines <= 2 {
                out.push(c);
            }
        } else {
            newlines = 0;
            out.push(c);
        }
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_empty_output() {
        for t in FileType::all() {
            assert_eq!(normalize("", *t), "");
        }
    }

    #[test]
    fn txt_joins_trimmed_paragraphs() {
        let raw = "  first paragraph  \n\n\n\nsecond\n\n   \n\nthird";
        let md = normalize(raw, FileType::Txt);
        assert_eq!(md, "first paragraph\n\nsecond\n\nthird");
    }

    #[test]
    fn txt_preserves_headings_verbatim() {
        let raw = "# Title\n\nHello world\n\n## Sub\n\nMore text\n";
        let md = normalize(raw, FileType::Txt);
        assert_eq!(md, "# Title\n\nHello world\n\n## Sub\n\nMore text");
    }

    #[test]
    fn xlsx_passes_through_unchanged() {
        let raw = "# Sheet: Budget\n\nItem,Cost\nDesk,250\n\n";
        assert_eq!(normalize(raw, FileType::Xlsx), raw);
    }

    #[test]
    fn generic_collapses_newline_runs() {
        let raw = "line one\n\n\n\n\nline two\n";
        let md = normalize(raw, FileType::Pdf);
        assert_eq!(md, "line one\n\nline two");
    }

    #[test]
    fn generic_trims_surrounding_whitespace() {
        assert_eq!(normalize("\n\n  text  \n\n", FileType::Docx), "text");
    }
}
