//! Text extraction for OOXML containers (docx, pptx, xlsx).
//!
//! All three formats are ZIP archives of XML parts; extraction streams
//! the relevant parts with quick-xml instead of building a DOM.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{DocmarkError, Result};

/// Maximum decompressed bytes read from a single ZIP entry (zip-bomb limit).
const MAX_XML_ENTRY_BYTES: u64 = 50 * 1024 * 1024;
/// Maximum worksheets processed in an xlsx.
const XLSX_MAX_SHEETS: usize = 100;

type Archive<'a> = zip::ZipArchive<Cursor<&'a [u8]>>;

fn decode_err(name: &str, detail: impl std::fmt::Display) -> DocmarkError {
    DocmarkError::Decode {
        name: name.into(),
        detail: detail.to_string(),
    }
}

fn open_archive<'a>(name: &str, bytes: &'a [u8]) -> Result<Archive<'a>> {
    zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| decode_err(name, e))
}

fn read_entry(name: &str, archive: &mut Archive<'_>, entry_name: &str) -> Result<Vec<u8>> {
    let entry = archive
        .by_name(entry_name)
        .map_err(|e| decode_err(name, format!("{entry_name}: {e}")))?;
    let mut out = Vec::new();
    entry
        .take(MAX_XML_ENTRY_BYTES)
        .read_to_end(&mut out)
        .map_err(|e| decode_err(name, e))?;
    if out.len() as u64 >= MAX_XML_ENTRY_BYTES {
        return Err(decode_err(
            name,
            format!("{entry_name} exceeds {MAX_XML_ENTRY_BYTES} byte limit"),
        ));
    }
    Ok(out)
}

/// Extract paragraph text from a Word document.
///
/// Collects `w:t` text runs from `word/document.xml`; each `w:p`
/// paragraph boundary becomes a blank line.
pub fn docx(name: &str, bytes: &[u8]) -> Result<String> {
    let mut archive = open_archive(name, bytes)?;
    let xml = read_entry(name, &mut archive, "word/document.xml")?;

    let mut out = String::new();
    let mut paragraph = String::new();
    let mut reader = Reader::from_reader(xml.as_slice());
    let mut buf = Vec::new();
    let mut in_text = false;
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                if e.local_name().as_ref() == b"t" {
                    in_text = true;
                }
            }
            Ok(Event::Text(t)) if in_text => {
                paragraph.push_str(t.unescape().unwrap_or_default().as_ref());
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => {
                    if !paragraph.trim().is_empty() {
                        out.push_str(paragraph.trim());
                        out.push_str("\n\n");
                    }
                    paragraph.clear();
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(decode_err(name, e)),
            _ => {}
        }
        buf.clear();
    }
    Ok(out.trim_end().to_string())
}

/// Extract slide text from a PowerPoint presentation.
///
/// Slides are processed in numeric order; `a:t` runs within a slide are
/// joined per paragraph, slides are separated by a blank line.
pub fn pptx(name: &str, bytes: &[u8]) -> Result<String> {
    let mut archive = open_archive(name, bytes)?;
    let mut slide_names: Vec<String> = archive
        .file_names()
        .filter(|n| n.starts_with("ppt/slides/slide") && n.ends_with(".xml"))
        .map(str::to_string)
        .collect();
    slide_names.sort_by_key(|n| {
        n.trim_start_matches("ppt/slides/slide")
            .trim_end_matches(".xml")
            .parse::<u32>()
            .unwrap_or(u32::MAX)
    });

    let mut slides = Vec::new();
    for slide_name in slide_names {
        let xml = read_entry(name, &mut archive, &slide_name)?;
        let text = slide_text(name, &xml)?;
        if !text.is_empty() {
            slides.push(text);
        }
    }
    Ok(slides.join("\n\n"))
}

fn slide_text(name: &str, xml: &[u8]) -> Result<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut in_text = false;
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                if e.local_name().as_ref() == b"t" {
                    in_text = true;
                }
            }
            Ok(Event::Text(t)) if in_text => {
                current.push_str(t.unescape().unwrap_or_default().as_ref());
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => {
                    if !current.trim().is_empty() {
                        lines.push(current.trim().to_string());
                    }
                    current.clear();
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(decode_err(name, e)),
            _ => {}
        }
        buf.clear();
    }
    Ok(lines.join("\n"))
}

/// Extract spreadsheet content as markdown-shaped text: a level-1
/// heading per sheet followed by comma-joined cell rows. The normalizer
/// passes this output through unchanged.
pub fn xlsx(name: &str, bytes: &[u8]) -> Result<String> {
    let mut archive = open_archive(name, bytes)?;
    let shared = shared_strings(name, &mut archive)?;
    let display_names = workbook_sheet_names(name, &mut archive)?;

    let mut sheet_files: Vec<String> = archive
        .file_names()
        .filter(|n| n.starts_with("xl/worksheets/sheet") && n.ends_with(".xml"))
        .map(str::to_string)
        .collect();
    sheet_files.sort_by_key(|n| {
        n.trim_start_matches("xl/worksheets/sheet")
            .trim_end_matches(".xml")
            .parse::<u32>()
            .unwrap_or(u32::MAX)
    });

    let mut out = String::new();
    for (idx, sheet_file) in sheet_files.into_iter().take(XLSX_MAX_SHEETS).enumerate() {
        let xml = read_entry(name, &mut archive, &sheet_file)?;
        let rows = sheet_rows(name, &xml, &shared)?;
        let display = display_names
            .get(idx)
            .cloned()
            .unwrap_or_else(|| format!("Sheet {}", idx + 1));
        out.push_str(&format!("# Sheet: {display}\n\n"));
        for row in rows {
            out.push_str(&row);
            out.push('\n');
        }
        out.push('\n');
    }
    Ok(out)
}

/// Sheet display names from xl/workbook.xml, in workbook order.
fn workbook_sheet_names(name: &str, archive: &mut Archive<'_>) -> Result<Vec<String>> {
    let xml = match read_entry(name, archive, "xl/workbook.xml") {
        Ok(xml) => xml,
        // Some producers omit workbook.xml; fall back to positional names
        Err(_) => return Ok(Vec::new()),
    };
    let mut names = Vec::new();
    let mut reader = Reader::from_reader(xml.as_slice());
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e) | Event::Empty(e)) => {
                if e.local_name().as_ref() == b"sheet" {
                    for attr in e.attributes().flatten() {
                        if attr.key.as_ref() == b"name" {
                            names.push(String::from_utf8_lossy(&attr.value).into_owned());
                        }
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(decode_err(name, e)),
            _ => {}
        }
        buf.clear();
    }
    Ok(names)
}

fn shared_strings(name: &str, archive: &mut Archive<'_>) -> Result<Vec<String>> {
    let xml = match read_entry(name, archive, "xl/sharedStrings.xml") {
        Ok(xml) => xml,
        // Absent when the workbook has no string cells
        Err(_) => return Ok(Vec::new()),
    };
    let mut strings = Vec::new();
    let mut reader = Reader::from_reader(xml.as_slice());
    let mut buf = Vec::new();
    let mut in_si = false;
    let mut in_text = false;
    let mut current = String::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"si" => {
                    in_si = true;
                    current.clear();
                }
                b"t" if in_si => in_text = true,
                _ => {}
            },
            Ok(Event::Text(t)) if in_text => {
                current.push_str(t.unescape().unwrap_or_default().as_ref());
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"si" => {
                    in_si = false;
                    strings.push(std::mem::take(&mut current));
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(decode_err(name, e)),
            _ => {}
        }
        buf.clear();
    }
    Ok(strings)
}

/// Rows of one worksheet, cells joined by commas. Shared-string cells
/// are resolved through the shared table; other `v` values (numbers,
/// booleans) are emitted as-is.
fn sheet_rows(name: &str, xml: &[u8], shared: &[String]) -> Result<Vec<String>> {
    let mut rows = Vec::new();
    let mut cells: Vec<String> = Vec::new();
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut in_value = false;
    let mut cell_is_shared = false;
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"c" => {
                    cell_is_shared = e.attributes().flatten().any(|a| {
                        a.key.as_ref() == b"t" && a.value.as_ref() == b"s"
                    });
                }
                b"v" => in_value = true,
                _ => {}
            },
            Ok(Event::Text(t)) if in_value => {
                let raw = t.unescape().unwrap_or_default();
                let value = raw.trim();
                if cell_is_shared {
                    if let Some(s) = value.parse::<usize>().ok().and_then(|i| shared.get(i)) {
                        cells.push(s.clone());
                    }
                } else if !value.is_empty() {
                    cells.push(value.to_string());
                }
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"v" => in_value = false,
                b"c" => cell_is_shared = false,
                b"row" => {
                    if !cells.is_empty() {
                        rows.push(cells.join(","));
                    }
                    cells.clear();
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(decode_err(name, e)),
            _ => {}
        }
        buf.clear();
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn zip_with(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut cursor);
            for (name, content) in entries {
                writer
                    .start_file(name.to_string(), SimpleFileOptions::default())
                    .unwrap();
                writer.write_all(content.as_bytes()).unwrap();
            }
            writer.finish().unwrap();
        }
        cursor.into_inner()
    }

    #[test]
    fn docx_rejects_non_zip() {
        let err = docx("bad.docx", b"not a zip").unwrap_err();
        assert!(matches!(err, DocmarkError::Decode { .. }));
    }

    #[test]
    fn docx_rejects_missing_document_part() {
        let bytes = zip_with(&[("other.xml", "<x/>")]);
        assert!(docx("bad.docx", &bytes).is_err());
    }

    #[test]
    fn docx_extracts_paragraphs() {
        let xml = r#"<?xml version="1.0"?>
<w:document xmlns:w="ns">
  <w:body>
    <w:p><w:r><w:t>First paragraph.</w:t></w:r></w:p>
    <w:p><w:r><w:t>Second </w:t></w:r><w:r><w:t>paragraph.</w:t></w:r></w:p>
  </w:body>
</w:document>"#;
        let bytes = zip_with(&[("word/document.xml", xml)]);
        let text = docx("a.docx", &bytes).unwrap();
        assert_eq!(text, "First paragraph.\n\nSecond paragraph.");
    }

    #[test]
    fn pptx_extracts_slides_in_order() {
        let slide = |t: &str| {
            format!(
                r#"<p:sld xmlns:a="ns"><a:p><a:r><a:t>{t}</a:t></a:r></a:p></p:sld>"#
            )
        };
        let s1 = slide("Slide one");
        let s2 = slide("Slide two");
        let s10 = slide("Slide ten");
        let bytes = zip_with(&[
            ("ppt/slides/slide10.xml", s10.as_str()),
            ("ppt/slides/slide1.xml", s1.as_str()),
            ("ppt/slides/slide2.xml", s2.as_str()),
        ]);
        let text = pptx("deck.pptx", &bytes).unwrap();
        assert_eq!(text, "Slide one\n\nSlide two\n\nSlide ten");
    }

    #[test]
    fn xlsx_emits_sheet_heading_and_rows() {
        let workbook = r#"<workbook xmlns="ns"><sheets>
            <sheet name="Budget" sheetId="1"/>
        </sheets></workbook>"#;
        let strings = r#"<sst xmlns="ns">
            <si><t>Item</t></si><si><t>Cost</t></si><si><t>Desk</t></si>
        </sst>"#;
        let sheet = r#"<worksheet xmlns="ns"><sheetData>
            <row r="1"><c t="s"><v>0</v></c><c t="s"><v>1</v></c></row>
            <row r="2"><c t="s"><v>2</v></c><c><v>250</v></c></row>
        </sheetData></worksheet>"#;
        let bytes = zip_with(&[
            ("xl/workbook.xml", workbook),
            ("xl/sharedStrings.xml", strings),
            ("xl/worksheets/sheet1.xml", sheet),
        ]);
        let text = xlsx("budget.xlsx", &bytes).unwrap();
        assert!(text.starts_with("# Sheet: Budget\n\n"));
        assert!(text.contains("Item,Cost\n"));
        assert!(text.contains("Desk,250\n"));
    }

    #[test]
    fn xlsx_without_shared_strings_still_reads_numbers() {
        let sheet = r#"<worksheet xmlns="ns"><sheetData>
            <row r="1"><c><v>1</v></c><c><v>2</v></c></row>
        </sheetData></worksheet>"#;
        let bytes = zip_with(&[("xl/worksheets/sheet1.xml", sheet)]);
        let text = xlsx("nums.xlsx", &bytes).unwrap();
        assert!(text.contains("# Sheet: Sheet 1"));
        assert!(text.contains("1,2\n"));
    }
}
