//! Word (.docx) text extraction.
//!
//! A DOCX file is a ZIP container; the body text lives in
//! `word/document.xml` as WordprocessingML. Only body-level paragraphs are
//! read. Paragraphs inside tables and text boxes are skipped.

use std::io::{Cursor, Read};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use zip::ZipArchive;

use crate::error::DocTextError;
use crate::extraction::TextExtractor;
use crate::format::FileFormat;

const DOCUMENT_PART: &str = "word/document.xml";

pub struct DocxText;

impl TextExtractor for DocxText {
    fn name(&self) -> &'static str {
        "docx"
    }

    fn handles(&self, format: FileFormat) -> bool {
        format == FileFormat::Docx
    }

    fn extract(&self, content: &[u8], _format: FileFormat) -> Result<String, DocTextError> {
        let paragraphs = read_paragraphs(content)?;
        Ok(paragraphs.join("\n"))
    }
}

/// Read the text of every body paragraph, in document order.
pub fn read_paragraphs(bytes: &[u8]) -> Result<Vec<String>, DocTextError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| DocTextError::Docx(format!("not a ZIP container: {e}")))?;

    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| DocTextError::Docx(format!("missing {DOCUMENT_PART}: {e}")))?
        .read_to_string(&mut xml)
        .map_err(|e| DocTextError::Docx(format!("failed to read {DOCUMENT_PART}: {e}")))?;

    parse_document_xml(&xml)
}

fn parse_document_xml(xml: &str) -> Result<Vec<String>, DocTextError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut para_depth = 0usize;
    // Tables and content controls; their paragraphs are not body paragraphs.
    let mut skip_depth = 0usize;
    let mut in_text = false;

    loop {
        let event = reader.read_event().map_err(|e| {
            DocTextError::Docx(format!(
                "XML error at position {}: {e}",
                reader.buffer_position()
            ))
        })?;

        match event {
            Event::Start(e) => match e.name().as_ref() {
                b"w:p" => {
                    para_depth += 1;
                    if para_depth == 1 {
                        current.clear();
                    }
                }
                b"w:tbl" | b"w:sdt" => skip_depth += 1,
                b"w:t" => in_text = true,
                _ => {}
            },
            Event::End(e) => match e.name().as_ref() {
                b"w:p" => {
                    if para_depth == 1 && skip_depth == 0 {
                        paragraphs.push(std::mem::take(&mut current));
                    }
                    para_depth = para_depth.saturating_sub(1);
                }
                b"w:tbl" | b"w:sdt" => skip_depth = skip_depth.saturating_sub(1),
                b"w:t" => in_text = false,
                _ => {}
            },
            Event::Empty(e) => {
                let collecting = para_depth == 1 && skip_depth == 0;
                match e.name().as_ref() {
                    b"w:p" if para_depth == 0 && skip_depth == 0 => paragraphs.push(String::new()),
                    b"w:tab" if collecting => current.push('\t'),
                    b"w:cr" if collecting => current.push('\n'),
                    b"w:br" if collecting && !is_page_break(&e) => current.push('\n'),
                    _ => {}
                }
            }
            Event::Text(t) if in_text && para_depth == 1 && skip_depth == 0 => {
                let text = t
                    .unescape()
                    .map_err(|e| DocTextError::Docx(format!("bad text escape: {e}")))?;
                current.push_str(&text);
            }
            Event::CData(t) if in_text && para_depth == 1 && skip_depth == 0 => {
                current.push_str(&String::from_utf8_lossy(&t));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}

fn is_page_break(e: &BytesStart<'_>) -> bool {
    e.attributes()
        .flatten()
        .any(|a| a.key.as_ref() == b"w:type" && a.value.as_ref() == b"page")
}
