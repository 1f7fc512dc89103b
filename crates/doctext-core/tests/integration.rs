//! Integration tests for the Dispatcher fallback chain.
//!
//! Uses a MockPdf backend that returns pre-built pages without invoking
//! pdftotext, and a StubOcr that records every call, so these tests run
//! without poppler-utils or network access.

use std::io::{Cursor, Write};
use std::sync::{Arc, Mutex};

use doctext_core::error::DocTextError;
use doctext_core::extraction::docx::DocxText;
use doctext_core::extraction::pdf::PdfText;
use doctext_core::extraction::spreadsheet::SpreadsheetText;
use doctext_core::extraction::{PageContent, PdfExtractor, TextExtractor};
use doctext_core::ocr::{Block, BlockType, OcrError, OcrService};
use doctext_core::{Dispatcher, ExtractionSource};

struct MockPdf {
    pages: Result<Vec<&'static str>, &'static str>,
}

impl PdfExtractor for MockPdf {
    fn extract_pages(&self, _pdf_bytes: &[u8]) -> Result<Vec<PageContent>, DocTextError> {
        match &self.pages {
            Ok(pages) => Ok(pages
                .iter()
                .enumerate()
                .map(|(i, text)| PageContent {
                    page_number: i + 1,
                    text: text.to_string(),
                })
                .collect()),
            Err(reason) => Err(DocTextError::Pdf(reason.to_string())),
        }
    }

    fn backend_name(&self) -> &str {
        "mock"
    }
}

#[derive(Clone, Copy)]
enum OcrReply {
    Lines,
    ServiceError,
    TransportError,
}

#[derive(Clone)]
struct StubOcr {
    reply: OcrReply,
    calls: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl StubOcr {
    fn new(reply: OcrReply) -> Self {
        StubOcr {
            reply,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn calls(&self) -> Vec<Vec<u8>> {
        self.calls.lock().unwrap().clone()
    }
}

impl OcrService for StubOcr {
    fn detect_document_text(&self, document: &[u8]) -> Result<Vec<Block>, OcrError> {
        self.calls.lock().unwrap().push(document.to_vec());
        match self.reply {
            OcrReply::Lines => Ok(vec![
                Block::new(BlockType::Page, None),
                Block::line("OCR line one"),
                Block::new(BlockType::Word, Some("OCR".into())),
                Block::line("OCR line two"),
            ]),
            OcrReply::ServiceError => Err(OcrError::Service {
                code: "InvalidParameterException".into(),
                message: "Request has invalid parameters".into(),
            }),
            OcrReply::TransportError => Err(OcrError::Transport("connection reset".into())),
        }
    }

    fn service_name(&self) -> &str {
        "stub"
    }
}

fn dispatcher(pdf: MockPdf, ocr: &StubOcr) -> Dispatcher {
    let extractors: Vec<Box<dyn TextExtractor>> = vec![
        Box::new(PdfText::new(pdf)),
        Box::new(DocxText),
        Box::new(SpreadsheetText),
    ];
    Dispatcher::with_extractors(extractors, Box::new(ocr.clone()))
}

fn no_pdf() -> MockPdf {
    MockPdf {
        pages: Err("not used"),
    }
}

fn docx_bytes(paragraphs: &[&str]) -> Vec<u8> {
    let body: String = paragraphs
        .iter()
        .map(|p| format!(r#"<w:p><w:r><w:t xml:space="preserve">{p}</w:t></w:r></w:p>"#))
        .collect();
    let xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
    );

    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default();
    zip.start_file("[Content_Types].xml", options).unwrap();
    zip.write_all(b"<Types/>").unwrap();
    zip.start_file("word/document.xml", options).unwrap();
    zip.write_all(xml.as_bytes()).unwrap();
    zip.finish().unwrap().into_inner()
}

/// Minimal workbook: shared strings for text, style 1 is the built-in
/// `mm-dd-yy` date format, B3 and C2 are left empty.
fn xlsx_bytes() -> Vec<u8> {
    let files: [(&str, &str); 6] = [
        (
            "[Content_Types].xml",
            r#"<?xml version="1.0" encoding="UTF-8"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/></Types>"#,
        ),
        (
            "xl/workbook.xml",
            r#"<?xml version="1.0" encoding="UTF-8"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Sheet1" sheetId="1" r:id="rId1"/></sheets></workbook>"#,
        ),
        (
            "xl/_rels/workbook.xml.rels",
            r#"<?xml version="1.0" encoding="UTF-8"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#,
        ),
        (
            "xl/styles.xml",
            r#"<?xml version="1.0" encoding="UTF-8"?><styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><cellXfs count="2"><xf numFmtId="0"/><xf numFmtId="14"/></cellXfs></styleSheet>"#,
        ),
        (
            "xl/sharedStrings.xml",
            r#"<?xml version="1.0" encoding="UTF-8"?><sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="4" uniqueCount="4"><si><t>when</t></si><si><t>amount</t></si><si><t>note</t></si><si><t>paid</t></si></sst>"#,
        ),
        (
            "xl/worksheets/sheet1.xml",
            r#"<?xml version="1.0" encoding="UTF-8"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData><row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1" t="s"><v>1</v></c><c r="C1" t="s"><v>2</v></c></row><row r="2"><c r="A2" s="1"><v>45366</v></c><c r="B2"><v>12.5</v></c></row><row r="3"><c r="A3" s="1"><v>45367</v></c><c r="C3" t="s"><v>3</v></c></row></sheetData></worksheet>"#,
        ),
    ];

    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default();
    for (name, xml) in files {
        zip.start_file(name, options).unwrap();
        zip.write_all(xml.as_bytes()).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

fn png_bytes() -> Vec<u8> {
    let img = image::GrayImage::from_pixel(4, 4, image::Luma([200]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

// ---------------------------------------------------------------------------
// Unknown extensions go straight to OCR
// ---------------------------------------------------------------------------
#[test]
fn unknown_extension_skips_to_ocr() {
    let ocr = StubOcr::new(OcrReply::Lines);
    let d = dispatcher(
        MockPdf {
            pages: Ok(vec!["never read"]),
        },
        &ocr,
    );

    let text = d.extract("scan.tiff", b"raw tiff bytes");

    assert_eq!(text, "OCR line one\nOCR line two");
    assert_eq!(ocr.calls(), vec![b"raw tiff bytes".to_vec()]);
}

// ---------------------------------------------------------------------------
// PDF
// ---------------------------------------------------------------------------
#[test]
fn pdf_with_text_is_returned_without_ocr() {
    let ocr = StubOcr::new(OcrReply::Lines);
    let d = dispatcher(
        MockPdf {
            pages: Ok(vec!["  Page one\n", "", "Page three\n\n"]),
        },
        &ocr,
    );

    let outcome = d.extract_with_source("Report.PDF", b"%PDF-1.7");

    assert_eq!(outcome.text, "Page one\nPage three");
    assert_eq!(outcome.source, ExtractionSource::Local("pdf"));
    assert!(ocr.calls().is_empty());
}

#[test]
fn pdf_with_only_whitespace_falls_back_to_ocr() {
    let ocr = StubOcr::new(OcrReply::Lines);
    let d = dispatcher(
        MockPdf {
            pages: Ok(vec![" \n", "\t", ""]),
        },
        &ocr,
    );

    let outcome = d.extract_with_source("scanned.pdf", b"%PDF-scan");

    assert_eq!(outcome.text, "OCR line one\nOCR line two");
    assert_eq!(outcome.source, ExtractionSource::Ocr);
    assert_eq!(ocr.calls(), vec![b"%PDF-scan".to_vec()]);
}

#[test]
fn pdf_backend_error_falls_back_to_ocr() {
    let ocr = StubOcr::new(OcrReply::Lines);
    let d = dispatcher(
        MockPdf {
            pages: Err("broken xref table"),
        },
        &ocr,
    );

    assert_eq!(d.extract("broken.pdf", b"garbage"), "OCR line one\nOCR line two");
    assert_eq!(ocr.calls().len(), 1);
}

// ---------------------------------------------------------------------------
// DOCX
// ---------------------------------------------------------------------------
#[test]
fn docx_paragraphs_are_joined_with_newlines() {
    let ocr = StubOcr::new(OcrReply::Lines);
    let d = dispatcher(no_pdf(), &ocr);

    let bytes = docx_bytes(&["", "Dear reader,", "", "Regards &amp; thanks ", ""]);
    let outcome = d.extract_with_source("letter.docx", &bytes);

    assert_eq!(outcome.text, "Dear reader,\n\nRegards & thanks");
    assert_eq!(outcome.source, ExtractionSource::Local("docx"));
    assert!(ocr.calls().is_empty());
}

#[test]
fn corrupted_docx_falls_back_to_ocr() {
    let ocr = StubOcr::new(OcrReply::Lines);
    let d = dispatcher(no_pdf(), &ocr);

    let mut bytes = docx_bytes(&["Hello"]);
    bytes.truncate(bytes.len() / 2);

    assert_eq!(d.extract("letter.docx", &bytes), "OCR line one\nOCR line two");
    assert_eq!(ocr.calls(), vec![bytes]);
}

#[test]
fn docx_without_text_falls_back_to_ocr() {
    let ocr = StubOcr::new(OcrReply::Lines);
    let d = dispatcher(no_pdf(), &ocr);

    let bytes = docx_bytes(&["", "   "]);
    let outcome = d.extract_with_source("blank.docx", &bytes);

    assert_eq!(outcome.source, ExtractionSource::Ocr);
    assert_eq!(ocr.calls().len(), 1);
}

// ---------------------------------------------------------------------------
// CSV / XLSX
// ---------------------------------------------------------------------------
#[test]
fn csv_is_rendered_as_a_table() {
    let ocr = StubOcr::new(OcrReply::Lines);
    let d = dispatcher(no_pdf(), &ocr);

    let outcome = d.extract_with_source("data.csv", b"item,price\nbread,2.5\ncheese,11\n");

    assert_eq!(outcome.text, "item  price\n bread    2.5\ncheese     11");
    assert_eq!(outcome.source, ExtractionSource::Local("spreadsheet"));
    assert!(ocr.calls().is_empty());
}

#[test]
fn unreadable_csv_falls_back_to_ocr() {
    let ocr = StubOcr::new(OcrReply::Lines);
    let d = dispatcher(no_pdf(), &ocr);

    assert_eq!(
        d.extract("data.csv", b"a,b\n\xff\xfe,1\n"),
        "OCR line one\nOCR line two"
    );
    assert_eq!(d.extract("empty.csv", b""), "OCR line one\nOCR line two");
    assert_eq!(ocr.calls().len(), 2);
}

#[test]
fn xlsx_is_rendered_as_a_table() {
    let ocr = StubOcr::new(OcrReply::Lines);
    let d = dispatcher(no_pdf(), &ocr);

    let outcome = d.extract_with_source("book.xlsx", &xlsx_bytes());

    assert_eq!(
        outcome.text,
        "when  amount  note\n2024-03-15    12.5      \n2024-03-16          paid"
    );
    assert_eq!(outcome.source, ExtractionSource::Local("spreadsheet"));
    assert!(ocr.calls().is_empty());
}

#[test]
fn invalid_xlsx_falls_back_to_ocr() {
    let ocr = StubOcr::new(OcrReply::Lines);
    let d = dispatcher(no_pdf(), &ocr);

    let outcome = d.extract_with_source("book.xlsx", b"not a workbook");

    assert_eq!(outcome.source, ExtractionSource::Ocr);
    assert_eq!(ocr.calls(), vec![b"not a workbook".to_vec()]);
}

// ---------------------------------------------------------------------------
// Images always go to OCR
// ---------------------------------------------------------------------------
#[test]
fn decodable_image_goes_to_ocr() {
    let ocr = StubOcr::new(OcrReply::Lines);
    let d = dispatcher(no_pdf(), &ocr);

    let png = png_bytes();
    let outcome = d.extract_with_source("photo.PNG", &png);

    assert_eq!(outcome.text, "OCR line one\nOCR line two");
    assert_eq!(outcome.source, ExtractionSource::Ocr);
    assert_eq!(ocr.calls(), vec![png]);
}

#[test]
fn undecodable_image_still_goes_to_ocr() {
    let ocr = StubOcr::new(OcrReply::Lines);
    let d = dispatcher(no_pdf(), &ocr);

    assert_eq!(d.extract("photo.jpeg", b"\x00\x01"), "OCR line one\nOCR line two");
    assert_eq!(ocr.calls().len(), 1);
}

// ---------------------------------------------------------------------------
// OCR failures are absorbed
// ---------------------------------------------------------------------------
#[test]
fn ocr_service_error_returns_empty_string() {
    let ocr = StubOcr::new(OcrReply::ServiceError);
    let d = dispatcher(no_pdf(), &ocr);

    let outcome = d.extract_with_source("scan.png", b"not really a png");

    assert_eq!(outcome.text, "");
    assert_eq!(outcome.source, ExtractionSource::Failed);
}

#[test]
fn unexpected_ocr_error_returns_empty_string() {
    let ocr = StubOcr::new(OcrReply::TransportError);
    let d = dispatcher(
        MockPdf {
            pages: Ok(vec!["   "]),
        },
        &ocr,
    );

    assert_eq!(d.extract("scan.pdf", b"%PDF"), "");
    assert_eq!(ocr.calls().len(), 1);
}

// ---------------------------------------------------------------------------
// Repeated calls are independent
// ---------------------------------------------------------------------------
#[test]
fn repeated_calls_give_identical_results() {
    let ocr = StubOcr::new(OcrReply::Lines);
    let d = dispatcher(
        MockPdf {
            pages: Ok(vec!["same text"]),
        },
        &ocr,
    );

    for (name, bytes) in [
        ("a.pdf", b"%PDF".to_vec()),
        ("b.bin", b"blob".to_vec()),
        ("c.csv", b"x\n1\n".to_vec()),
    ] {
        let first = d.extract(name, &bytes);
        let second = d.extract(name, &bytes);
        assert_eq!(first, second);
    }
    assert_eq!(ocr.calls().len(), 2);
}

#[test]
fn default_chain_is_shareable_across_threads() {
    let ocr = StubOcr::new(OcrReply::Lines);
    let d = Arc::new(Dispatcher::new(ocr.clone()));

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let d = Arc::clone(&d);
            std::thread::spawn(move || d.extract(&format!("file{i}.dat"), b"bytes"))
        })
        .collect();

    for h in handles {
        assert_eq!(h.join().unwrap(), "OCR line one\nOCR line two");
    }
    assert_eq!(ocr.calls().len(), 4);
}
