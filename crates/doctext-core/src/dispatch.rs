use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::config::OcrConfig;
use crate::error::DocTextError;
use crate::extraction::{self, image::check_image, TextExtractor};
use crate::format::FileFormat;
use crate::ocr::textract::TextractClient;
use crate::ocr::{join_lines, OcrService};

/// Which stage produced the returned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "method", rename_all = "snake_case")]
pub enum ExtractionSource {
    /// A local extractor, by name.
    Local(&'static str),
    /// The OCR service answered (its text may still be empty).
    Ocr,
    /// Every stage failed; the text is empty.
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionOutcome {
    pub text: String,
    pub source: ExtractionSource,
}

/// Extracts text from an uploaded file of unknown format.
///
/// Local extractors are tried first for the format implied by the file
/// name. When none of them yields non-blank text the raw bytes go to the
/// OCR service. No error ever leaves [`Dispatcher::extract`]: failures are
/// logged and surface only as an empty string.
pub struct Dispatcher {
    extractors: Vec<Box<dyn TextExtractor>>,
    ocr: Box<dyn OcrService>,
}

impl Dispatcher {
    /// Default local chain (PDF, DOCX, CSV/XLSX) in front of `ocr`.
    pub fn new<O: OcrService + 'static>(ocr: O) -> Self {
        Self::with_extractors(extraction::default_extractors(), Box::new(ocr))
    }

    pub fn with_extractors(
        extractors: Vec<Box<dyn TextExtractor>>,
        ocr: Box<dyn OcrService>,
    ) -> Self {
        Dispatcher { extractors, ocr }
    }

    /// Default chain backed by Textract, configured from the environment.
    pub fn from_env() -> Result<Self, DocTextError> {
        let config = OcrConfig::from_env()?;
        Ok(Self::new(TextractClient::new(&config)?))
    }

    /// Best-effort text for `content`; empty when nothing could be extracted.
    pub fn extract(&self, identifier: &str, content: &[u8]) -> String {
        self.extract_with_source(identifier, content).text
    }

    pub fn extract_with_source(&self, identifier: &str, content: &[u8]) -> ExtractionOutcome {
        let format = FileFormat::from_identifier(identifier);
        debug!(identifier, %format, bytes = content.len(), "extracting text");

        if let Some(outcome) = self.try_local(format, content) {
            return outcome;
        }

        if format == FileFormat::Image {
            match check_image(content) {
                Ok(img) => info!(
                    width = img.width,
                    height = img.height,
                    "image opened successfully, sending to OCR"
                ),
                Err(e) => warn!("image could not be opened: {e}. Falling back to OCR"),
            }
        }

        self.run_ocr(content)
    }

    fn try_local(&self, format: FileFormat, content: &[u8]) -> Option<ExtractionOutcome> {
        for extractor in self.extractors.iter().filter(|x| x.handles(format)) {
            match extractor.extract(content, format) {
                Ok(text) => {
                    let trimmed = text.trim();
                    if !trimmed.is_empty() {
                        info!(method = extractor.name(), "extracted text locally");
                        return Some(ExtractionOutcome {
                            text: trimmed.to_string(),
                            source: ExtractionSource::Local(extractor.name()),
                        });
                    }
                    debug!(method = extractor.name(), "no text found locally");
                }
                Err(e) => warn!(
                    method = extractor.name(),
                    "{} extraction failed: {e}. Falling back to OCR",
                    format
                ),
            }
        }
        None
    }

    fn run_ocr(&self, content: &[u8]) -> ExtractionOutcome {
        info!(service = self.ocr.service_name(), "using OCR for text extraction");
        match self.ocr.detect_document_text(content) {
            Ok(blocks) => ExtractionOutcome {
                text: join_lines(&blocks),
                source: ExtractionSource::Ocr,
            },
            Err(e) => {
                if e.is_service_error() {
                    error!(service = self.ocr.service_name(), "OCR service error: {e}");
                } else {
                    error!(service = self.ocr.service_name(), "unexpected OCR error: {e}");
                }
                ExtractionOutcome {
                    text: String::new(),
                    source: ExtractionSource::Failed,
                }
            }
        }
    }
}
