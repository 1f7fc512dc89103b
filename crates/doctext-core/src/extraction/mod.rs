pub mod docx;
pub mod image;
pub mod pdf;
pub mod pdftotext;
pub mod spreadsheet;
pub mod table;

use crate::error::DocTextError;
use crate::format::FileFormat;

/// Text extracted from a single page of a PDF.
#[derive(Debug, Clone, Default)]
pub struct PageContent {
    pub page_number: usize,
    pub text: String,
}

/// Trait for PDF text extraction backends.
pub trait PdfExtractor: Send + Sync {
    /// Extract text content from PDF bytes, returning one PageContent per page.
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<PageContent>, DocTextError>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

/// A local, in-process extractor for one or more file formats.
///
/// Implementations return whatever text they find, untrimmed. Deciding
/// whether that text counts as a result is the dispatcher's job.
pub trait TextExtractor: Send + Sync {
    /// Short method name used in logs and in `ExtractionSource::Local`.
    fn name(&self) -> &'static str;

    fn handles(&self, format: FileFormat) -> bool;

    fn extract(&self, content: &[u8], format: FileFormat) -> Result<String, DocTextError>;
}

/// The default local chain: PDF, DOCX, then CSV/XLSX.
pub fn default_extractors() -> Vec<Box<dyn TextExtractor>> {
    vec![
        Box::new(pdf::PdfText::new(pdftotext::PdftotextExtractor::new())),
        Box::new(docx::DocxText),
        Box::new(spreadsheet::SpreadsheetText),
    ]
}
