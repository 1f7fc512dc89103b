use crate::error::DocTextError;
use crate::extraction::{PdfExtractor, TextExtractor};
use crate::format::FileFormat;

/// Adapts a page-oriented [`PdfExtractor`] backend to the local chain.
///
/// Page texts are concatenated in page order with no separator. Pages
/// without text contribute nothing.
pub struct PdfText {
    backend: Box<dyn PdfExtractor>,
}

impl PdfText {
    pub fn new<P: PdfExtractor + 'static>(backend: P) -> Self {
        PdfText {
            backend: Box::new(backend),
        }
    }

    pub fn backend_name(&self) -> &str {
        self.backend.backend_name()
    }
}

impl TextExtractor for PdfText {
    fn name(&self) -> &'static str {
        "pdf"
    }

    fn handles(&self, format: FileFormat) -> bool {
        format == FileFormat::Pdf
    }

    fn extract(&self, content: &[u8], _format: FileFormat) -> Result<String, DocTextError> {
        let pages = self.backend.extract_pages(content)?;
        tracing::debug!(
            backend = self.backend.backend_name(),
            pages = pages.len(),
            "extracted PDF pages"
        );
        Ok(pages.iter().map(|p| p.text.as_str()).collect())
    }
}
