//! Plain-text extraction from uploaded documents.
//!
//! [`Dispatcher`] picks a local extractor by file extension (PDF, DOCX,
//! CSV/XLSX) and falls back to a remote OCR service when local extraction
//! fails or yields no text.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod extraction;
pub mod format;
pub mod ocr;

pub use dispatch::{Dispatcher, ExtractionOutcome, ExtractionSource};
pub use format::FileFormat;
