//! Remote OCR used as the last stage of the extraction chain.
//!
//! The dispatcher only needs document-text detection: raw bytes in, a list
//! of typed blocks out. [`textract::TextractClient`] is the production
//! implementation; tests substitute their own [`OcrService`].

pub mod sigv4;
pub mod textract;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from an OCR service.
#[derive(Debug, Error)]
pub enum OcrError {
    /// The service understood the request and refused it (bad credentials,
    /// throttling, unsupported document, malformed request).
    #[error("{code}: {message}")]
    Service { code: String, message: String },

    #[error("request failed: {0}")]
    Transport(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl OcrError {
    pub fn is_service_error(&self) -> bool {
        matches!(self, OcrError::Service { .. })
    }
}

/// Block type tag as reported by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BlockType {
    Page,
    Line,
    Word,
    Other(String),
}

impl From<String> for BlockType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "PAGE" => BlockType::Page,
            "LINE" => BlockType::Line,
            "WORD" => BlockType::Word,
            _ => BlockType::Other(s),
        }
    }
}

impl From<BlockType> for String {
    fn from(t: BlockType) -> Self {
        match t {
            BlockType::Page => "PAGE".into(),
            BlockType::Line => "LINE".into(),
            BlockType::Word => "WORD".into(),
            BlockType::Other(s) => s,
        }
    }
}

/// One unit of detected content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    #[serde(rename = "BlockType")]
    pub block_type: BlockType,
    #[serde(rename = "Text", default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Block {
    pub fn line(text: impl Into<String>) -> Self {
        Block {
            block_type: BlockType::Line,
            text: Some(text.into()),
        }
    }

    pub fn new(block_type: BlockType, text: Option<String>) -> Self {
        Block { block_type, text }
    }
}

/// Trait for document OCR services.
pub trait OcrService: Send + Sync {
    /// Detect text in a document (image or single-page PDF bytes).
    fn detect_document_text(&self, document: &[u8]) -> Result<Vec<Block>, OcrError>;

    /// Name of the service (for diagnostics).
    fn service_name(&self) -> &str;
}

/// Join the text of line-level blocks with newlines, in response order.
pub fn join_lines(blocks: &[Block]) -> String {
    blocks
        .iter()
        .filter(|b| b.block_type == BlockType::Line)
        .filter_map(|b| b.text.as_deref())
        .collect::<Vec<_>>()
        .join("\n")
}
