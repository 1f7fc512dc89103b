#[derive(Debug, thiserror::Error)]
pub enum DocTextError {
    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("pdftotext not found. Install poppler: brew install poppler (macOS) or apt install poppler-utils (Linux)")]
    PdftotextNotFound,

    #[error("pdftotext failed with exit code {code}: {stderr}")]
    PdftotextFailed { code: i32, stderr: String },

    #[error("DOCX extraction failed: {0}")]
    Docx(String),

    #[error("spreadsheet extraction failed: {0}")]
    Spreadsheet(String),

    #[error("image could not be decoded: {0}")]
    Image(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
