use std::fmt;

/// File families the dispatcher knows how to handle locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileFormat {
    Pdf,
    Docx,
    Csv,
    Xlsx,
    Image,
    Unknown,
}

impl FileFormat {
    /// Classify a file name or path by its lowercased suffix.
    pub fn from_identifier(identifier: &str) -> Self {
        let lower = identifier.to_lowercase();
        if lower.ends_with(".pdf") {
            FileFormat::Pdf
        } else if lower.ends_with(".docx") {
            FileFormat::Docx
        } else if lower.ends_with(".csv") {
            FileFormat::Csv
        } else if lower.ends_with(".xlsx") {
            FileFormat::Xlsx
        } else if [".png", ".jpg", ".jpeg"]
            .iter()
            .any(|ext| lower.ends_with(ext))
        {
            FileFormat::Image
        } else {
            FileFormat::Unknown
        }
    }

    pub fn is_spreadsheet(&self) -> bool {
        matches!(self, FileFormat::Csv | FileFormat::Xlsx)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileFormat::Pdf => "pdf",
            FileFormat::Docx => "docx",
            FileFormat::Csv => "csv",
            FileFormat::Xlsx => "xlsx",
            FileFormat::Image => "image",
            FileFormat::Unknown => "unknown",
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
