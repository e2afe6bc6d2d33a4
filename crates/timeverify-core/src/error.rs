use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum TimeVerifyError {
    #[error("invalid document '{filename}': {reason}")]
    InvalidDocument { filename: String, reason: String },

    #[error("unsupported document '{0}'. Expected a .docx file or an image (png, jpg, tiff, bmp, gif, webp)")]
    UnsupportedDocument(String),

    #[error("no documents supplied")]
    NoDocuments,

    #[error("failed to decode image: {0}")]
    ImageDecode(String),

    #[error("tesseract not found at '{command}'. Install it: brew install tesseract (macOS) or apt install tesseract-ocr (Linux)")]
    TesseractNotFound { command: String },

    #[error("tesseract failed with exit code {code}: {stderr}")]
    TesseractFailed { code: i32, stderr: String },

    #[error("OCR failed: {0}")]
    Ocr(String),

    #[error("failed to load reference table from {path}: {reason}")]
    ReferenceLoad { path: PathBuf, reason: String },

    #[error("invalid reference table: {0}")]
    ReferenceInvalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
