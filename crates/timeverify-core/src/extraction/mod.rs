pub mod docx;
pub mod tesseract;

use image::DynamicImage;
use std::path::Path;

use crate::error::TimeVerifyError;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tif", "tiff", "bmp", "gif", "webp"];

/// An uploaded file: a Word document or a single screenshot.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub filename: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Docx,
    Image,
}

impl SourceDocument {
    pub fn new(filename: &str, bytes: Vec<u8>) -> Self {
        SourceDocument {
            filename: filename.to_string(),
            bytes,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, TimeVerifyError> {
        let bytes = std::fs::read(path)?;
        Ok(SourceDocument {
            filename: document_name(path),
            bytes,
        })
    }

    /// Detect the document kind from the extension, then from the content.
    pub fn kind(&self) -> Option<DocumentKind> {
        let ext = Path::new(&self.filename)
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase());

        match ext.as_deref() {
            Some("docx") => return Some(DocumentKind::Docx),
            Some(e) if IMAGE_EXTENSIONS.contains(&e) => return Some(DocumentKind::Image),
            _ => {}
        }

        if self.bytes.starts_with(b"PK\x03\x04") {
            Some(DocumentKind::Docx)
        } else if image::guess_format(&self.bytes).is_ok() {
            Some(DocumentKind::Image)
        } else {
            None
        }
    }
}

/// File name used to label a document read from `path`.
pub fn document_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Raw bytes of one image found in a document.
#[derive(Debug, Clone)]
pub struct EmbeddedImage {
    /// Archive part (`word/media/image1.png`) or the file name for standalone images.
    pub part_name: String,
    pub bytes: Vec<u8>,
}

/// Pull every raster image out of a document, in document order.
pub fn extract_images(doc: &SourceDocument) -> Result<Vec<EmbeddedImage>, TimeVerifyError> {
    match doc.kind() {
        Some(DocumentKind::Docx) => docx::extract_docx_images(&doc.filename, &doc.bytes),
        Some(DocumentKind::Image) => Ok(vec![EmbeddedImage {
            part_name: doc.filename.clone(),
            bytes: doc.bytes.clone(),
        }]),
        None => Err(TimeVerifyError::UnsupportedDocument(doc.filename.clone())),
    }
}

/// Decode image bytes into RGB, the form handed to OCR.
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage, TimeVerifyError> {
    let image =
        image::load_from_memory(bytes).map_err(|e| TimeVerifyError::ImageDecode(e.to_string()))?;
    Ok(DynamicImage::ImageRgb8(image.to_rgb8()))
}

/// Trait for OCR backends.
pub trait OcrEngine: Send + Sync {
    /// Recognize the text in one image. Empty output is a valid result.
    fn recognize(&self, image: &DynamicImage) -> Result<String, TimeVerifyError>;

    /// Name of this OCR backend (for diagnostics).
    fn backend_name(&self) -> &str;
}
