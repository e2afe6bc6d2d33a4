use std::path::PathBuf;

/// Contrast boost for the enhanced OCR pass. `adjust_contrast(40.0)` roughly
/// doubles contrast.
pub const ENHANCED_CONTRAST: f32 = 40.0;

/// Settings handed to the tesseract backend at construction time.
#[derive(Debug, Clone, PartialEq)]
pub struct OcrConfig {
    /// Executable to run; a bare name is resolved through `PATH`.
    pub command: PathBuf,
    pub language: String,
    /// OCR engine mode (`--oem`).
    pub oem: u8,
    /// Page segmentation mode (`--psm`) of the primary pass.
    pub psm: u8,
    pub preserve_interword_spaces: bool,
    /// Passes run after the primary one; their text is appended.
    pub extra_passes: Vec<OcrPass>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OcrPass {
    pub psm: u8,
    /// Contrast adjustment applied to the image before this pass.
    pub contrast: Option<f32>,
}

impl Default for OcrConfig {
    fn default() -> Self {
        OcrConfig {
            command: PathBuf::from("tesseract"),
            language: "eng".into(),
            oem: 3,
            psm: 6,
            preserve_interword_spaces: true,
            extra_passes: Vec::new(),
        }
    }
}

impl OcrConfig {
    /// Add a contrast-enhanced pass and a column-layout (`--psm 4`) pass.
    ///
    /// Each pass reads the whole image, so a line recognized by several
    /// passes yields several entries.
    pub fn multi_pass(mut self) -> Self {
        self.extra_passes = vec![
            OcrPass {
                psm: self.psm,
                contrast: Some(ENHANCED_CONTRAST),
            },
            OcrPass {
                psm: 4,
                contrast: None,
            },
        ];
        self
    }

    /// Every pass to run, primary first.
    pub fn passes(&self) -> Vec<OcrPass> {
        let mut passes = vec![OcrPass {
            psm: self.psm,
            contrast: None,
        }];
        passes.extend(self.extra_passes.iter().copied());
        passes
    }
}

/// Caller-side limits for document processing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOptions {
    /// Maximum images OCR'd per document; the rest are skipped.
    pub max_images: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_single_pass() {
        let config = OcrConfig::default();
        assert_eq!(config.passes().len(), 1);
        assert_eq!(config.passes()[0].psm, 6);
    }

    #[test]
    fn test_multi_pass() {
        let passes = OcrConfig::default().multi_pass().passes();
        assert_eq!(passes.len(), 3);
        assert_eq!(passes[1].contrast, Some(ENHANCED_CONTRAST));
        assert_eq!(passes[2].psm, 4);
    }
}
