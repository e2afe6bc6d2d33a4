use std::borrow::Cow;
use std::ffi::OsString;
use std::path::Path;
use std::process::Command;

use image::{DynamicImage, ImageFormat};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::config::{OcrConfig, OcrPass};
use crate::error::TimeVerifyError;
use crate::extraction::OcrEngine;

/// OCR backend that shells out to the `tesseract` command-line tool.
pub struct TesseractEngine {
    config: OcrConfig,
}

impl TesseractEngine {
    pub fn new(config: OcrConfig) -> Self {
        TesseractEngine { config }
    }

    pub fn config(&self) -> &OcrConfig {
        &self.config
    }

    /// Check if the configured tesseract executable can be started.
    pub fn is_available(&self) -> bool {
        Command::new(&self.config.command)
            .arg("--version")
            .output()
            .map(|o| o.status.success() || !o.stdout.is_empty())
            .unwrap_or(false)
    }

    fn command_args(&self, image_path: &Path, pass: &OcrPass) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            image_path.into(),
            "stdout".into(),
            "--oem".into(),
            self.config.oem.to_string().into(),
            "--psm".into(),
            pass.psm.to_string().into(),
            "-l".into(),
            self.config.language.clone().into(),
        ];
        if self.config.preserve_interword_spaces {
            args.push("-c".into());
            args.push("preserve_interword_spaces=1".into());
        }
        args
    }

    fn run_pass(&self, image: &DynamicImage, pass: &OcrPass) -> Result<String, TimeVerifyError> {
        let prepared = match pass.contrast {
            Some(contrast) => Cow::Owned(image.adjust_contrast(contrast)),
            None => Cow::Borrowed(image),
        };

        let mut tmpfile = tempfile::Builder::new()
            .prefix("timeverify-")
            .suffix(".png")
            .tempfile()?;
        write_png(&prepared, &mut tmpfile)?;

        let output = Command::new(&self.config.command)
            .args(self.command_args(tmpfile.path(), pass))
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    TimeVerifyError::TesseractNotFound {
                        command: self.config.command.display().to_string(),
                    }
                } else {
                    TimeVerifyError::Ocr(format!("tesseract failed to start: {e}"))
                }
            })?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            return Err(TimeVerifyError::TesseractFailed { code, stderr });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for TesseractEngine {
    fn default() -> Self {
        Self::new(OcrConfig::default())
    }
}

impl OcrEngine for TesseractEngine {
    fn recognize(&self, image: &DynamicImage) -> Result<String, TimeVerifyError> {
        let mut texts = Vec::new();
        let mut last_error = None;

        for pass in self.config.passes() {
            match self.run_pass(image, &pass) {
                Ok(text) => {
                    debug!(psm = pass.psm, chars = text.len(), "ocr pass complete");
                    texts.push(text);
                }
                Err(e @ TimeVerifyError::TesseractNotFound { .. }) => return Err(e),
                Err(e) => {
                    warn!(psm = pass.psm, error = %e, "ocr pass failed");
                    last_error = Some(e);
                }
            }
        }

        match (texts.is_empty(), last_error) {
            (true, Some(e)) => Err(e),
            _ => Ok(texts.join("\n")),
        }
    }

    fn backend_name(&self) -> &str {
        "tesseract"
    }
}

fn write_png(image: &DynamicImage, file: &mut NamedTempFile) -> Result<(), TimeVerifyError> {
    image
        .write_to(file, ImageFormat::Png)
        .map_err(|e| TimeVerifyError::Ocr(format!("failed to stage image for tesseract: {e}")))
}
