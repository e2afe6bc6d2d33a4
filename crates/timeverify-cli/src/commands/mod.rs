pub mod batch;
pub mod parse;
pub mod process;
pub mod reconcile;
pub mod reference;

use clap::Args;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::debug;

use timeverify_core::config::{OcrConfig, ProcessOptions};
use timeverify_core::error::TimeVerifyError;
use timeverify_core::extraction::tesseract::TesseractEngine;
use timeverify_core::model::TimesheetEntry;
use timeverify_core::reference::{builtin, load_reference, ReferenceTable};

/// Options shared by the commands that run OCR.
#[derive(Args)]
pub struct PipelineArgs {
    /// Output format: table (default) or json
    #[arg(short, long, default_value = "table")]
    pub output: String,

    /// Also write the extracted entries to a CSV file
    #[arg(long, value_name = "FILE")]
    pub csv: Option<PathBuf>,

    /// Reference table (JSON or XLSX); the built-in demo table if omitted
    #[arg(short, long, value_name = "FILE")]
    pub reference: Option<PathBuf>,

    /// Run extra OCR passes (contrast-enhanced and column layout)
    #[arg(long)]
    pub multi_pass: bool,

    /// OCR at most this many images per document
    #[arg(long, value_name = "N")]
    pub max_images: Option<usize>,
}

impl PipelineArgs {
    pub fn process_options(&self) -> ProcessOptions {
        ProcessOptions {
            max_images: self.max_images,
        }
    }
}

pub fn load_reference_table(path: Option<&Path>) -> Result<ReferenceTable, TimeVerifyError> {
    match path {
        Some(path) => load_reference(path),
        None => builtin::load_preset("demo"),
    }
}

/// Build the tesseract backend, failing early when it is not installed.
pub fn ocr_engine(config: OcrConfig, multi_pass: bool) -> Result<TesseractEngine, TimeVerifyError> {
    let config = if multi_pass { config.multi_pass() } else { config };
    let engine = TesseractEngine::new(config);
    if !engine.is_available() {
        return Err(TimeVerifyError::TesseractNotFound {
            command: engine.config().command.display().to_string(),
        });
    }
    debug!(
        command = %engine.config().command.display(),
        language = %engine.config().language,
        passes = engine.config().passes().len(),
        "ocr engine ready"
    );
    Ok(engine)
}

pub fn write_csv(path: &Path, entries: &[TimesheetEntry]) -> Result<(), TimeVerifyError> {
    let file = File::create(path)?;
    timeverify_core::export::write_csv(BufWriter::new(file), entries)?;
    eprintln!("Wrote {} entries to {}", entries.len(), path.display());
    Ok(())
}
