use std::path::PathBuf;

use timeverify_core::config::OcrConfig;
use timeverify_core::error::TimeVerifyError;
use timeverify_core::extraction::SourceDocument;

use super::PipelineArgs;
use crate::output;

pub fn run(
    input_file: PathBuf,
    name: Option<String>,
    args: &PipelineArgs,
    ocr_config: OcrConfig,
    verbose: bool,
) -> Result<(), TimeVerifyError> {
    let reference = super::load_reference_table(args.reference.as_deref())?;
    let engine = super::ocr_engine(ocr_config, args.multi_pass)?;
    let doc = SourceDocument::from_path(&input_file)?;

    let result = timeverify_core::process_document(
        &doc,
        name.as_deref(),
        &engine,
        &reference,
        &args.process_options(),
    )?;

    if let Some(path) = &args.csv {
        super::write_csv(path, &result.entries)?;
    }

    match args.output.as_str() {
        "json" => output::json::print(&result)?,
        _ => output::table::print_document(&result, verbose),
    }

    Ok(())
}
