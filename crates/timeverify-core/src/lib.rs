pub mod config;
pub mod error;
pub mod export;
pub mod extraction;
pub mod model;
pub mod parsing;
pub mod reconcile;
pub mod reference;
pub mod trace;

use std::path::Path;
use tracing::{info, warn};

use config::ProcessOptions;
use error::TimeVerifyError;
use extraction::{OcrEngine, SourceDocument};
use parsing::name::name_from_filename;
use parsing::ParsedText;
use reconcile::{BatchResult, DocumentResult, DocumentStatus, ImageResult, ReconciliationSummary};
use reference::ReferenceHours;

/// Characters of OCR text kept in each image result.
const RAW_TEXT_SAMPLE_CHARS: usize = 200;

/// Parse already-recognized text and reconcile it for one employee.
pub fn process_text(
    text: &str,
    employee_name: &str,
    reference: &dyn ReferenceHours,
) -> (ParsedText, ReconciliationSummary) {
    let parsed = parsing::parse_text(text, employee_name);
    let summary = reconcile::reconcile(employee_name, &parsed.entries, reference);
    (parsed, summary)
}

/// OCR and parse a single image.
///
/// Never fails: an undecodable image is reported as skipped, and an OCR
/// failure is treated as empty text.
pub fn process_image(
    image_bytes: &[u8],
    image_number: usize,
    employee_name: &str,
    ocr: &dyn OcrEngine,
) -> (ImageResult, ParsedText) {
    let mut result = ImageResult {
        image_number,
        text_extracted: false,
        entries_found: 0,
        raw_text_sample: String::new(),
        skipped: None,
    };

    let image = match extraction::decode_image(image_bytes) {
        Ok(image) => image,
        Err(e) => {
            warn!(image = image_number, error = %e, "skipping unreadable image");
            result.skipped = Some(e.to_string());
            return (result, ParsedText::default());
        }
    };

    let text = ocr.recognize(&image).unwrap_or_else(|e| {
        warn!(
            image = image_number,
            backend = ocr.backend_name(),
            error = %e,
            "ocr failed, treating image as empty"
        );
        String::new()
    });

    let mut parsed = parsing::parse_text(&text, employee_name);
    for trace in &mut parsed.trace.entries {
        trace.image_number = Some(image_number);
    }

    result.text_extracted = !text.trim().is_empty();
    result.entries_found = parsed.entries.len();
    result.raw_text_sample = text_sample(&text);
    (result, parsed)
}

/// Main API entry point: extract, OCR, parse and reconcile one document.
///
/// The employee name comes from `name_override` when given, otherwise from
/// the file name. A document without images is `Ok` with status `NoImages`.
pub fn process_document(
    doc: &SourceDocument,
    name_override: Option<&str>,
    ocr: &dyn OcrEngine,
    reference: &dyn ReferenceHours,
    options: &ProcessOptions,
) -> Result<DocumentResult, TimeVerifyError> {
    let employee_name = name_override
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| name_from_filename(&doc.filename));

    let images = extraction::extract_images(doc)?;
    info!(
        filename = %doc.filename,
        employee = %employee_name,
        images = images.len(),
        "processing document"
    );

    if images.is_empty() {
        warn!(filename = %doc.filename, "no images found in document");
        return Ok(DocumentResult::empty(
            &doc.filename,
            &employee_name,
            DocumentStatus::NoImages,
        ));
    }

    let mut result = DocumentResult::empty(&doc.filename, &employee_name, DocumentStatus::Processed);

    for (idx, image) in images.iter().enumerate() {
        let image_number = idx + 1;

        if options.max_images.is_some_and(|max| idx >= max) {
            warn!(filename = %doc.filename, image = image_number, "image limit reached, skipping");
            result.image_results.push(ImageResult {
                image_number,
                text_extracted: false,
                entries_found: 0,
                raw_text_sample: String::new(),
                skipped: Some("image limit reached".into()),
            });
            continue;
        }

        let (image_result, parsed) = process_image(&image.bytes, image_number, &employee_name, ocr);
        if image_result.skipped.is_none() {
            result.images_processed += 1;
        }
        result.entries.extend(parsed.entries);
        result.trace.entries.extend(parsed.trace.entries);
        result.image_results.push(image_result);
    }

    let summary = reconcile::reconcile(&employee_name, &result.entries, reference);
    info!(
        filename = %doc.filename,
        entries = result.entries.len(),
        reported = %summary.reported_hours,
        reference = %summary.reference_hours,
        discrepancy = summary.discrepancy,
        "document reconciled"
    );
    result.reconciliation = Some(summary);

    Ok(result)
}

/// Process several documents independently and roll up the totals.
///
/// A failing document is recorded with status `Failed` and does not stop
/// the others. Entries are tagged with their source file name.
pub fn process_batch(
    docs: &[SourceDocument],
    ocr: &dyn OcrEngine,
    reference: &dyn ReferenceHours,
    options: &ProcessOptions,
) -> Result<BatchResult, TimeVerifyError> {
    if docs.is_empty() {
        return Err(TimeVerifyError::NoDocuments);
    }

    let documents = docs
        .iter()
        .map(|doc| batch_document(doc, ocr, reference, options))
        .collect();
    Ok(finish_batch(documents))
}

/// Like [`process_batch`], reading each document from disk.
///
/// A path that cannot be read becomes a `Failed` document; the remaining
/// paths are still processed. Files are read one at a time.
pub fn process_batch_paths<P: AsRef<Path>>(
    paths: &[P],
    ocr: &dyn OcrEngine,
    reference: &dyn ReferenceHours,
    options: &ProcessOptions,
) -> Result<BatchResult, TimeVerifyError> {
    if paths.is_empty() {
        return Err(TimeVerifyError::NoDocuments);
    }

    let documents = paths
        .iter()
        .map(|path| {
            let path = path.as_ref();
            match SourceDocument::from_path(path) {
                Ok(doc) => batch_document(&doc, ocr, reference, options),
                Err(e) => failed_document(&extraction::document_name(path), e),
            }
        })
        .collect();
    Ok(finish_batch(documents))
}

fn batch_document(
    doc: &SourceDocument,
    ocr: &dyn OcrEngine,
    reference: &dyn ReferenceHours,
    options: &ProcessOptions,
) -> DocumentResult {
    let mut result = match process_document(doc, None, ocr, reference, options) {
        Ok(result) => result,
        Err(e) => return failed_document(&doc.filename, e),
    };
    for entry in &mut result.entries {
        entry.source = Some(doc.filename.clone());
    }
    result
}

fn failed_document(filename: &str, error: TimeVerifyError) -> DocumentResult {
    warn!(filename, error = %error, "document failed");
    DocumentResult::empty(
        filename,
        &name_from_filename(filename),
        DocumentStatus::Failed {
            error: error.to_string(),
        },
    )
}

fn finish_batch(documents: Vec<DocumentResult>) -> BatchResult {
    let entries = documents
        .iter()
        .filter(|d| d.status.is_processed())
        .flat_map(|d| d.entries.iter().cloned())
        .collect();

    let summary = reconcile::summarize(&documents);
    info!(
        documents = summary.total_documents,
        successful = summary.successful_documents,
        entries = summary.total_entries,
        discrepancies = summary.discrepancies_found,
        "batch complete"
    );

    BatchResult {
        summary,
        documents,
        entries,
        processed_at: chrono::Utc::now(),
    }
}

fn text_sample(text: &str) -> String {
    let mut chars = text.chars();
    let sample: String = chars.by_ref().take(RAW_TEXT_SAMPLE_CHARS).collect();
    if chars.next().is_some() {
        format!("{sample}...")
    } else {
        sample
    }
}
