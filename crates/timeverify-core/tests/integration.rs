//! Integration tests for the document pipeline end to end.
//!
//! Uses a MockOcr that returns canned text keyed by image width, so these
//! tests run without tesseract. Documents are built in memory.

use std::collections::HashMap;
use std::io::{Cursor, Write};

use image::{DynamicImage, ImageFormat, RgbImage};
use rust_decimal_macros::dec;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use timeverify_core::config::ProcessOptions;
use timeverify_core::error::TimeVerifyError;
use timeverify_core::export::to_csv_string;
use timeverify_core::extraction::{OcrEngine, SourceDocument};
use timeverify_core::model::Hours;
use timeverify_core::reconcile::DocumentStatus;
use timeverify_core::reference::builtin::demo_table;
use timeverify_core::{process_batch, process_batch_paths, process_document};

/// Width that makes the mock fail, to exercise OCR error handling.
const FAILING_WIDTH: u32 = 99;

struct MockOcr {
    texts: HashMap<u32, String>,
}

impl MockOcr {
    fn new(texts: &[(u32, &str)]) -> Self {
        MockOcr {
            texts: texts.iter().map(|(w, t)| (*w, t.to_string())).collect(),
        }
    }
}

impl OcrEngine for MockOcr {
    fn recognize(&self, image: &DynamicImage) -> Result<String, TimeVerifyError> {
        if image.width() == FAILING_WIDTH {
            return Err(TimeVerifyError::Ocr("mock failure".into()));
        }
        Ok(self.texts.get(&image.width()).cloned().unwrap_or_default())
    }

    fn backend_name(&self) -> &str {
        "mock"
    }
}

fn png(width: u32) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(RgbImage::new(width, 1))
        .write_to(&mut buf, ImageFormat::Png)
        .unwrap();
    buf.into_inner()
}

/// A minimal .docx whose relationships point at the given media files.
fn docx(media: &[Vec<u8>]) -> Vec<u8> {
    let mut rels = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    for i in 0..media.len() {
        rels.push_str(&format!(
            r#"<Relationship Id="rId{n}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="media/image{n}.png"/>"#,
            n = i + 1
        ));
    }
    rels.push_str("</Relationships>");

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    zip.start_file("word/document.xml", options).unwrap();
    zip.write_all(b"<w:document/>").unwrap();
    zip.start_file("word/_rels/document.xml.rels", options).unwrap();
    zip.write_all(rels.as_bytes()).unwrap();
    for (i, bytes) in media.iter().enumerate() {
        zip.start_file(format!("word/media/image{}.png", i + 1), options)
            .unwrap();
        zip.write_all(bytes).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

fn mock() -> MockOcr {
    MockOcr::new(&[
        (1, "Timesheet\nMon 3/4/2024 8h\nTue 3/5/2024 8h"),
        (2, "Wed 3/6/2024 8h\nThu 3/7/2024 8h\nFri 3/8/2024 6h\nTotal 38"),
        (3, "Monday 3/4/2024 Installation 8h\nTuesday 3/5/2024 ???"),
        (5, "3-11-2024 7.5 hrs\n3-12-2024 (9)"),
    ])
}

// ---------------------------------------------------------------------------
// Batch: two documents with images, one without any
// ---------------------------------------------------------------------------
#[test]
fn batch_with_empty_document() {
    let docs = vec![
        SourceDocument::new("john_smith-2024.docx", docx(&[png(1), png(2)])),
        SourceDocument::new("jane_doe.docx", docx(&[png(3)])),
        SourceDocument::new("empty.docx", docx(&[])),
    ];

    let result = process_batch(&docs, &mock(), &demo_table(), &ProcessOptions::default()).unwrap();

    assert_eq!(result.summary.total_documents, 3);
    assert_eq!(result.summary.successful_documents, 2);
    assert_eq!(result.summary.total_images, 3);
    assert_eq!(result.summary.total_entries, 7);
    assert_eq!(result.summary.discrepancies_found, 1);

    let john = &result.documents[0];
    assert_eq!(john.employee_name, "john smith");
    assert_eq!(john.status, DocumentStatus::Processed);
    let summary = john.reconciliation.as_ref().unwrap();
    assert_eq!(summary.reported_hours, dec!(38));
    assert_eq!(summary.reference_hours, dec!(38));
    assert!(!summary.discrepancy);

    let jane = &result.documents[1];
    let summary = jane.reconciliation.as_ref().unwrap();
    assert_eq!(summary.reported_hours, dec!(8));
    assert_eq!(summary.needs_review, 1);
    assert!(summary.discrepancy);
    assert_eq!(jane.entries[1].hours, Hours::NeedsReview);

    let empty = &result.documents[2];
    assert_eq!(empty.status, DocumentStatus::NoImages);
    assert!(empty.reconciliation.is_none());
    assert!(empty.entries.is_empty());
}

#[test]
fn batch_entries_tagged_with_source() {
    let docs = vec![
        SourceDocument::new("john_smith.docx", docx(&[png(1)])),
        SourceDocument::new("jane_doe.docx", docx(&[png(3)])),
    ];
    let result = process_batch(&docs, &mock(), &demo_table(), &ProcessOptions::default()).unwrap();

    let sources: Vec<&str> = result
        .entries
        .iter()
        .map(|e| e.source.as_deref().unwrap())
        .collect();
    assert_eq!(
        sources,
        vec!["john_smith.docx", "john_smith.docx", "jane_doe.docx", "jane_doe.docx"]
    );

    let csv = to_csv_string(&result.entries).unwrap();
    assert!(csv.contains("Name,Date,Hours,Source File"));
    assert!(csv.contains("jane doe,03/05/2024,CHECK,jane_doe.docx"));
}

// ---------------------------------------------------------------------------
// Failure isolation
// ---------------------------------------------------------------------------
#[test]
fn corrupt_document_does_not_abort_batch() {
    let docs = vec![
        SourceDocument::new("broken.docx", b"not a zip archive".to_vec()),
        SourceDocument::new("notes.txt", b"Mon 3/4/2024 8h".to_vec()),
        SourceDocument::new("john_smith.docx", docx(&[png(1)])),
    ];
    let result = process_batch(&docs, &mock(), &demo_table(), &ProcessOptions::default()).unwrap();

    assert!(matches!(
        result.documents[0].status,
        DocumentStatus::Failed { .. }
    ));
    assert!(matches!(
        result.documents[1].status,
        DocumentStatus::Failed { .. }
    ));
    assert_eq!(result.documents[2].status, DocumentStatus::Processed);
    assert_eq!(result.summary.total_documents, 3);
    assert_eq!(result.summary.successful_documents, 1);
    assert_eq!(result.summary.total_entries, 2);
}

#[test]
fn unreadable_path_does_not_abort_batch() {
    let dir = tempfile::tempdir().unwrap();
    let jane = dir.path().join("jane_doe.docx");
    std::fs::write(&jane, docx(&[png(3)])).unwrap();
    let paths = vec![dir.path().join("missing_john.docx"), jane];

    let result =
        process_batch_paths(&paths, &mock(), &demo_table(), &ProcessOptions::default()).unwrap();

    assert_eq!(result.documents.len(), 2);
    let missing = &result.documents[0];
    assert_eq!(missing.filename, "missing_john.docx");
    assert_eq!(missing.employee_name, "missing john");
    assert!(matches!(missing.status, DocumentStatus::Failed { .. }));

    assert_eq!(result.documents[1].status, DocumentStatus::Processed);
    assert_eq!(result.summary.total_documents, 2);
    assert_eq!(result.summary.successful_documents, 1);
    assert_eq!(result.summary.total_entries, 2);
    assert!(result
        .entries
        .iter()
        .all(|e| e.source.as_deref() == Some("jane_doe.docx")));
}

#[test]
fn empty_batch_is_reported() {
    let err = process_batch(&[], &mock(), &demo_table(), &ProcessOptions::default()).unwrap_err();
    assert!(matches!(err, TimeVerifyError::NoDocuments));
}

#[test]
fn unreadable_image_skipped() {
    let doc = SourceDocument::new(
        "john_smith.docx",
        docx(&[b"garbage bytes".to_vec(), png(2)]),
    );
    let result =
        process_document(&doc, None, &mock(), &demo_table(), &ProcessOptions::default()).unwrap();

    assert_eq!(result.status, DocumentStatus::Processed);
    assert_eq!(result.images_processed, 1);
    assert_eq!(result.image_results.len(), 2);
    assert!(result.image_results[0].skipped.is_some());
    assert_eq!(result.image_results[1].entries_found, 3);
    assert_eq!(result.entries.len(), 3);
}

#[test]
fn ocr_failure_yields_empty_text() {
    let doc = SourceDocument::new("mike_johnson.docx", docx(&[png(FAILING_WIDTH), png(1)]));
    let result =
        process_document(&doc, None, &mock(), &demo_table(), &ProcessOptions::default()).unwrap();

    assert_eq!(result.images_processed, 2);
    assert!(!result.image_results[0].text_extracted);
    assert_eq!(result.image_results[0].entries_found, 0);
    assert!(result.image_results[1].text_extracted);

    let summary = result.reconciliation.unwrap();
    assert_eq!(summary.reported_hours, dec!(16));
    assert_eq!(summary.reference_hours, dec!(35));
    assert!(summary.discrepancy);
}

// ---------------------------------------------------------------------------
// Single documents
// ---------------------------------------------------------------------------
#[test]
fn standalone_image_with_name_override() {
    let doc = SourceDocument::new("screenshot.png", png(5));
    let result = process_document(
        &doc,
        Some("Alex Chen"),
        &mock(),
        &demo_table(),
        &ProcessOptions::default(),
    )
    .unwrap();

    assert_eq!(result.employee_name, "Alex Chen");
    let dates: Vec<&str> = result.entries.iter().map(|e| e.date.as_str()).collect();
    assert_eq!(dates, vec!["03/11/2024", "03/12/2024"]);
    assert_eq!(result.entries[0].hours, Hours::Numeric(dec!(7.5)));
    assert_eq!(result.entries[1].hours, Hours::Numeric(dec!(9)));

    let summary = result.reconciliation.unwrap();
    assert_eq!(summary.reported_hours, dec!(16.5));
    assert_eq!(summary.reference_hours, dec!(38));
}

#[test]
fn blank_name_override_falls_back_to_filename() {
    let doc = SourceDocument::new("sarah_wilson.png", png(5));
    let result = process_document(
        &doc,
        Some("   "),
        &mock(),
        &demo_table(),
        &ProcessOptions::default(),
    )
    .unwrap();
    assert_eq!(result.employee_name, "sarah wilson");
    assert_eq!(
        result.reconciliation.unwrap().reference_hours,
        dec!(40)
    );
}

#[test]
fn max_images_caps_ocr() {
    let doc = SourceDocument::new("john_smith.docx", docx(&[png(1), png(2)]));
    let options = ProcessOptions {
        max_images: Some(1),
    };
    let result = process_document(&doc, None, &mock(), &demo_table(), &options).unwrap();

    assert_eq!(result.images_processed, 1);
    assert_eq!(result.entries.len(), 2);
    assert_eq!(
        result.image_results[1].skipped.as_deref(),
        Some("image limit reached")
    );
}

#[test]
fn trace_records_image_numbers() {
    let doc = SourceDocument::new("john_smith.docx", docx(&[png(1), png(2)]));
    let result =
        process_document(&doc, None, &mock(), &demo_table(), &ProcessOptions::default()).unwrap();

    let images: Vec<Option<usize>> = result.trace.entries.iter().map(|t| t.image_number).collect();
    assert_eq!(
        images,
        vec![Some(1), Some(1), Some(2), Some(2), Some(2)]
    );
    assert_eq!(result.trace.entries[0].line_number, 2);
}

#[test]
fn json_output_shape() {
    let doc = SourceDocument::new("jane_doe.docx", docx(&[png(3)]));
    let result =
        process_document(&doc, None, &mock(), &demo_table(), &ProcessOptions::default()).unwrap();
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["status"], "processed");
    assert_eq!(json["entries"][0]["Date"], "03/04/2024");
    assert_eq!(json["entries"][0]["Hours"], 8.0);
    assert_eq!(json["entries"][1]["Hours"], "CHECK");
    assert_eq!(json["reconciliation"]["discrepancy"], true);
}
