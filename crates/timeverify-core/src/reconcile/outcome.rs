use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::model::TimesheetEntry;
use crate::trace::TraceBundle;

/// Reported hours for one employee compared against the system of record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationSummary {
    pub employee_name: String,
    /// Sum of numeric hours; review entries contribute nothing.
    #[serde(with = "rust_decimal::serde::float")]
    pub reported_hours: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub reference_hours: Decimal,
    /// Exact inequality between reported and reference hours.
    pub discrepancy: bool,
    /// Entries whose hours could not be read.
    pub needs_review: usize,
}

/// What happened to one image of a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageResult {
    /// 1-based position of the image within its document.
    pub image_number: usize,
    pub text_extracted: bool,
    pub entries_found: usize,
    pub raw_text_sample: String,
    /// Set when the image was not OCR'd (undecodable, over the image cap).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DocumentStatus {
    Processed,
    NoImages,
    Failed { error: String },
}

impl DocumentStatus {
    pub fn is_processed(&self) -> bool {
        matches!(self, DocumentStatus::Processed)
    }
}

/// Result for one source document (a .docx or a standalone image).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentResult {
    pub filename: String,
    pub employee_name: String,
    #[serde(flatten)]
    pub status: DocumentStatus,
    pub images_processed: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub image_results: Vec<ImageResult>,
    #[serde(default)]
    pub entries: Vec<TimesheetEntry>,
    /// Present only for processed documents.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reconciliation: Option<ReconciliationSummary>,
    #[serde(default)]
    pub trace: TraceBundle,
}

impl DocumentResult {
    /// A document that yielded no work (no images, or a failure).
    pub fn empty(filename: &str, employee_name: &str, status: DocumentStatus) -> Self {
        DocumentResult {
            filename: filename.to_string(),
            employee_name: employee_name.to_string(),
            status,
            images_processed: 0,
            image_results: Vec::new(),
            entries: Vec::new(),
            reconciliation: None,
            trace: TraceBundle::default(),
        }
    }

    pub fn has_discrepancy(&self) -> bool {
        self.reconciliation
            .as_ref()
            .map(|r| r.discrepancy)
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Every document supplied, including failed ones.
    pub total_documents: usize,
    pub successful_documents: usize,
    /// Images and entries from processed documents only.
    pub total_images: usize,
    pub total_entries: usize,
    pub discrepancies_found: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResult {
    pub summary: BatchSummary,
    pub documents: Vec<DocumentResult>,
    /// All entries of processed documents, tagged with their source file.
    pub entries: Vec<TimesheetEntry>,
    pub processed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_summary_hours_serialize_as_numbers() {
        let summary = ReconciliationSummary {
            employee_name: "john smith".into(),
            reported_hours: dec!(37.5),
            reference_hours: dec!(38),
            discrepancy: true,
            needs_review: 0,
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["reported_hours"], 37.5);
        assert_eq!(json["reference_hours"], 38.0);

        let back: ReconciliationSummary = serde_json::from_value(json).unwrap();
        assert_eq!(back.reported_hours, dec!(37.5));
    }
}
