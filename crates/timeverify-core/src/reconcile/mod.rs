pub mod outcome;

use rust_decimal::Decimal;
use tracing::warn;

use crate::model::TimesheetEntry;
use crate::reference::ReferenceHours;
pub use outcome::{
    BatchResult, BatchSummary, DocumentResult, DocumentStatus, ImageResult, ReconciliationSummary,
};

/// Sum numeric hours in input order. Review entries are skipped.
pub fn reported_hours(entries: &[TimesheetEntry]) -> Decimal {
    entries.iter().filter_map(|e| e.hours.numeric()).sum()
}

/// Re-apply the daily range check to entries that did not come from the
/// parser, such as hand-edited JSON. Out-of-range hours become review markers.
pub fn recheck_entries(entries: Vec<TimesheetEntry>) -> Vec<TimesheetEntry> {
    entries
        .into_iter()
        .map(|mut entry| {
            let checked = entry.hours.checked();
            if checked != entry.hours {
                warn!(date = %entry.date, hours = %entry.hours, "hours out of range, marking for review");
                entry.hours = checked;
            }
            entry
        })
        .collect()
}

/// Compare an employee's reported hours against the reference lookup.
pub fn reconcile(
    employee_name: &str,
    entries: &[TimesheetEntry],
    reference: &dyn ReferenceHours,
) -> ReconciliationSummary {
    let reported = reported_hours(entries);
    let reference_hours = reference.reference_hours(employee_name);

    ReconciliationSummary {
        employee_name: employee_name.to_string(),
        reported_hours: reported,
        reference_hours,
        discrepancy: reported != reference_hours,
        needs_review: entries.iter().filter(|e| e.hours.needs_review()).count(),
    }
}

/// Roll per-document results up into batch totals.
pub fn summarize(documents: &[DocumentResult]) -> BatchSummary {
    let mut summary = BatchSummary {
        total_documents: documents.len(),
        ..Default::default()
    };

    for doc in documents.iter().filter(|d| d.status.is_processed()) {
        summary.successful_documents += 1;
        summary.total_images += doc.images_processed;
        summary.total_entries += doc.entries.len();
        if doc.has_discrepancy() {
            summary.discrepancies_found += 1;
        }
    }

    summary
}
