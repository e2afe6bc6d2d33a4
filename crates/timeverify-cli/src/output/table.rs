use timeverify_core::model::TimesheetEntry;
use timeverify_core::reconcile::{
    BatchResult, DocumentResult, DocumentStatus, ReconciliationSummary,
};
use timeverify_core::trace::TraceBundle;

/// Render entries as an aligned table. Rows awaiting review are marked.
pub fn format_entries(entries: &[TimesheetEntry]) -> String {
    if entries.is_empty() {
        return "  (no entries found)\n".to_string();
    }

    let with_source = entries.iter().any(|e| e.source.is_some());
    let name_width = entries
        .iter()
        .map(|e| e.name.len())
        .max()
        .unwrap_or(4)
        .max("Name".len());
    let date_width = entries
        .iter()
        .map(|e| e.date.len())
        .max()
        .unwrap_or(10)
        .max("Date".len());

    let mut out = format!("  {:<name_width$}  {:<date_width$}  {:>6}", "Name", "Date", "Hours");
    if with_source {
        out.push_str("  Source");
    }
    out.push('\n');

    for entry in entries {
        let hours = entry.hours.to_string();
        out.push_str(&format!(
            "  {:<name_width$}  {:<date_width$}  {:>6}",
            entry.name, entry.date, hours
        ));
        if with_source {
            out.push_str(&format!("  {}", entry.source.as_deref().unwrap_or("")));
        }
        if entry.hours.needs_review() {
            out.push_str("  <- needs review");
        }
        out.push('\n');
    }
    out
}

pub fn print_entries(entries: &[TimesheetEntry]) {
    print!("{}", format_entries(entries));
}

pub fn print_reconciliation(summary: &ReconciliationSummary) {
    let verdict = if summary.discrepancy { "DISCREPANCY" } else { "OK" };
    println!("  Employee:        {}", summary.employee_name);
    println!("  Reported hours:  {}", summary.reported_hours.normalize());
    println!("  Reference hours: {}", summary.reference_hours.normalize());
    println!("  Result:          {verdict}");
    if summary.needs_review > 0 {
        println!(
            "  {} entr{} marked CHECK need manual review",
            summary.needs_review,
            if summary.needs_review == 1 { "y" } else { "ies" }
        );
    }
}

pub fn print_trace(trace: &TraceBundle) {
    if trace.entries.is_empty() {
        return;
    }
    println!();
    println!("  Parse trace:");
    for t in &trace.entries {
        println!("    {}", t.describe());
    }
}

pub fn print_document(result: &DocumentResult, verbose: bool) {
    println!("=== {} ===\n", result.filename);

    match &result.status {
        DocumentStatus::NoImages => {
            println!("  No images found in document\n");
            return;
        }
        DocumentStatus::Failed { error } => {
            println!("  Failed: {error}\n");
            return;
        }
        DocumentStatus::Processed => {}
    }

    println!("  Images processed: {}", result.images_processed);
    for image in &result.image_results {
        if let Some(reason) = &image.skipped {
            println!("    image {}: skipped ({reason})", image.image_number);
        } else if verbose {
            let text = if image.text_extracted { "text" } else { "no text" };
            println!(
                "    image {}: {}, {} entr{}",
                image.image_number,
                text,
                image.entries_found,
                if image.entries_found == 1 { "y" } else { "ies" }
            );
        }
    }
    println!();

    print_entries(&result.entries);
    println!();

    if let Some(summary) = &result.reconciliation {
        print_reconciliation(summary);
    }

    if verbose {
        print_trace(&result.trace);
    }
    println!();
}

pub fn print_batch(result: &BatchResult, verbose: bool) {
    for doc in &result.documents {
        print_document(doc, verbose);
    }

    let s = &result.summary;
    println!("=== Summary ===\n");
    println!(
        "  Documents:     {} ({} processed)",
        s.total_documents, s.successful_documents
    );
    println!("  Images:        {}", s.total_images);
    println!("  Entries:       {}", s.total_entries);
    println!("  Discrepancies: {}", s.discrepancies_found);
    println!(
        "  Processed at:  {}",
        result.processed_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
}
