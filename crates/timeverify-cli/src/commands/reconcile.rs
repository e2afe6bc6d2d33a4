use std::path::PathBuf;

use timeverify_core::error::TimeVerifyError;
use timeverify_core::model::TimesheetEntry;
use timeverify_core::parsing::name::UNKNOWN_NAME;

use crate::output;

pub fn run(
    entries_file: PathBuf,
    name: Option<String>,
    reference: Option<PathBuf>,
    output_format: &str,
) -> Result<(), TimeVerifyError> {
    let json = std::fs::read_to_string(&entries_file)?;
    let entries: Vec<TimesheetEntry> = serde_json::from_str(&json)?;
    let entries = timeverify_core::reconcile::recheck_entries(entries);
    let table = super::load_reference_table(reference.as_deref())?;

    let employee_name = name
        .or_else(|| entries.first().map(|e| e.name.clone()))
        .unwrap_or_else(|| UNKNOWN_NAME.to_string());

    let summary = timeverify_core::reconcile::reconcile(&employee_name, &entries, &table);

    match output_format {
        "json" => output::json::print(&summary)?,
        _ => output::table::print_reconciliation(&summary),
    }

    Ok(())
}
