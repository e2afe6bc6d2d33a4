use std::path::{Path, PathBuf};

use timeverify_core::error::TimeVerifyError;
use timeverify_core::reference::{builtin, load_reference, ReferenceHours};

pub fn list(path: Option<PathBuf>) -> Result<(), TimeVerifyError> {
    let table = super::load_reference_table(path.as_deref())?;

    if path.is_none() {
        println!("Built-in presets: {}\n", builtin::PRESETS.join(", "));
    }
    println!("{}\n", table.source_name());

    let width = table
        .employees()
        .map(|(name, _)| name.len())
        .max()
        .unwrap_or(8)
        .max("Employee".len());

    println!("  {:<width$}  Hours", "Employee");
    for (name, hours) in table.employees() {
        println!("  {:<width$}  {}", name, hours.normalize());
    }
    println!();
    println!("  Anyone else: {} hours", table.default_hours().normalize());

    Ok(())
}

pub fn validate(path: &Path) -> Result<(), TimeVerifyError> {
    let table = load_reference(path)?;
    println!(
        "Valid: {} ({} employee(s), default {} hours)",
        table.source_name(),
        table.len(),
        table.default_hours().normalize()
    );
    Ok(())
}
