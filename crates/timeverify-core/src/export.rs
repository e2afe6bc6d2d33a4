use std::io::Write;

use serde::Serialize;

use crate::error::TimeVerifyError;
use crate::model::TimesheetEntry;

/// UTF-8 byte order mark, so spreadsheet applications pick the right encoding.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Write entries as CSV with `Name, Date, Hours` columns.
///
/// A `Source File` column is added when any entry carries a source. Entries
/// awaiting review are written with the `CHECK` token in the hours column.
pub fn write_csv<W: Write>(mut writer: W, entries: &[TimesheetEntry]) -> Result<(), TimeVerifyError> {
    writer.write_all(UTF8_BOM)?;
    let mut csv = csv::Writer::from_writer(writer);

    let with_source = entries.iter().any(|e| e.source.is_some());
    if with_source {
        csv.write_record(["Name", "Date", "Hours", "Source File"])?;
    } else {
        csv.write_record(["Name", "Date", "Hours"])?;
    }

    for entry in entries {
        let hours = entry.hours.to_string();
        if with_source {
            csv.write_record([
                entry.name.as_str(),
                entry.date.as_str(),
                hours.as_str(),
                entry.source.as_deref().unwrap_or(""),
            ])?;
        } else {
            csv.write_record([entry.name.as_str(), entry.date.as_str(), hours.as_str()])?;
        }
    }

    csv.flush()?;
    Ok(())
}

pub fn to_csv_string(entries: &[TimesheetEntry]) -> Result<String, TimeVerifyError> {
    let mut buf = Vec::new();
    write_csv(&mut buf, entries)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Pretty-printed JSON for any result type.
pub fn to_json_string<T: Serialize>(value: &T) -> Result<String, TimeVerifyError> {
    Ok(serde_json::to_string_pretty(value)?)
}
