use std::collections::BTreeMap;
use std::io::Cursor;

use calamine::{Reader, Xlsx};
use rust_decimal::Decimal;
use tracing::warn;

use crate::error::TimeVerifyError;
use crate::model::f64_to_decimal;
use crate::reference::schema::ReferenceTableDef;

/// Default used when the sheet has no `default` row.
const FALLBACK_DEFAULT_HOURS: Decimal = Decimal::from_parts(40, 0, 0, false, 0);

/// Parse a reference table exported from a spreadsheet.
///
/// Reads the first worksheet: column A is the employee name, column B the
/// reference hours. A first row without a numeric hours cell is treated as a
/// header. A row named `default` sets the hours for unknown employees.
pub fn parse_reference_xlsx(bytes: &[u8], name: &str) -> Result<ReferenceTableDef, TimeVerifyError> {
    let cursor = Cursor::new(bytes);
    let mut workbook: Xlsx<_> = calamine::open_workbook_from_rs(cursor)
        .map_err(|e| TimeVerifyError::ReferenceInvalid(format!("failed to open xlsx: {e}")))?;

    let sheet = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| TimeVerifyError::ReferenceInvalid("xlsx has no worksheets".into()))?
        .map_err(|e| TimeVerifyError::ReferenceInvalid(format!("failed to read worksheet: {e}")))?;

    let mut employees = BTreeMap::new();
    let mut default_hours = FALLBACK_DEFAULT_HOURS;

    for (row_idx, row) in sheet.rows().enumerate() {
        let Some(employee) = row.first().and_then(cell_as_string) else {
            continue;
        };

        match cell_as_f64(row.get(1)) {
            Some(f) => {
                let hours = f64_to_decimal(f);
                if employee.eq_ignore_ascii_case("default") {
                    default_hours = hours;
                } else {
                    employees.insert(employee, hours);
                }
            }
            None if row_idx == 0 => continue, // header row
            None => {
                warn!(row = row_idx + 1, employee = %employee, "skipping reference row without numeric hours");
            }
        }
    }

    if employees.is_empty() {
        return Err(TimeVerifyError::ReferenceInvalid(
            "no employee rows found in xlsx".into(),
        ));
    }

    Ok(ReferenceTableDef {
        name: name.to_string(),
        description: Some("Imported from spreadsheet".into()),
        default_hours,
        employees,
    })
}

fn cell_as_string(cell: &calamine::Data) -> Option<String> {
    match cell {
        calamine::Data::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        calamine::Data::Empty => None,
        _ => Some(format!("{cell}")),
    }
}

fn cell_as_f64(cell: Option<&calamine::Data>) -> Option<f64> {
    match cell? {
        calamine::Data::Float(f) => Some(*f),
        calamine::Data::Int(i) => Some(*i as f64),
        calamine::Data::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
