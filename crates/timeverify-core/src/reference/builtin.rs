use crate::error::TimeVerifyError;
use crate::reference::schema::ReferenceTableDef;
use crate::reference::ReferenceTable;

const DEMO_JSON: &str = include_str!("../../../../reference/demo.json");

/// Available predefined reference tables.
pub const PRESETS: &[&str] = &["demo"];

/// Load a predefined reference table by name.
pub fn load_preset(name: &str) -> Result<ReferenceTable, TimeVerifyError> {
    match name {
        "demo" => {
            let def: ReferenceTableDef = serde_json::from_str(DEMO_JSON)?;
            ReferenceTable::try_from(def)
        }
        _ => Err(TimeVerifyError::ReferenceInvalid(format!(
            "unknown reference preset '{}'. Available: {}",
            name,
            PRESETS.join(", ")
        ))),
    }
}

/// The demo table used when no reference file is supplied.
pub fn demo_table() -> ReferenceTable {
    // The embedded JSON is part of the build; a parse failure is a packaging bug.
    load_preset("demo").expect("embedded demo reference table must parse")
}
