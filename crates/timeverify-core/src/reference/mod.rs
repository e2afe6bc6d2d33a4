pub mod builtin;
pub mod schema;
pub mod xlsx;

use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::TimeVerifyError;
use crate::parsing::name::employee_key;
use schema::ReferenceTableDef;

/// Source of reference ("system of record") hours per employee.
///
/// Lookups never fail: unknown employees resolve to a documented default.
pub trait ReferenceHours: Send + Sync {
    fn reference_hours(&self, employee_name: &str) -> Decimal;

    /// Name of this reference source (for diagnostics).
    fn source_name(&self) -> &str;
}

/// In-memory reference table keyed by lower-cased, trimmed employee name.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceTable {
    name: String,
    default_hours: Decimal,
    employees: BTreeMap<String, Decimal>,
}

impl ReferenceTable {
    pub fn new(name: &str, default_hours: Decimal) -> Self {
        ReferenceTable {
            name: name.to_string(),
            default_hours,
            employees: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, employee_name: &str, hours: Decimal) {
        self.employees.insert(employee_key(employee_name), hours);
    }

    pub fn default_hours(&self) -> Decimal {
        self.default_hours
    }

    /// Known employees and their hours, sorted by key.
    pub fn employees(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.employees.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.employees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }
}

impl ReferenceHours for ReferenceTable {
    fn reference_hours(&self, employee_name: &str) -> Decimal {
        self.employees
            .get(&employee_key(employee_name))
            .copied()
            .unwrap_or(self.default_hours)
    }

    fn source_name(&self) -> &str {
        &self.name
    }
}

impl TryFrom<ReferenceTableDef> for ReferenceTable {
    type Error = TimeVerifyError;

    fn try_from(def: ReferenceTableDef) -> Result<Self, Self::Error> {
        validate_reference(&def)?;
        let mut table = ReferenceTable::new(&def.name, def.default_hours);
        for (name, hours) in &def.employees {
            table.insert(name, *hours);
        }
        Ok(table)
    }
}

/// Load a reference table from a JSON or XLSX file (chosen by extension).
pub fn load_reference(path: &Path) -> Result<ReferenceTable, TimeVerifyError> {
    let is_xlsx = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("xlsx"))
        .unwrap_or(false);

    if is_xlsx {
        let bytes = std::fs::read(path).map_err(|e| TimeVerifyError::ReferenceLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "xlsx".into());
        let def = xlsx::parse_reference_xlsx(&bytes, &name)?;
        return ReferenceTable::try_from(def);
    }

    let content = std::fs::read_to_string(path).map_err(|e| TimeVerifyError::ReferenceLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_reference(&content, path)
}

/// Parse a reference table from a JSON string.
pub fn parse_reference(json: &str, source: &Path) -> Result<ReferenceTable, TimeVerifyError> {
    let def: ReferenceTableDef =
        serde_json::from_str(json).map_err(|e| TimeVerifyError::ReferenceLoad {
            path: source.to_path_buf(),
            reason: e.to_string(),
        })?;
    ReferenceTable::try_from(def)
}

/// Parse a reference table from a JSON string (no file path context).
pub fn parse_reference_str(json: &str) -> Result<ReferenceTable, TimeVerifyError> {
    let def: ReferenceTableDef = serde_json::from_str(json)?;
    ReferenceTable::try_from(def)
}

/// Validate that a reference table is well-formed.
pub fn validate_reference(def: &ReferenceTableDef) -> Result<(), TimeVerifyError> {
    if def.default_hours.is_sign_negative() {
        return Err(TimeVerifyError::ReferenceInvalid(format!(
            "default_hours must not be negative (got {})",
            def.default_hours
        )));
    }

    for (name, hours) in &def.employees {
        if name.trim().is_empty() {
            return Err(TimeVerifyError::ReferenceInvalid(
                "employee name must not be empty".into(),
            ));
        }
        if hours.is_sign_negative() {
            return Err(TimeVerifyError::ReferenceInvalid(format!(
                "employee '{}' has negative hours {}",
                name, hours
            )));
        }
    }

    Ok(())
}
