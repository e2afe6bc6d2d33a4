use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// On-disk form of a reference table (the "system of record").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceTableDef {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Hours assumed for employees missing from `employees`.
    pub default_hours: Decimal,
    /// Employee name -> reference hours (as string for exact decimal).
    #[serde(default)]
    pub employees: BTreeMap<String, Decimal>,
}
