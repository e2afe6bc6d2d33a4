use serde::{Deserialize, Serialize};

use crate::parsing::hours::RejectedHours;

pub const TRACE_SCHEMA_VERSION: &str = "1.0";

/// How one timesheet entry was derived from its source line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryTrace {
    /// 1-based image within the document, when the text came from OCR.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_number: Option<usize>,
    /// 1-based index among the non-empty lines of the OCR text.
    pub line_number: usize,
    pub line_text: String,
    pub date_rule: String,
    pub raw_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours_rule: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_hours: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rejected_hours: Vec<RejectedHours>,
}

impl EntryTrace {
    /// One-line human summary, used by verbose CLI output.
    pub fn describe(&self) -> String {
        let mut out = match self.image_number {
            Some(n) => format!("image {n}, "),
            None => String::new(),
        };
        out.push_str(&format!(
            "line {}: date '{}' via {}",
            self.line_number, self.raw_date, self.date_rule
        ));
        match (&self.hours_rule, &self.raw_hours) {
            (Some(rule), Some(raw)) => out.push_str(&format!(", hours '{raw}' via {rule}")),
            _ => out.push_str(", no hours found"),
        }
        for r in &self.rejected_hours {
            out.push_str(&format!(" [rejected '{}' from {}]", r.raw, r.rule));
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceBundle {
    pub trace_schema_version: String,
    pub entries: Vec<EntryTrace>,
}

impl Default for TraceBundle {
    fn default() -> Self {
        Self {
            trace_schema_version: TRACE_SCHEMA_VERSION.to_string(),
            entries: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_with_rejections() {
        let mut trace = EntryTrace {
            image_number: None,
            line_number: 2,
            line_text: "3/4/2024 30h (6)".into(),
            date_rule: "slash".into(),
            raw_date: "3/4/2024".into(),
            hours_rule: Some("parenthesized".into()),
            raw_hours: Some("6".into()),
            rejected_hours: vec![RejectedHours {
                rule: "unit_suffix".into(),
                raw: "30".into(),
            }],
        };
        assert_eq!(
            trace.describe(),
            "line 2: date '3/4/2024' via slash, hours '6' via parenthesized [rejected '30' from unit_suffix]"
        );

        trace.image_number = Some(3);
        assert!(trace.describe().starts_with("image 3, line 2:"));
    }
}
