use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::LazyLock;
use tracing::debug;

use super::PatternRule;
use crate::model::is_plausible_hours;

/// An hour quantity: one or two digits with up to two decimals. The leading
/// group keeps date components (`/2024`, `-31`) and longer numbers out.
const NUMBER: &str = r"(?:^|[^\d./\-])(\d{1,2}(?:\.\d{1,2})?)";

/// Hour rules in priority order. The first rule whose match passes the range
/// check wins.
static HOURS_RULES: LazyLock<Vec<PatternRule>> = LazyLock::new(|| {
    vec![
        PatternRule::new(
            "unit_suffix",
            &format!(r"{NUMBER}\s*(?i:hours?|hrs?|h)\b"),
        ),
        PatternRule::new(
            "category_keyword",
            &format!(
                r"{NUMBER}\s+(?:Cost|Installation|Store|Enterprise|Product|DACI|Post|Item)"
            ),
        ),
        PatternRule::new(
            "product_path",
            r"Product\s*/\s*[A-Za-z\s]+\s*/\s*(\d{1,2}(?:\.\d{1,2})?)\b",
        ),
        PatternRule::new("parenthesized", r"\(\s*(\d{1,2}(?:\.\d{1,2})?)\s*\)"),
        PatternRule::new("bare_number", r"(?:^|\s)(\d{1,2}(?:\.\d{1,2})?)(?:\s|$)"),
    ]
});

/// Names of the hour rules, in the order they are tried.
pub fn hours_rule_names() -> Vec<&'static str> {
    HOURS_RULES.iter().map(|r| r.name).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoursMatch {
    pub value: Decimal,
    pub rule: String,
    pub raw: String,
}

/// A candidate a rule matched but the range check (or number parse) refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedHours {
    pub rule: String,
    pub raw: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HoursLookup {
    pub found: Option<HoursMatch>,
    pub rejected: Vec<RejectedHours>,
}

/// Run the hour rules over a full line.
///
/// A rejected candidate does not end the search: the rule's later matches
/// are tried, then the next rule.
pub fn lookup_hours(line: &str) -> HoursLookup {
    let mut lookup = HoursLookup::default();

    for rule in HOURS_RULES.iter() {
        for raw in rule.all_captures(line) {
            match Decimal::from_str(raw) {
                Ok(value) if is_plausible_hours(value) => {
                    lookup.found = Some(HoursMatch {
                        value,
                        rule: rule.name.to_string(),
                        raw: raw.to_string(),
                    });
                    return lookup;
                }
                _ => {
                    debug!(rule = rule.name, candidate = raw, "hours candidate rejected");
                    lookup.rejected.push(RejectedHours {
                        rule: rule.name.to_string(),
                        raw: raw.to_string(),
                    });
                }
            }
        }
    }

    lookup
}

/// Validated hours on a line, if any.
pub fn locate_hours(line: &str) -> Option<Decimal> {
    lookup_hours(line).found.map(|m| m.value)
}
