use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use super::PatternRule;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateSeparator {
    Slash,
    Dash,
}

impl DateSeparator {
    pub fn as_char(self) -> char {
        match self {
            DateSeparator::Slash => '/',
            DateSeparator::Dash => '-',
        }
    }

    /// Guess the separator of a raw date string (slash wins over dash).
    pub fn detect(raw: &str) -> Option<DateSeparator> {
        if raw.contains('/') {
            Some(DateSeparator::Slash)
        } else if raw.contains('-') {
            Some(DateSeparator::Dash)
        } else {
            None
        }
    }
}

/// A date substring found on a line, with the rule that found it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateMatch<'a> {
    pub raw: &'a str,
    pub separator: DateSeparator,
    pub rule: &'static str,
}

struct DateRule {
    pattern: PatternRule,
    separator: DateSeparator,
}

/// Date rules in priority order. Weekday-prefixed dates win over bare ones
/// when a line carries more than one date.
static DATE_RULES: LazyLock<Vec<DateRule>> = LazyLock::new(|| {
    vec![
        DateRule {
            pattern: PatternRule::new(
                "weekday_long_slash",
                r"(?:Monday|Tuesday|Wednesday|Thursday|Friday|Saturday|Sunday)\s+(\d{1,2}/\d{1,2}/\d{4})",
            ),
            separator: DateSeparator::Slash,
        },
        DateRule {
            pattern: PatternRule::new(
                "weekday_short_slash",
                r"(?:Mon|Tue|Wed|Thu|Fri|Sat|Sun)\s+(\d{1,2}/\d{1,2}/\d{4})",
            ),
            separator: DateSeparator::Slash,
        },
        DateRule {
            pattern: PatternRule::new("slash", r"(\d{1,2}/\d{1,2}/\d{4})"),
            separator: DateSeparator::Slash,
        },
        DateRule {
            pattern: PatternRule::new("dash", r"(\d{1,2}-\d{1,2}-\d{4})"),
            separator: DateSeparator::Dash,
        },
    ]
});

/// Names of the date rules, in the order they are tried.
pub fn date_rule_names() -> Vec<&'static str> {
    DATE_RULES.iter().map(|r| r.pattern.name).collect()
}

/// Find the first date on a line. Only the highest-priority matching rule is used.
pub fn locate_date(line: &str) -> Option<DateMatch<'_>> {
    DATE_RULES.iter().find_map(|rule| {
        rule.pattern.first_capture(line).map(|raw| DateMatch {
            raw,
            separator: rule.separator,
            rule: rule.pattern.name,
        })
    })
}

/// Render a located date as zero-padded `MM/DD/YYYY`.
///
/// Falls back to the raw substring when it does not split into three
/// integers or does not name a real calendar day.
pub fn normalize_date(raw: &str, separator: DateSeparator) -> String {
    let parts: Vec<&str> = raw.trim().split(separator.as_char()).collect();
    if parts.len() != 3 {
        return raw.to_string();
    }

    let parsed = (
        parts[0].parse::<u32>(),
        parts[1].parse::<u32>(),
        parts[2].parse::<i32>(),
    );
    let (Ok(month), Ok(day), Ok(year)) = parsed else {
        return raw.to_string();
    };

    if year < 0 || NaiveDate::from_ymd_opt(year, month, day).is_none() {
        return raw.to_string();
    }

    format!("{month:02}/{day:02}/{year:04}")
}

/// Normalize a date string whose separator is not known in advance.
pub fn canonicalize_date(raw: &str) -> String {
    match DateSeparator::detect(raw) {
        Some(sep) => normalize_date(raw, sep),
        None => raw.to_string(),
    }
}
