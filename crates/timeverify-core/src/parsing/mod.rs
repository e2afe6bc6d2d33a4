pub mod dates;
pub mod hours;
pub mod name;

use regex::Regex;
use rust_decimal::Decimal;
use tracing::debug;

use crate::model::TimesheetEntry;
use crate::trace::{EntryTrace, TraceBundle};
use dates::{locate_date, normalize_date};
use hours::lookup_hours;

/// A named regex with exactly one capture group.
pub(crate) struct PatternRule {
    pub(crate) name: &'static str,
    regex: Regex,
}

impl PatternRule {
    pub(crate) fn new(name: &'static str, pattern: &str) -> Self {
        PatternRule {
            name,
            regex: Regex::new(pattern).expect("built-in pattern must compile"),
        }
    }

    /// Capture group 1 of the leftmost match.
    pub(crate) fn first_capture<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.regex
            .captures(line)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
    }

    /// Capture group 1 of every non-overlapping match, left to right.
    pub(crate) fn all_captures<'a>(&'a self, line: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.regex
            .captures_iter(line)
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str())
    }
}

/// Entries parsed from one OCR text, plus how each was found.
#[derive(Debug, Clone, Default)]
pub struct ParsedText {
    pub entries: Vec<TimesheetEntry>,
    pub trace: TraceBundle,
    /// Non-empty lines that carried no recognizable date.
    pub undated_lines: usize,
}

/// Split OCR text into trimmed, non-empty candidate lines.
pub fn candidate_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().map(str::trim).filter(|l| !l.is_empty())
}

/// Combine a located date and optional hours into an entry.
pub fn build_entry(name: &str, normalized_date: String, hours: Option<Decimal>) -> TimesheetEntry {
    TimesheetEntry::new(name, normalized_date, hours)
}

/// Parse OCR text into timesheet entries, in line order.
///
/// Lines without a date produce nothing; a date without hours produces a
/// review entry. Repeated dates are kept as repeated entries.
pub fn parse_entries(text: &str, employee_name: &str) -> Vec<TimesheetEntry> {
    parse_text(text, employee_name).entries
}

/// Like [`parse_entries`], also returning the per-entry trace.
pub fn parse_text(text: &str, employee_name: &str) -> ParsedText {
    let mut parsed = ParsedText::default();

    for (idx, line) in candidate_lines(text).enumerate() {
        let Some(date) = locate_date(line) else {
            parsed.undated_lines += 1;
            continue;
        };

        let lookup = lookup_hours(line);
        let normalized = normalize_date(date.raw, date.separator);
        debug!(
            line = line,
            date = %normalized,
            hours = ?lookup.found.as_ref().map(|m| m.value),
            "timesheet line matched"
        );

        parsed.entries.push(build_entry(
            employee_name,
            normalized,
            lookup.found.as_ref().map(|m| m.value),
        ));
        parsed.trace.entries.push(EntryTrace {
            image_number: None,
            line_number: idx + 1,
            line_text: line.to_string(),
            date_rule: date.rule.to_string(),
            raw_date: date.raw.to_string(),
            hours_rule: lookup.found.as_ref().map(|m| m.rule.clone()),
            raw_hours: lookup.found.map(|m| m.raw),
            rejected_hours: lookup.rejected,
        });
    }

    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Hours;
    use rust_decimal_macros::dec;

    #[test]
    fn test_candidate_lines() {
        let lines: Vec<&str> = candidate_lines("  a  \n\n \r\nb\r\n   ").collect();
        assert_eq!(lines, vec!["a", "b"]);
    }

    #[test]
    fn test_empty_text_yields_nothing() {
        assert!(parse_entries("", "X").is_empty());
        assert!(parse_entries("\n  \n", "X").is_empty());
    }

    #[test]
    fn test_lines_without_dates_dropped() {
        let parsed = parse_text("Timesheet\nWeek total 40\nApproved", "X");
        assert!(parsed.entries.is_empty());
        assert_eq!(parsed.undated_lines, 3);
    }

    #[test]
    fn test_single_entry() {
        let entries = parse_entries("Monday 3/4/2024 Installation 8h", "John Smith");
        assert_eq!(
            entries,
            vec![TimesheetEntry {
                name: "John Smith".into(),
                date: "03/04/2024".into(),
                hours: Hours::Numeric(dec!(8.0)),
                source: None,
            }]
        );
    }

    #[test]
    fn test_date_without_hours_needs_review() {
        let entries = parse_entries("3/4/2024\n", "X");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "X");
        assert_eq!(entries[0].date, "03/04/2024");
        assert_eq!(entries[0].hours, Hours::NeedsReview);
    }

    #[test]
    fn test_order_preserved_and_no_dedup() {
        let text = "Week of 3/4/2024\n\
                    Mon 3/4/2024 8h\n\
                    Tue 3/5/2024 7.5h\n\
                    Tue 3/5/2024 7.5h\n\
                    Total 38";
        let entries = parse_entries(text, "Jane Doe");
        let dates: Vec<&str> = entries.iter().map(|e| e.date.as_str()).collect();
        assert_eq!(
            dates,
            vec!["03/04/2024", "03/04/2024", "03/05/2024", "03/05/2024"]
        );
        assert_eq!(entries[0].hours, Hours::NeedsReview);
        assert_eq!(entries[1].hours, Hours::Numeric(dec!(8)));
        assert_eq!(entries[3].hours, Hours::Numeric(dec!(7.5)));
    }

    #[test]
    fn test_unnormalizable_date_kept_raw() {
        let entries = parse_entries("13/45/2024 8h", "X");
        assert_eq!(entries[0].date, "13/45/2024");
        assert_eq!(entries[0].hours, Hours::Numeric(dec!(8)));
    }

    #[test]
    fn test_trace_records_rules() {
        let parsed = parse_text("header\nFri 3/8/2024 30h (6)", "X");
        assert_eq!(parsed.trace.entries.len(), 1);
        let t = &parsed.trace.entries[0];
        assert_eq!(t.line_number, 2);
        assert_eq!(t.date_rule, "weekday_short_slash");
        assert_eq!(t.hours_rule.as_deref(), Some("parenthesized"));
        assert_eq!(t.rejected_hours.len(), 1);
    }
}
