use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Token used wherever an entry's hours need a human to look at them.
pub const NEEDS_REVIEW_TOKEN: &str = "CHECK";

/// Upper bound for a single day's hours.
pub const MAX_DAILY_HOURS: Decimal = Decimal::from_parts(24, 0, 0, false, 0);

/// Whether a value fits in one day: `0..=24` hours.
pub fn is_plausible_hours(value: Decimal) -> bool {
    value >= Decimal::ZERO && value <= MAX_DAILY_HOURS
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hours {
    Numeric(Decimal),
    /// A date was found on the line but no plausible hour value was.
    NeedsReview,
}

impl Hours {
    /// Returns the numeric value, or `None` for entries awaiting review.
    pub fn numeric(&self) -> Option<Decimal> {
        match self {
            Hours::Numeric(v) => Some(*v),
            Hours::NeedsReview => None,
        }
    }

    pub fn needs_review(&self) -> bool {
        matches!(self, Hours::NeedsReview)
    }

    /// Numeric hours outside `0..=24` become a review marker.
    pub fn checked(self) -> Hours {
        match self {
            Hours::Numeric(v) if !is_plausible_hours(v) => Hours::NeedsReview,
            other => other,
        }
    }
}

impl From<Option<Decimal>> for Hours {
    fn from(value: Option<Decimal>) -> Self {
        match value {
            Some(v) => Hours::Numeric(v),
            None => Hours::NeedsReview,
        }
    }
}

impl fmt::Display for Hours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Hours::Numeric(v) => write!(f, "{}", v.normalize()),
            Hours::NeedsReview => write!(f, "{NEEDS_REVIEW_TOKEN}"),
        }
    }
}

// Numeric hours go over the wire as JSON numbers, review markers as "CHECK".
impl Serialize for Hours {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Hours::Numeric(v) => match v.to_f64() {
                Some(f) => serializer.serialize_f64(f),
                None => serializer.serialize_str(&v.to_string()),
            },
            Hours::NeedsReview => serializer.serialize_str(NEEDS_REVIEW_TOKEN),
        }
    }
}

impl<'de> Deserialize<'de> for Hours {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(HoursVisitor)
    }
}

struct HoursVisitor;

impl<'de> Visitor<'de> for HoursVisitor {
    type Value = Hours;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "a number of hours or the string \"{NEEDS_REVIEW_TOKEN}\"")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Hours, E> {
        Ok(Hours::Numeric(Decimal::from(v)))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Hours, E> {
        Ok(Hours::Numeric(Decimal::from(v)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Hours, E> {
        Ok(Hours::Numeric(f64_to_decimal(v)))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Hours, E> {
        let v = v.trim();
        if v.eq_ignore_ascii_case(NEEDS_REVIEW_TOKEN) {
            return Ok(Hours::NeedsReview);
        }
        Decimal::from_str(v)
            .map(Hours::Numeric)
            .map_err(|e| E::custom(format!("invalid hours '{v}': {e}")))
    }
}

/// Convert f64 to Decimal via its shortest string form, so 7.5 stays 7.5
/// instead of picking up binary floating-point noise.
pub(crate) fn f64_to_decimal(f: f64) -> Decimal {
    Decimal::from_str(&format!("{f}"))
        .unwrap_or_else(|_| Decimal::try_from(f).unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimesheetEntry {
    #[serde(rename = "Name")]
    pub name: String,
    /// `MM/DD/YYYY` when the date could be normalized, otherwise the raw match.
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Hours")]
    pub hours: Hours,
    /// Source document, set when entries from several documents are combined.
    #[serde(
        rename = "source_file",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub source: Option<String>,
}

impl TimesheetEntry {
    /// Build an entry for a located date. Missing hours become a review marker.
    pub fn new(name: &str, date: String, hours: Option<Decimal>) -> Self {
        TimesheetEntry {
            name: name.to_string(),
            date,
            hours: Hours::from(hours),
            source: None,
        }
    }

    pub fn with_source(mut self, source: &str) -> Self {
        self.source = Some(source.to_string());
        self
    }
}
