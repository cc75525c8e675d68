//! Module for handling date-or-sentinel parsing.

use chrono::NaiveDate;

/// Parsed value of a date-or-sentinel cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateCell {
    /// A genuine calendar date
    Date(NaiveDate),
    /// The literal meaning "did not occur"
    Sentinel,
    /// Neither a date nor the sentinel
    Invalid,
}

impl DateCell {
    /// Outcome flag derived from the cell, `None` for invalid input
    #[must_use]
    pub const fn occurred(self) -> Option<bool> {
        match self {
            Self::Date(_) => Some(true),
            Self::Sentinel => Some(false),
            Self::Invalid => None,
        }
    }
}

/// Parse a date string with multiple format attempts
#[must_use]
pub fn parse_date_string<S: AsRef<str>>(s: &str, formats: &[S]) -> Option<NaiveDate> {
    formats
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(s, format.as_ref()).ok())
}

/// Classify a raw cell as date, sentinel or invalid
#[must_use]
pub fn parse_date_cell<S: AsRef<str>>(raw: &str, sentinel: &str, formats: &[S]) -> DateCell {
    let trimmed = raw.trim();
    if trimmed == sentinel {
        return DateCell::Sentinel;
    }
    parse_date_string(trimmed, formats).map_or(DateCell::Invalid, DateCell::Date)
}
