//! Temporal coverage derived from the free-text `timeRange` field.

use std::fmt;

use chrono::NaiveDate;

use crate::record::FieldSource;

/// Field holding the `YYYY` or `YYYY-YYYY` range.
pub const TIME_RANGE_FIELD: &str = "timeRange";

/// A closed interval of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeInterval {
    /// First day, January 1 of the start year.
    pub start: NaiveDate,
    /// Last day, December 31 of the end year.
    pub end: NaiveDate,
}

impl TimeInterval {
    /// Parses `"YYYY"` or `"YYYY-YYYY"`.
    ///
    /// Surrounding whitespace is ignored. Every other shape, including a
    /// valid start year followed by garbage, yields `None`. The years are
    /// not reordered.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let (start, end) = match raw.split_once('-') {
            Some((start, end)) => (parse_year(start)?, parse_year(end)?),
            None => {
                let year = parse_year(raw)?;
                (year, year)
            },
        };
        Some(Self {
            start: NaiveDate::from_ymd_opt(start, 1, 1)?,
            end: NaiveDate::from_ymd_opt(end, 12, 31)?,
        })
    }

    /// Reads and parses the `timeRange` field of a record.
    #[must_use]
    pub fn from_record<R: FieldSource + ?Sized>(record: &R) -> Option<Self> {
        record
            .field_text(TIME_RANGE_FIELD)
            .and_then(|raw| Self::parse(&raw))
    }

    /// Start day as `YYYY-MM-DD`.
    #[must_use]
    pub fn start_date(&self) -> String {
        self.start.format("%Y-%m-%d").to_string()
    }

    /// End day as `YYYY-MM-DD`.
    #[must_use]
    pub fn end_date(&self) -> String {
        self.end.format("%Y-%m-%d").to_string()
    }
}

impl fmt::Display for TimeInterval {
    /// ISO 8601 interval notation, `start/end`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.start_date(), self.end_date())
    }
}

fn parse_year(part: &str) -> Option<i32> {
    let part = part.trim();
    if part.len() == 4 && part.bytes().all(|b| b.is_ascii_digit()) {
        part.parse().ok()
    } else {
        None
    }
}
