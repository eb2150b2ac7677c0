//! Date normalization for export literals.
//!
//! Host records carry dates in whatever shape editors typed them:
//! `04.03.2015`, `04.03.2015, 10:30`, ISO timestamps with or without
//! offsets, or just a year. [`normalize`] parses day-first and fills missing
//! components from the epoch `0001-01-01T00:00:00`; anything unparseable is
//! kept verbatim as a plain literal.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use lazy_static::lazy_static;
use regex::Regex;

use super::namespaces::xsd;
use super::rdf::RdfNode;

lazy_static! {
    static ref YEAR: Regex = Regex::new(r"^(\d{4})$").unwrap();
    static ref MONTH_YEAR: Regex = Regex::new(r"^(\d{1,2})[./-](\d{4})$").unwrap();
    static ref YEAR_MONTH: Regex = Regex::new(r"^(\d{4})[-/.](\d{1,2})$").unwrap();
}

const OFFSET_DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"];

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%d.%m.%Y, %H:%M",
    "%d.%m.%Y %H:%M",
    "%d.%m.%Y, %H:%M:%S",
    "%d.%m.%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d/%m/%Y %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d.%m.%Y", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d", "%Y%m%d"];

/// A successfully parsed date, with or without a UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedDate {
    /// Local date and time.
    Naive(NaiveDateTime),
    /// Date and time with an explicit offset.
    Offset(DateTime<FixedOffset>),
}

impl ParsedDate {
    /// Renders the date as `YYYY-MM-DDTHH:MM:SS[.ffffff][+HH:MM]`.
    #[must_use]
    pub fn isoformat(&self) -> String {
        match self {
            Self::Naive(dt) => format_naive(dt),
            Self::Offset(dt) => {
                let mut out = format_naive(&dt.naive_local());
                out.push_str(&dt.format("%:z").to_string());
                out
            },
        }
    }
}

fn format_naive(dt: &NaiveDateTime) -> String {
    let micros = dt.nanosecond() / 1_000;
    if micros == 0 {
        dt.format("%Y-%m-%dT%H:%M:%S").to_string()
    } else {
        format!("{}.{micros:06}", dt.format("%Y-%m-%dT%H:%M:%S"))
    }
}

/// Parses a loosely formatted date, day first.
///
/// Returns `None` when no supported shape matches.
#[must_use]
pub fn parse_flexible(raw: &str) -> Option<ParsedDate> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(ParsedDate::Offset(dt));
    }
    for format in OFFSET_DATE_TIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(value, format) {
            return Some(ParsedDate::Offset(dt));
        }
    }
    for format in DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(ParsedDate::Naive(dt));
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(ParsedDate::Naive(date.and_time(NaiveTime::MIN)));
        }
    }
    parse_partial(value).map(ParsedDate::Naive)
}

/// Year or month-and-year; missing components come from the epoch.
fn parse_partial(value: &str) -> Option<NaiveDateTime> {
    let (year, month) = if let Some(caps) = YEAR.captures(value) {
        (caps[1].parse().ok()?, 1)
    } else if let Some(caps) = MONTH_YEAR.captures(value) {
        (caps[2].parse().ok()?, caps[1].parse().ok()?)
    } else if let Some(caps) = YEAR_MONTH.captures(value) {
        (caps[1].parse().ok()?, caps[2].parse().ok()?)
    } else {
        return None;
    };
    NaiveDate::from_ymd_opt(year, month, 1).map(|d| d.and_time(NaiveTime::MIN))
}

/// Turns a raw date string into an `xsd:dateTime` literal, or the raw
/// string as a plain literal if it cannot be parsed.
#[must_use]
pub fn normalize(raw: &str) -> RdfNode {
    match parse_flexible(raw) {
        Some(date) => RdfNode::xsd_literal(date.isoformat(), xsd::DATE_TIME),
        None => {
            log::debug!("Keeping unparseable date {raw:?} as plain literal");
            RdfNode::literal(raw)
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iso(raw: &str) -> Option<String> {
        parse_flexible(raw).map(|d| d.isoformat())
    }

    #[test]
    fn test_day_first() {
        assert_eq!(iso("04.03.2015").as_deref(), Some("2015-03-04T00:00:00"));
        assert_eq!(iso("04/03/2015").as_deref(), Some("2015-03-04T00:00:00"));
        assert_eq!(
            iso("04.03.2015, 10:30").as_deref(),
            Some("2015-03-04T10:30:00")
        );
    }

    #[test]
    fn test_iso_timestamps() {
        assert_eq!(
            iso("2021-06-01T08:15:30.123456").as_deref(),
            Some("2021-06-01T08:15:30.123456")
        );
        assert_eq!(
            iso("2021-06-01T08:15:30Z").as_deref(),
            Some("2021-06-01T08:15:30+00:00")
        );
        assert_eq!(
            iso("2021-06-01T08:15:30+02:00").as_deref(),
            Some("2021-06-01T08:15:30+02:00")
        );
        assert_eq!(iso("2021-06-01").as_deref(), Some("2021-06-01T00:00:00"));
    }

    #[test]
    fn test_space_separated_timestamp_keeps_offset() {
        assert_eq!(
            iso("2015-03-04 10:30:00+02:00").as_deref(),
            Some("2015-03-04T10:30:00+02:00")
        );
        assert_eq!(
            iso("2015-03-04 10:30:00.5+0100").as_deref(),
            Some("2015-03-04T10:30:00.500000+01:00")
        );
        assert_eq!(
            normalize("2015-03-04 10:30:00+02:00").datatype(),
            Some("http://www.w3.org/2001/XMLSchema#dateTime")
        );
    }

    #[test]
    fn test_partial_dates_default_to_epoch_components() {
        assert_eq!(iso("2015").as_deref(), Some("2015-01-01T00:00:00"));
        assert_eq!(iso("03.2015").as_deref(), Some("2015-03-01T00:00:00"));
        assert_eq!(iso("2015-03").as_deref(), Some("2015-03-01T00:00:00"));
    }

    #[test]
    fn test_unparseable() {
        assert!(iso("").is_none());
        assert!(iso("bald").is_none());
        assert!(iso("31.02.2015").is_none());
    }

    #[test]
    fn test_normalize_literal_types() {
        let parsed = normalize("04.03.2015");
        assert_eq!(parsed.value(), "2015-03-04T00:00:00");
        assert_eq!(
            parsed.datatype(),
            Some("http://www.w3.org/2001/XMLSchema#dateTime")
        );

        let raw = normalize("Frühling 2015");
        assert_eq!(raw, RdfNode::literal("Frühling 2015"));
    }
}
