//! Timestamp to calendar-day conversion.

use chrono::format::{Parsed, StrftimeItems, parse};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Layouts with a UTC offset. `%z` takes `+hhmm` as well as `+hh:mm`.
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%z",
];

/// Naive date-time layouts accepted when the timestamp has no offset.
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Layouts too coarse for a full date-time. Only the date fields are kept,
/// but the hour and offset must still be valid.
const DATE_PREFIX_FORMATS: &[&str] = &["%Y-%m-%dT%H", "%Y-%m-%dT%H%z", "%Y-%m-%d"];

/// Parses an ISO-8601 timestamp into the calendar day it falls on.
///
/// Timestamps with an offset keep their local date: `2024-03-01T23:30:00-05:00`
/// is March 1st even though it is March 2nd in UTC. Returns `None` for
/// anything unparseable.
#[must_use]
pub fn parse_day_key(timestamp: &str) -> Option<NaiveDate> {
    let s = timestamp.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, format) {
            return Some(dt.date_naive());
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.date());
        }
    }
    DATE_PREFIX_FORMATS
        .iter()
        .find_map(|format| parse_date_fields(s, format))
}

fn parse_date_fields(s: &str, format: &str) -> Option<NaiveDate> {
    let mut parsed = Parsed::new();
    parse(&mut parsed, s, StrftimeItems::new(format)).ok()?;
    parsed.to_naive_date().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn keeps_local_date_for_offset_timestamps() {
        assert_eq!(
            parse_day_key("2024-03-01T23:30:00.000-05:00"),
            Some(date(2024, 3, 1))
        );
        assert_eq!(parse_day_key("2024-03-01T00:10:00+09:00"), Some(date(2024, 3, 1)));
    }

    #[test]
    fn parses_utc_and_naive_timestamps() {
        assert_eq!(parse_day_key("2024-12-31T23:59:59Z"), Some(date(2024, 12, 31)));
        assert_eq!(parse_day_key("2024-07-04T12:00:00"), Some(date(2024, 7, 4)));
        assert_eq!(parse_day_key("2024-07-04 12:00:00.250"), Some(date(2024, 7, 4)));
        assert_eq!(parse_day_key("2024-07-04"), Some(date(2024, 7, 4)));
    }

    #[test]
    fn parses_offsets_without_colon() {
        assert_eq!(parse_day_key("2024-03-01T09:15:00-0500"), Some(date(2024, 3, 1)));
        assert_eq!(parse_day_key("2024-03-01T09:15:00.000+0100"), Some(date(2024, 3, 1)));
        assert_eq!(parse_day_key("2024-03-01 23:15:00-0500"), Some(date(2024, 3, 1)));
        assert_eq!(parse_day_key("2024-03-01 09:15:00-05:00"), Some(date(2024, 3, 1)));
        assert_eq!(parse_day_key("2024-03-01T09:15+0100"), Some(date(2024, 3, 1)));
    }

    #[test]
    fn parses_hour_only_times() {
        assert_eq!(parse_day_key("2024-03-01T09"), Some(date(2024, 3, 1)));
        assert_eq!(parse_day_key("2024-03-01T23-0500"), Some(date(2024, 3, 1)));
        assert!(parse_day_key("2024-03-01T25").is_none());
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_day_key("yesterday").is_none());
        assert!(parse_day_key("").is_none());
        assert!(parse_day_key("2024-13-01T00:00:00Z").is_none());
        assert!(parse_day_key("2024-03-01T09:15:00+9999").is_none());
    }
}
