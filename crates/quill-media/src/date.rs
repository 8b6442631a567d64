//! Publication date formatting.
//!
//! CMS dates arrive as strings in a handful of shapes (`2024-03-09`,
//! `2024-03-09 14:30`, RFC 3339 timestamps). Dates with an offset are
//! normalized to UTC before the calendar date is taken.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Text rendered in place of a date that could not be parsed.
pub const INVALID_DATE: &str = "Invalid Date";

/// Layouts accepted for dates with a time but without an offset.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Date parsing error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateError {
    /// The input was empty or whitespace.
    #[error("empty date")]
    Empty,
    /// The input matched none of the accepted layouts.
    #[error("unrecognized date: {0}")]
    Unrecognized(String),
}

/// Parse a CMS date string into a calendar date.
pub fn parse_date(input: &str) -> Result<NaiveDate, DateError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(DateError::Empty);
    }

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(input) {
        return Ok(timestamp.with_timezone(&Utc).date_naive());
    }
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(date);
    }

    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
        .map(|datetime| datetime.date())
        .ok_or_else(|| DateError::Unrecognized(input.to_owned()))
}

/// Format a date as `DD.MM.YYYY`, or [`INVALID_DATE`].
///
/// # Examples
///
/// ```
/// use quill_media::format_date;
///
/// assert_eq!(format_date("1970-01-01"), "01.01.1970");
/// assert_eq!(format_date("soon"), "Invalid Date");
/// ```
pub fn format_date(input: &str) -> String {
    format_with(input, "%d.%m.%Y")
}

/// Format a date as `YYYY-MM-DD`, or [`INVALID_DATE`].
pub fn format_date_iso(input: &str) -> String {
    format_with(input, "%Y-%m-%d")
}

fn format_with(input: &str, layout: &str) -> String {
    parse_date(input).map_or_else(
        |_| INVALID_DATE.to_owned(),
        |date| date.format(layout).to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_date_plain() {
        assert_eq!(format_date("2024-03-09"), "09.03.2024");
        assert_eq!(format_date_iso("2024-03-09"), "2024-03-09");
    }

    #[test]
    fn test_format_cms_datetime() {
        assert_eq!(format_date("2024-03-09 14:30"), "09.03.2024");
        assert_eq!(format_date("2024-03-09 14:30:15"), "09.03.2024");
        assert_eq!(format_date_iso("2024-12-31T23:59"), "2024-12-31");
        assert_eq!(format_date_iso("2024-12-31T23:59:59.123"), "2024-12-31");
    }

    #[test]
    fn test_rfc3339_normalized_to_utc() {
        assert_eq!(format_date_iso("2024-01-01T01:00:00+02:00"), "2023-12-31");
        assert_eq!(format_date("2024-06-15T10:00:00Z"), "15.06.2024");
    }

    #[test]
    fn test_surrounding_whitespace() {
        assert_eq!(format_date("  2024-03-09\n"), "09.03.2024");
    }

    #[test]
    fn test_invalid_dates() {
        assert_eq!(format_date("not a date"), INVALID_DATE);
        assert_eq!(format_date_iso("2024-02-30"), INVALID_DATE);
        assert_eq!(format_date(""), INVALID_DATE);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse_date("   "), Err(DateError::Empty));
        assert_eq!(
            parse_date("tomorrow"),
            Err(DateError::Unrecognized("tomorrow".to_owned()))
        );
    }
}
