use chrono::{NaiveDate, NaiveDateTime};

use crate::constants::{CANONICAL_DATETIME_FORMAT, CANONICAL_DATE_FORMAT};

/// Accepted input date patterns, tried in order. Month-first wins over
/// day-first for ambiguous slash/dash dates.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",   // YYYY-MM-DD
    "%m/%d/%Y",   // MM/DD/YYYY
    "%d/%m/%Y",   // DD/MM/YYYY
    "%m-%d-%Y",   // MM-DD-YYYY
    "%d-%m-%Y",   // DD-MM-YYYY
    "%b %d, %Y",  // Jan 02, 2006
    "%B %d, %Y",  // January 02, 2006
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M",
];

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
}

/// Reformat a date to `YYYY-MM-DD`, or return the input unchanged when no
/// known pattern matches.
pub fn normalize_date(raw: &str) -> String {
    match parse_date(raw) {
        Some(date) => date.format(CANONICAL_DATE_FORMAT).to_string(),
        None => raw.to_string(),
    }
}

/// Reformat a timestamp to `YYYY-MM-DDTHH:MM:SS`. Date-only values are
/// placed at midnight.
pub fn normalize_datetime(raw: &str) -> String {
    let value = raw.trim();
    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
    {
        return dt.format(CANONICAL_DATETIME_FORMAT).to_string();
    }

    match parse_date(value).and_then(|d| d.and_hms_opt(0, 0, 0)) {
        Some(midnight) => midnight.format(CANONICAL_DATETIME_FORMAT).to_string(),
        None => raw.to_string(),
    }
}

/// Heuristic used by the generic processor to spot date-bearing columns.
pub fn looks_like_date_column(header: &str) -> bool {
    header.contains("date") || header.contains("time")
}
