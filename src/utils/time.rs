use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::DayflowError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Parse a time-of-day in "HH:MM" form. Seconds are always zero.
pub fn parse_hhmm(s: &str) -> Result<NaiveTime, DayflowError> {
    NaiveTime::parse_from_str(s.trim(), TIME_FORMAT)
        .map_err(|_| DayflowError::InvalidTime(s.to_string()))
}

pub fn parse_date(s: &str) -> Result<NaiveDate, DayflowError> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|_| DayflowError::InvalidDate(s.to_string()))
}

/// Parse an ISO-8601 date-time into local wall-clock time.
/// Accepts naive local timestamps (with or without fractional seconds) and
/// RFC 3339 strings carrying an offset, which are converted to local time.
pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime, DayflowError> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Local).naive_local());
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M"))
        .map_err(|_| DayflowError::InvalidTimestamp(s.to_string()))
}

pub fn format_date(d: NaiveDate) -> String {
    d.format(DATE_FORMAT).to_string()
}

pub fn format_timestamp(t: NaiveDateTime) -> String {
    t.format(TIMESTAMP_FORMAT).to_string()
}
