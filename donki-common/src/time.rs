//! Timestamp utilities
//!
//! The calendar-string helpers produce the connector's legacy format: year,
//! zero-based month, day and hour concatenated without separators or zero
//! padding. January 5th 2018 03:00 UTC therefore renders as `2018053` at
//! hour precision, not `2018010503`. Reports built against the connector
//! depend on these exact strings.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc};

/// Year, zero-based month, day and hour, unpadded
pub fn to_hour_precision(t: &DateTime<Utc>) -> String {
    format!("{}{}{}{}", t.year(), t.month0(), t.day(), t.hour())
}

/// Year, zero-based month and day, unpadded
pub fn to_day_precision(t: &DateTime<Utc>) -> String {
    format!("{}{}{}", t.year(), t.month0(), t.day())
}

/// Year and zero-based month, unpadded
pub fn to_month_precision(t: &DateTime<Utc>) -> String {
    format!("{}{}", t.year(), t.month0())
}

/// Left-pad `value` to `width` characters with `pad_char`
///
/// Values already at or beyond `width` are returned unchanged.
pub fn pad(value: impl ToString, width: usize, pad_char: Option<char>) -> String {
    let pad_char = pad_char.unwrap_or('0');
    let value = value.to_string();
    let len = value.chars().count();
    if len >= width {
        return value;
    }

    let mut padded: String = std::iter::repeat(pad_char).take(width - len).collect();
    padded.push_str(&value);
    padded
}

/// Parse an upstream timestamp as UTC
///
/// Accepts RFC 3339 (`2023-03-01T05:00:00Z`), the minute-resolution form
/// DONKI emits (`2023-03-01T05:00Z`) and a bare date (`2023-03-01`, midnight).
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%MZ", "%Y-%m-%dT%H:%M:%S%.fZ", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}
