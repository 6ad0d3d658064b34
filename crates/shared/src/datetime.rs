//! Lenient instant parsing.
//!
//! Window bounds arrive from configuration files, environment variables and
//! database rows written by older tooling, so several textual layouts and
//! raw epoch numbers are accepted.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};

/// Epoch values at or above this magnitude are taken as milliseconds.
const EPOCH_MILLIS_THRESHOLD: i64 = 100_000_000_000;

/// Layouts carrying no offset; interpreted in the caller-supplied offset.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
];

/// Layouts carrying an explicit offset.
const OFFSET_DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f %z"];

/// Converts a UTC offset in minutes into a [`FixedOffset`], falling back to UTC
/// when the value is out of range.
pub fn offset_from_minutes(minutes: i32) -> FixedOffset {
    minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .unwrap_or_else(|| Utc.fix())
}

/// Interprets an epoch number as seconds or milliseconds depending on magnitude.
pub fn from_epoch(value: i64) -> Option<DateTime<Utc>> {
    if value.abs() >= EPOCH_MILLIS_THRESHOLD {
        Utc.timestamp_millis_opt(value).single()
    } else {
        Utc.timestamp_opt(value, 0).single()
    }
}

/// Parses an instant from text.
///
/// Accepted inputs, in order: integer epoch (seconds or millis), RFC 3339,
/// offset-qualified `YYYY-MM-DD HH:MM:SS[.fff]±HH:MM`, naive datetimes with
/// optional fractional seconds, and bare dates (midnight). Naive values are
/// read in `offset`.
pub fn parse_instant(raw: &str, offset: FixedOffset) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(epoch) = s.parse::<i64>() {
        return from_epoch(epoch);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in OFFSET_DATETIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return localize(naive, offset);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).and_then(|n| localize(n, offset));
    }

    None
}

fn localize(naive: NaiveDateTime, offset: FixedOffset) -> Option<DateTime<Utc>> {
    offset
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Truncates a client-supplied datetime string to millisecond precision
/// (`YYYY-MM-DDTHH:MM:SS.mmm`, 23 characters).
pub fn truncate_to_millis(raw: &str) -> String {
    raw.chars().take(23).collect()
}
