//! Timestamp parsing and duration arithmetic.
//!
//! Timestamps arrive as ISO 8601 strings and are stored verbatim, so every
//! calculation re-parses on demand. Strings without a UTC offset are read as
//! UTC, which keeps results independent of the host timezone.

use chrono::{DateTime, FixedOffset, NaiveDateTime};

/// Parse an ISO 8601 timestamp, with or without an explicit offset.
pub fn parse_timestamp(s: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt);
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc().fixed_offset())
}

/// Whole minutes between two timestamps, floored. Returns a negative count
/// when `end` precedes `start`, and 0 when either side fails to parse.
pub fn duration_minutes(start: &str, end: &str) -> i64 {
    match (parse_timestamp(start), parse_timestamp(end)) {
        (Some(s), Some(e)) => (e.timestamp_millis() - s.timestamp_millis()).div_euclid(60_000),
        _ => 0,
    }
}
