//! Timestamp helpers for item bookkeeping fields.
//!
//! Items carry `createdAt`/`updatedAt` as ISO-8601 UTC strings with millisecond
//! precision (`2024-01-15T10:30:00.000Z`). The fixed width keeps them
//! lexicographically sortable inside the store.

use chrono::{DateTime, Duration, SecondsFormat, SubsecRound, Utc};

/// Formats a timestamp as an ISO-8601 UTC string with millisecond precision.
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parses an RFC 3339 timestamp into UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(value).map(|dt| dt.with_timezone(&Utc))
}

/// Drops sub-millisecond precision so a timestamp survives a format/parse cycle.
pub fn truncate_to_millis(timestamp: DateTime<Utc>) -> DateTime<Utc> {
    timestamp.trunc_subsecs(3)
}

/// Returns a modification timestamp strictly after `previous`.
///
/// `now` wins unless it does not move past `previous` at millisecond
/// precision, in which case `previous + 1ms` is used.
pub fn next_timestamp(now: DateTime<Utc>, previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = truncate_to_millis(now);
    let previous = truncate_to_millis(previous);
    if now > previous {
        now
    } else {
        previous + Duration::milliseconds(1)
    }
}
