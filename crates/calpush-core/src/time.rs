//! UTC basic-format time handling.
//!
//! CalDAV stores and the iCalendar format use the "basic" UTC representation
//! `YYYYMMDDTHHMMSSZ` — an ISO-8601 timestamp with `-` and `:` stripped and
//! the sub-second fraction dropped.

use chrono::{DateTime, Utc};

/// The iCalendar basic UTC format string.
pub const UTC_BASIC_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Formats a datetime in basic UTC format.
pub fn format_utc_basic(dt: DateTime<Utc>) -> String {
    dt.format(UTC_BASIC_FORMAT).to_string()
}

/// The current time in basic UTC format.
pub fn now_utc_basic() -> String {
    format_utc_basic(Utc::now())
}

/// Milliseconds since the Unix epoch for the given instant.
pub fn epoch_millis(dt: DateTime<Utc>) -> i64 {
    dt.timestamp_millis()
}
