//! iCalendar document rendering.
//!
//! Builds the calendar object that gets PUT to the server: a VCALENDAR
//! wrapper (RFC 5545) around exactly one VEVENT, with the caller's four
//! fields interpolated into a fixed template.

use std::fmt;

use chrono::{DateTime, Utc};

use calpush_core::event::EventInput;
use calpush_core::time::{epoch_millis, format_utc_basic};

/// The static product identifier line of generated documents.
pub const PRODID: &str = "-//calpush//calpush-caldav//EN";

/// A per-call event identifier.
///
/// Minted from the wall clock as `icloud-<epoch millis>`. Unique per call at
/// the expected call rate; two calls landing in the same millisecond would
/// collide, so high-frequency concurrent publishers must treat collisions as
/// possible.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct EventUid(String);

impl EventUid {
    /// Prefix carried by every generated identifier.
    pub const PREFIX: &'static str = "icloud-";

    /// Mints an identifier from the current wall clock.
    pub fn mint() -> Self {
        Self::from_millis(epoch_millis(Utc::now()))
    }

    /// Builds an identifier from an explicit epoch-millisecond value.
    pub fn from_millis(millis: i64) -> Self {
        Self(format!("{}{}", Self::PREFIX, millis))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for EventUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventUid({})", self.0)
    }
}

/// Escapes a TEXT value per RFC 5545 §3.3.11.
///
/// Backslash, semicolon, and comma are backslash-escaped; line breaks become
/// the literal `\n` sequence.
pub fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out
}

/// Renders the calendar object for one event.
///
/// SUMMARY and DESCRIPTION are escaped when `escape` is set; start and end
/// are opaque caller-supplied timestamps and always pass through verbatim.
/// Lines are CRLF-terminated as RFC 5545 requires.
pub fn render_event(
    uid: &EventUid,
    dtstamp: DateTime<Utc>,
    input: &EventInput,
    escape: bool,
) -> String {
    let text = |value: &str| -> String {
        if escape {
            escape_text(value)
        } else {
            value.to_string()
        }
    };

    format!(
        "BEGIN:VCALENDAR\r\n\
         VERSION:2.0\r\n\
         PRODID:{prodid}\r\n\
         CALSCALE:GREGORIAN\r\n\
         BEGIN:VEVENT\r\n\
         UID:{uid}\r\n\
         DTSTAMP:{dtstamp}\r\n\
         DTSTART:{start}\r\n\
         DTEND:{end}\r\n\
         SUMMARY:{summary}\r\n\
         DESCRIPTION:{description}\r\n\
         END:VEVENT\r\n\
         END:VCALENDAR\r\n",
        prodid = PRODID,
        uid = uid,
        dtstamp = format_utc_basic(dtstamp),
        start = input.start,
        end = input.end,
        summary = text(&input.summary),
        description = text(&input.description),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_input() -> EventInput {
        EventInput::new(
            "20250101T090000Z",
            "20250101T100000Z",
            "Meeting",
            "Weekly sync",
        )
    }

    fn sample_dtstamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 8, 30, 0).unwrap()
    }

    #[test]
    fn uid_has_prefix_and_millis() {
        let uid = EventUid::from_millis(1_736_000_000_000);
        assert_eq!(uid.as_str(), "icloud-1736000000000");
    }

    #[test]
    fn distinct_millis_yield_distinct_uids() {
        let a = EventUid::from_millis(1);
        let b = EventUid::from_millis(2);
        assert_ne!(a, b);
        assert_ne!(a.as_str(), b.as_str());
    }

    #[test]
    fn minted_uid_is_well_formed() {
        let uid = EventUid::mint();
        let millis = uid.as_str().strip_prefix(EventUid::PREFIX).unwrap();
        assert!(!millis.is_empty());
        assert!(millis.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn rendered_document_contains_event_fields() {
        let uid = EventUid::from_millis(1_736_000_000_000);
        let doc = render_event(&uid, sample_dtstamp(), &sample_input(), true);

        assert_eq!(doc.matches("BEGIN:VEVENT").count(), 1);
        assert_eq!(doc.matches("END:VEVENT").count(), 1);
        assert!(doc.contains("UID:icloud-1736000000000\r\n"));
        assert!(doc.contains("DTSTAMP:20250101T083000Z\r\n"));
        assert!(doc.contains("DTSTART:20250101T090000Z\r\n"));
        assert!(doc.contains("DTEND:20250101T100000Z\r\n"));
        assert!(doc.contains("SUMMARY:Meeting\r\n"));
        assert!(doc.contains("DESCRIPTION:Weekly sync\r\n"));
        assert!(doc.starts_with("BEGIN:VCALENDAR\r\n"));
        assert!(doc.ends_with("END:VCALENDAR\r\n"));
    }

    #[test]
    fn rendered_document_parses_as_icalendar() {
        let uid = EventUid::from_millis(1_736_000_000_000);
        let doc = render_event(&uid, sample_dtstamp(), &sample_input(), true);

        let calendar: icalendar::Calendar = doc.parse().expect("rendered document must parse");
        let events = calendar
            .iter()
            .filter(|c| matches!(c, icalendar::CalendarComponent::Event(_)))
            .count();
        assert_eq!(events, 1);
    }

    #[test]
    fn escape_text_handles_reserved_characters() {
        assert_eq!(escape_text("a;b,c\\d"), "a\\;b\\,c\\\\d");
        assert_eq!(escape_text("line1\nline2"), "line1\\nline2");
        assert_eq!(escape_text("line1\r\nline2"), "line1\\nline2");
        assert_eq!(escape_text("plain"), "plain");
    }

    #[test]
    fn escaped_rendering_keeps_description_on_one_line() {
        let input = EventInput::new(
            "20250101T090000Z",
            "20250101T100000Z",
            "Status; update",
            "line1\nline2",
        );
        let uid = EventUid::from_millis(42);
        let doc = render_event(&uid, sample_dtstamp(), &input, true);

        assert!(doc.contains("SUMMARY:Status\\; update\r\n"));
        assert!(doc.contains("DESCRIPTION:line1\\nline2\r\n"));
    }

    #[test]
    fn verbatim_rendering_preserves_the_legacy_gap() {
        let input = EventInput::new(
            "20250101T090000Z",
            "20250101T100000Z",
            "Status; update",
            "line1\nline2",
        );
        let uid = EventUid::from_millis(42);
        let doc = render_event(&uid, sample_dtstamp(), &input, false);

        // Verbatim mode keeps the raw newline, leaving the DESCRIPTION
        // property broken across two lines.
        assert!(doc.contains("SUMMARY:Status; update\r\n"));
        assert!(doc.contains("DESCRIPTION:line1\nline2\r\n"));
    }
}
