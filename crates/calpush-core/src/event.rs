//! The event input record supplied by an upstream caller.

use serde::{Deserialize, Serialize};

/// The four caller-supplied fields of a calendar event.
///
/// Values are opaque text. Start and end are expected in UTC basic format
/// (`YYYYMMDDTHHMMSSZ`) but are not validated here; they are interpolated
/// into the calendar object as-is. The serde aliases accept the localized
/// field labels (`eind`, `Eventnaam`, `omschrijving`) used by the upstream
/// workflow that feeds this library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventInput {
    /// Event start, e.g. `20250101T090000Z`.
    pub start: String,
    /// Event end.
    #[serde(alias = "eind")]
    pub end: String,
    /// Display name of the event.
    #[serde(alias = "Eventnaam")]
    pub summary: String,
    /// Free-text description.
    #[serde(alias = "omschrijving")]
    pub description: String,
}

impl EventInput {
    /// Creates a new event input from its four fields.
    pub fn new(
        start: impl Into<String>,
        end: impl Into<String>,
        summary: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            summary: summary.into(),
            description: description.into(),
        }
    }
}
