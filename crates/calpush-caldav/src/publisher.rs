//! The event publisher: builds a calendar object and performs exactly one
//! network write.
//!
//! `publish` is a single-shot request/response with two terminal outcomes.
//! Every failure is caught at this boundary and folded into the
//! [`PublishResult`] record; nothing propagates further up, nothing is
//! retried. A retried call mints a fresh identifier and thus a fresh
//! resource rather than overwriting the prior attempt.

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};

use calpush_core::event::EventInput;

use crate::auth::Credentials;
use crate::client::CalDavClient;
use crate::config::CalDavConfig;
use crate::error::{CalDavError, CalDavResult};
use crate::ics::{render_event, EventUid};
use crate::xml::{
    parse_calendar_home_response, parse_ics_hrefs, propfind_calendars_body,
    propfind_members_body, DiscoveredCalendar,
};

/// The result record handed back to the caller of [`EventPublisher::publish`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishResult {
    /// HTTP-style status code: 201 on success, the remote status (or 500)
    /// on failure.
    pub status: u16,
    /// Whether the event was stored.
    pub success: bool,
    /// The generated event identifier, on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    /// Human-readable success message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Failure message, on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PublishResult {
    /// Status reported when a failure carries no remote status code.
    pub const FALLBACK_FAILURE_STATUS: u16 = 500;

    /// The success record for a freshly created event.
    pub fn created(uid: &EventUid) -> Self {
        Self {
            status: 201,
            success: true,
            identifier: Some(uid.as_str().to_string()),
            message: Some("Event created".to_string()),
            error: None,
        }
    }

    /// The failure record for the given error.
    pub fn failure(err: &CalDavError) -> Self {
        Self {
            status: err.status().unwrap_or(Self::FALLBACK_FAILURE_STATUS),
            success: false,
            identifier: None,
            message: None,
            error: Some(err.message().to_string()),
        }
    }
}

/// Publishes calendar events to one configured CalDAV calendar collection.
///
/// Holds no mutable state; each call is independent.
pub struct EventPublisher {
    /// HTTP client for CalDAV operations.
    client: CalDavClient,
    /// Target configuration.
    config: CalDavConfig,
}

impl EventPublisher {
    /// Creates a publisher for the given target.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built.
    pub fn new(config: CalDavConfig) -> CalDavResult<Self> {
        let client = CalDavClient::new(config.clone())?;
        Ok(Self { client, config })
    }

    /// Returns the target configuration.
    pub fn config(&self) -> &CalDavConfig {
        &self.config
    }

    /// Builds a calendar object from `input` and issues a single PUT to the
    /// configured calendar collection.
    ///
    /// All failures are converted into the result record; this method never
    /// returns an error and never retries.
    pub async fn publish(&self, input: &EventInput, creds: &Credentials) -> PublishResult {
        match self.try_publish(input, creds).await {
            Ok(uid) => {
                info!(uid = %uid, "Event created");
                PublishResult::created(&uid)
            }
            Err(e) => {
                warn!(error = %e, "Publish failed");
                PublishResult::failure(&e)
            }
        }
    }

    async fn try_publish(
        &self,
        input: &EventInput,
        creds: &Credentials,
    ) -> CalDavResult<EventUid> {
        let uid = EventUid::mint();
        let document = render_event(&uid, Utc::now(), input, self.config.escape_text);
        let target = self.config.event_url(uid.as_str())?;

        debug!(target = %target, "Publishing calendar object");

        let status = self
            .client
            .put_calendar_object(&target, document, creds)
            .await?;

        debug!(status = %status, uid = %uid, "Calendar server accepted object");
        Ok(uid)
    }

    /// Checks that the server accepts the credentials.
    ///
    /// Issues a Depth-0 PROPFIND against the server root; a multistatus
    /// answer means the credentials are valid.
    ///
    /// # Errors
    ///
    /// Returns a remote rejection (401 from the server) for bad credentials,
    /// or a transport error if the host is unreachable.
    pub async fn verify_credentials(&self, creds: &Credentials) -> CalDavResult<()> {
        let url = self.config.server_url.clone();
        debug!(url = %url, "Verifying credentials via PROPFIND");
        self.client.propfind(&url, None, 0, creds).await.map(|_| ())
    }

    /// Lists the calendar collections of the configured principal.
    ///
    /// # Errors
    ///
    /// Returns a transport or remote error when the PROPFIND fails.
    pub async fn list_calendars(
        &self,
        creds: &Credentials,
    ) -> CalDavResult<Vec<DiscoveredCalendar>> {
        let url = self.config.calendars_home_url()?;
        let body = propfind_calendars_body();

        debug!(url = %url, "Discovering calendars via PROPFIND");

        let xml = self.client.propfind(&url, Some(&body), 1, creds).await?;
        let calendars = parse_calendar_home_response(&xml, url.path());

        info!(count = calendars.len(), "Discovered calendars");
        Ok(calendars)
    }

    /// Lists the hrefs of the event resources in the configured calendar.
    ///
    /// # Errors
    ///
    /// Returns a transport or remote error when the PROPFIND fails.
    pub async fn list_event_hrefs(&self, creds: &Credentials) -> CalDavResult<Vec<String>> {
        let url = self.config.calendar_url()?;
        let body = propfind_members_body();

        debug!(url = %url, "Listing event resources via PROPFIND");

        let xml = self.client.propfind(&url, Some(&body), 1, creds).await?;
        let hrefs = parse_ics_hrefs(&xml);

        debug!(count = hrefs.len(), "Listed event resources");
        Ok(hrefs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publisher_creation() {
        let config = CalDavConfig::icloud("USER123", "CAL456").unwrap();
        let publisher = EventPublisher::new(config);
        assert!(publisher.is_ok());
    }

    #[test]
    fn created_result_shape() {
        let uid = EventUid::from_millis(1_736_000_000_000);
        let result = PublishResult::created(&uid);

        assert_eq!(result.status, 201);
        assert!(result.success);
        assert_eq!(result.identifier.as_deref(), Some("icloud-1736000000000"));
        assert_eq!(result.message.as_deref(), Some("Event created"));
        assert!(result.error.is_none());
    }

    #[test]
    fn failure_result_uses_remote_status() {
        let err = CalDavError::remote(401, "Unauthorized");
        let result = PublishResult::failure(&err);

        assert_eq!(result.status, 401);
        assert!(!result.success);
        assert!(result.identifier.is_none());
        assert!(result.message.is_none());
        assert_eq!(result.error.as_deref(), Some("Unauthorized"));
    }

    #[test]
    fn failure_result_defaults_to_500_without_status() {
        let err = CalDavError::transport("connection refused");
        let result = PublishResult::failure(&err);

        assert_eq!(result.status, 500);
        assert_eq!(result.error.as_deref(), Some("connection refused"));
    }

    #[test]
    fn result_serialization_skips_absent_fields() {
        let uid = EventUid::from_millis(7);
        let json = serde_json::to_value(PublishResult::created(&uid)).unwrap();

        assert_eq!(json["status"], 201);
        assert_eq!(json["success"], true);
        assert_eq!(json["identifier"], "icloud-7");
        assert_eq!(json["message"], "Event created");
        assert!(json.get("error").is_none());

        let json = serde_json::to_value(PublishResult::failure(&CalDavError::transport(
            "no route to host",
        )))
        .unwrap();
        assert!(json.get("identifier").is_none());
        assert!(json.get("message").is_none());
        assert_eq!(json["error"], "no route to host");
    }
}
