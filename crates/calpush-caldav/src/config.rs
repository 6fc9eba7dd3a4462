//! CalDAV target configuration.
//!
//! Everything the publisher needs is carried explicitly on this value; no
//! process-wide state, no environment lookups.

use std::time::Duration;

use url::Url;

use crate::auth::Credentials;
use crate::error::{CalDavError, CalDavResult};

/// Configuration for a CalDAV calendar target.
#[derive(Debug, Clone)]
pub struct CalDavConfig {
    /// Base URL of the CalDAV server.
    pub server_url: Url,

    /// The principal (user) identifier on the server.
    pub user_id: String,

    /// The calendar collection identifier.
    pub calendar_id: String,

    /// Statically configured email, used when the caller supplies no
    /// Authorization header.
    pub email: Option<String>,

    /// Statically configured password.
    pub password: Option<String>,

    /// Whether to verify TLS certificates.
    pub verify_tls: bool,

    /// Request timeout.
    pub timeout: Duration,

    /// User agent string.
    pub user_agent: String,

    /// Whether SUMMARY and DESCRIPTION values are escaped per RFC 5545
    /// before interpolation. Disable to reproduce verbatim interpolation.
    pub escape_text: bool,
}

impl CalDavConfig {
    /// The iCloud CalDAV endpoint.
    pub const ICLOUD_SERVER_URL: &'static str = "https://caldav.icloud.com/";

    /// Default request timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

    /// Creates a configuration for the given server, principal, and calendar.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the server URL is invalid.
    pub fn new(
        server_url: impl AsRef<str>,
        user_id: impl Into<String>,
        calendar_id: impl Into<String>,
    ) -> CalDavResult<Self> {
        let parsed = Url::parse(server_url.as_ref()).map_err(|e| {
            CalDavError::configuration(format!(
                "invalid CalDAV server URL {:?}",
                server_url.as_ref()
            ))
            .with_source(e)
        })?;

        Ok(Self {
            server_url: parsed,
            user_id: user_id.into(),
            calendar_id: calendar_id.into(),
            email: None,
            password: None,
            verify_tls: true,
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            user_agent: format!("calpush/{}", env!("CARGO_PKG_VERSION")),
            escape_text: true,
        })
    }

    /// Creates a configuration pointed at the iCloud CalDAV endpoint.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if URL parsing fails.
    pub fn icloud(
        user_id: impl Into<String>,
        calendar_id: impl Into<String>,
    ) -> CalDavResult<Self> {
        Self::new(Self::ICLOUD_SERVER_URL, user_id, calendar_id)
    }

    /// Sets the statically configured credentials.
    pub fn with_credentials(
        mut self,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.email = Some(email.into());
        self.password = Some(password.into());
        self
    }

    /// Disables TLS verification (for testing only).
    pub fn with_insecure_tls(mut self) -> Self {
        self.verify_tls = false;
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the user agent string.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Interpolates SUMMARY and DESCRIPTION verbatim instead of escaping
    /// them per RFC 5545.
    pub fn with_verbatim_text(mut self) -> Self {
        self.escape_text = false;
        self
    }

    /// Returns the statically configured credentials, when both halves are
    /// present.
    pub fn static_credentials(&self) -> Option<Credentials> {
        match (&self.email, &self.password) {
            (Some(email), Some(password)) => Some(Credentials::new(email, password)),
            _ => None,
        }
    }

    /// Returns true if static credentials are configured.
    pub fn has_credentials(&self) -> bool {
        self.email.is_some() && self.password.is_some()
    }

    /// The URL of the configured calendar collection:
    /// `<server>/<user-id>/calendars/<calendar-id>`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the composed URL does not parse.
    pub fn calendar_url(&self) -> CalDavResult<Url> {
        self.parse_composed(format!(
            "{}/{}/calendars/{}",
            self.server_base(),
            self.user_id,
            self.calendar_id
        ))
    }

    /// The URL of the principal's calendar home collection:
    /// `<server>/<user-id>/calendars/`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the composed URL does not parse.
    pub fn calendars_home_url(&self) -> CalDavResult<Url> {
        self.parse_composed(format!("{}/{}/calendars/", self.server_base(), self.user_id))
    }

    /// The target resource URL for an event with the given identifier:
    /// `<calendar>/event-<identifier>.ics`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the composed URL does not parse.
    pub fn event_url(&self, identifier: &str) -> CalDavResult<Url> {
        let calendar = self.calendar_url()?;
        self.parse_composed(format!("{}/event-{}.ics", calendar, identifier))
    }

    fn server_base(&self) -> &str {
        self.server_url.as_str().trim_end_matches('/')
    }

    fn parse_composed(&self, composed: String) -> CalDavResult<Url> {
        Url::parse(&composed).map_err(|e| {
            CalDavError::configuration(format!("invalid target URL {:?}", composed))
                .with_source(e)
        })
    }
}
