//! HTTP client for CalDAV operations.
//!
//! Wraps `reqwest` with the two request shapes this crate needs:
//! - PUT of a calendar object (`text/calendar`)
//! - PROPFIND with a `Depth` header and an XML body
//!
//! Authentication is preemptive Basic: iCloud-style servers do not send a
//! challenge for PUT, so the Authorization header goes out on the first
//! attempt.

use reqwest::{Client, Method, Response, StatusCode};
use tracing::{trace, warn};
use url::Url;

use crate::auth::Credentials;
use crate::config::CalDavConfig;
use crate::error::{CalDavError, CalDavResult};

/// HTTP client for CalDAV operations.
///
/// Stateless between calls apart from reqwest's internal connection pool;
/// credentials are supplied per request.
pub struct CalDavClient {
    /// The underlying HTTP client.
    client: Client,
    /// Configuration.
    config: CalDavConfig,
}

impl CalDavClient {
    /// Creates a new CalDAV client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built.
    pub fn new(config: CalDavConfig) -> CalDavResult<Self> {
        let client = Client::builder()
            .danger_accept_invalid_certs(!config.verify_tls)
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| {
                CalDavError::configuration(format!("failed to create HTTP client: {}", e))
                    .with_source(e)
            })?;

        Ok(Self { client, config })
    }

    /// Uploads a calendar object with a single PUT.
    ///
    /// Returns the status code of the successful response; any non-success
    /// status or transport fault becomes an error.
    pub async fn put_calendar_object(
        &self,
        url: &Url,
        document: String,
        creds: &Credentials,
    ) -> CalDavResult<StatusCode> {
        trace!(url = %url, "Uploading calendar object");

        let response = self
            .client
            .put(url.clone())
            .header("Content-Type", "text/calendar")
            .header("Authorization", creds.authorization_header())
            .body(document)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if status.is_success() {
            trace!(status = %status, "Calendar object stored");
            Ok(status)
        } else {
            Err(remote_rejection(response).await)
        }
    }

    /// Performs a PROPFIND request and returns the multistatus body.
    ///
    /// Passing no body asks the server for the default property set.
    pub async fn propfind(
        &self,
        url: &Url,
        body: Option<&str>,
        depth: u8,
        creds: &Credentials,
    ) -> CalDavResult<String> {
        let method = Method::from_bytes(b"PROPFIND")
            .map_err(|_| CalDavError::configuration("invalid HTTP method: PROPFIND"))?;

        let mut request = self
            .client
            .request(method, url.clone())
            .header("Depth", depth.to_string())
            .header("Authorization", creds.authorization_header());

        if let Some(b) = body {
            request = request
                .header("Content-Type", "application/xml; charset=utf-8")
                .body(b.to_string());
        }

        trace!(url = %url, depth, "Sending PROPFIND");

        let response = request.send().await.map_err(transport_error)?;

        // 207 Multi-Status is the expected answer for PROPFIND.
        let status = response.status();
        if status.is_success() {
            response.text().await.map_err(|e| {
                CalDavError::transport(format!("failed to read response: {}", e)).with_source(e)
            })
        } else {
            Err(remote_rejection(response).await)
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &CalDavConfig {
        &self.config
    }
}

/// Maps a reqwest failure to a transport error (no remote status).
fn transport_error(err: reqwest::Error) -> CalDavError {
    CalDavError::transport(err.to_string()).with_source(err)
}

/// Converts a non-success response into a remote rejection, passing the
/// remote status and message through verbatim.
async fn remote_rejection(response: Response) -> CalDavError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    let message = if body.trim().is_empty() {
        status
            .canonical_reason()
            .map(|r| r.to_string())
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
    } else {
        body.trim().to_string()
    };

    warn!(status = %status, "Calendar server rejected request");
    CalDavError::remote(status.as_u16(), message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn client_creation() {
        let config = CalDavConfig::icloud("USER123", "CAL456")
            .unwrap()
            .with_timeout(Duration::from_secs(5));

        let client = CalDavClient::new(config);
        assert!(client.is_ok());
    }

    #[test]
    fn client_keeps_config() {
        let config = CalDavConfig::icloud("USER123", "CAL456").unwrap();
        let client = CalDavClient::new(config).unwrap();
        assert_eq!(client.config().user_id, "USER123");
        assert_eq!(client.config().calendar_id, "CAL456");
    }
}
