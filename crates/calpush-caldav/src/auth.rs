//! HTTP Basic authentication and credential resolution.
//!
//! Implements the RFC 7617 Basic scheme in both directions: decoding an
//! `Authorization` header handed in by the caller's request context, and
//! encoding an email/password pair for outgoing requests.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::config::CalDavConfig;
use crate::error::{CalDavError, CalDavResult};

/// An email/password pair used for HTTP Basic authentication.
///
/// Credentials are derived once per invocation and discarded when the call
/// returns. The `Debug` implementation redacts the password so the pair can
/// never leak through log output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// The account email (username part of the Basic pair).
    pub email: String,
    /// The app-specific password.
    pub password: String,
}

impl Credentials {
    /// Creates credentials from an email/password pair.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Decodes an `Authorization: Basic <base64>` header value.
    ///
    /// The decoded text is split on the first colon, so passwords may
    /// themselves contain colons.
    ///
    /// # Errors
    ///
    /// Returns a `MalformedCredentials` error when the value does not use
    /// the Basic scheme, is not valid base64, does not decode to UTF-8, or
    /// lacks a colon separator.
    pub fn from_basic_header(header: &str) -> CalDavResult<Self> {
        let encoded = header.trim().strip_prefix("Basic ").ok_or_else(|| {
            CalDavError::malformed_credentials(
                "Authorization header does not use the Basic scheme",
            )
        })?;

        let decoded = STANDARD.decode(encoded.trim()).map_err(|e| {
            CalDavError::malformed_credentials("Authorization header is not valid base64")
                .with_source(e)
        })?;

        let decoded = String::from_utf8(decoded).map_err(|e| {
            CalDavError::malformed_credentials("decoded credentials are not valid UTF-8")
                .with_source(e)
        })?;

        let (email, password) = decoded.split_once(':').ok_or_else(|| {
            CalDavError::malformed_credentials("decoded credentials lack a colon separator")
        })?;

        Ok(Self::new(email, password))
    }

    /// Encodes the pair as an `Authorization` header value.
    pub fn authorization_header(&self) -> String {
        let encoded = STANDARD.encode(format!("{}:{}", self.email, self.password));
        format!("Basic {}", encoded)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Produces credentials from one of the two configured sources.
///
/// An `Authorization` header from the caller's request context takes
/// precedence; when no header is supplied, statically configured values are
/// used instead.
///
/// # Errors
///
/// Returns a `MalformedCredentials` error when a header is present but
/// cannot be decoded, or when neither source is available.
pub fn resolve_credentials(
    header: Option<&str>,
    config: &CalDavConfig,
) -> CalDavResult<Credentials> {
    if let Some(header) = header {
        return Credentials::from_basic_header(header);
    }

    config.static_credentials().ok_or_else(|| {
        CalDavError::malformed_credentials(
            "no Authorization header and no statically configured credentials",
        )
    })
}
