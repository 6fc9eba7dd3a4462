//! Error types for CalDAV publishing operations.

use std::fmt;
use thiserror::Error;

/// The category of a CalDAV error.
///
/// This enum classifies failures for the publish boundary, where every
/// error is folded into the caller-facing result record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CalDavErrorCode {
    /// The Authorization header is missing, malformed, or not Basic.
    MalformedCredentials,
    /// Network-level failure reaching the calendar host (DNS, connection
    /// refused, TLS, timeout).
    TransportFailure,
    /// The calendar server answered with a non-success HTTP status.
    RemoteRejection,
    /// Missing or invalid configuration (bad URL, unbuildable client).
    Configuration,
    /// A server response that could not be interpreted.
    InvalidResponse,
}

impl CalDavErrorCode {
    /// Returns a stable snake_case name for this error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MalformedCredentials => "malformed_credentials",
            Self::TransportFailure => "transport_failure",
            Self::RemoteRejection => "remote_rejection",
            Self::Configuration => "configuration_error",
            Self::InvalidResponse => "invalid_response",
        }
    }
}

impl fmt::Display for CalDavErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An error that occurred while resolving credentials or talking to the
/// calendar store.
#[derive(Debug, Error)]
pub struct CalDavError {
    /// The error code categorizing this error.
    code: CalDavErrorCode,
    /// A human-readable message describing the error.
    message: String,
    /// The HTTP status reported by the remote server, when there is one.
    status: Option<u16>,
    /// The underlying cause of this error, if any.
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl CalDavError {
    /// Creates a new error with the given code and message.
    pub fn new(code: CalDavErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            status: None,
            source: None,
        }
    }

    /// Creates a malformed-credentials error.
    pub fn malformed_credentials(message: impl Into<String>) -> Self {
        Self::new(CalDavErrorCode::MalformedCredentials, message)
    }

    /// Creates a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(CalDavErrorCode::TransportFailure, message)
    }

    /// Creates a remote-rejection error carrying the server's status code.
    pub fn remote(status: u16, message: impl Into<String>) -> Self {
        let mut err = Self::new(CalDavErrorCode::RemoteRejection, message);
        err.status = Some(status);
        err
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(CalDavErrorCode::Configuration, message)
    }

    /// Creates an invalid-response error.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(CalDavErrorCode::InvalidResponse, message)
    }

    /// Sets the source error for this error.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    /// Returns the error code.
    pub fn code(&self) -> CalDavErrorCode {
        self.code
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the remote HTTP status, if the server supplied one.
    pub fn status(&self) -> Option<u16> {
        self.status
    }
}

impl fmt::Display for CalDavError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} ({}): {}", self.code, status, self.message),
            None => write!(f, "{}: {}", self.code, self.message),
        }
    }
}

/// A specialized Result type for CalDAV operations.
pub type CalDavResult<T> = Result<T, CalDavError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_code_names() {
        assert_eq!(
            CalDavErrorCode::MalformedCredentials.as_str(),
            "malformed_credentials"
        );
        assert_eq!(
            CalDavErrorCode::TransportFailure.as_str(),
            "transport_failure"
        );
        assert_eq!(
            CalDavErrorCode::RemoteRejection.as_str(),
            "remote_rejection"
        );
    }

    #[test]
    fn remote_error_carries_status() {
        let err = CalDavError::remote(409, "resource already exists");
        assert_eq!(err.code(), CalDavErrorCode::RemoteRejection);
        assert_eq!(err.status(), Some(409));
        assert_eq!(err.message(), "resource already exists");
    }

    #[test]
    fn transport_error_has_no_status() {
        let err = CalDavError::transport("connection refused");
        assert_eq!(err.code(), CalDavErrorCode::TransportFailure);
        assert!(err.status().is_none());
    }

    #[test]
    fn display_includes_status_when_present() {
        let err = CalDavError::remote(401, "Unauthorized");
        let display = format!("{}", err);
        assert!(display.contains("remote_rejection"));
        assert!(display.contains("401"));
        assert!(display.contains("Unauthorized"));
    }

    #[test]
    fn error_with_source() {
        use std::error::Error;
        let io_err = std::io::Error::other("broken pipe");
        let err = CalDavError::transport("request failed").with_source(io_err);
        assert!(err.source().is_some());
    }
}
