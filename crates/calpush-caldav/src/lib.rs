//! CalDAV event publishing.
//!
//! This crate authenticates a caller via HTTP Basic credentials, renders an
//! iCalendar VEVENT from caller-supplied fields, and stores it on a CalDAV
//! calendar collection with a single HTTP PUT:
//!
//! - [`Credentials`] / [`resolve_credentials`] - Basic-Auth header decoding
//!   with a static-configuration fallback
//! - [`EventPublisher`] - the publish operation plus the setup reads
//!   (credential verification, calendar discovery, event listing)
//! - [`PublishResult`] - the caller-facing outcome record
//! - [`CalDavError`] - the error taxonomy
//!
//! # Example
//!
//! ```ignore
//! use calpush_caldav::{resolve_credentials, CalDavConfig, EventPublisher};
//! use calpush_core::EventInput;
//!
//! let config = CalDavConfig::icloud("USER_ID", "CALENDAR_ID")?;
//! let publisher = EventPublisher::new(config.clone())?;
//!
//! let creds = resolve_credentials(auth_header.as_deref(), &config)?;
//! let input = EventInput::new(
//!     "20250101T090000Z",
//!     "20250101T100000Z",
//!     "Meeting",
//!     "Weekly sync",
//! );
//!
//! let result = publisher.publish(&input, &creds).await;
//! assert!(result.success);
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod ics;
pub mod publisher;
pub mod xml;

// Re-export main types at crate root
pub use auth::{resolve_credentials, Credentials};
pub use client::CalDavClient;
pub use config::CalDavConfig;
pub use error::{CalDavError, CalDavErrorCode, CalDavResult};
pub use ics::{escape_text, render_event, EventUid};
pub use publisher::{EventPublisher, PublishResult};
pub use xml::DiscoveredCalendar;
