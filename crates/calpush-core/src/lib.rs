//! Core types: event input, UTC basic-format time, tracing setup

pub mod event;
pub mod time;
pub mod tracing;

pub use event::EventInput;
pub use time::{epoch_millis, format_utc_basic, now_utc_basic, UTC_BASIC_FORMAT};
pub use crate::tracing::{init_tracing, TracingConfig, TracingError, TracingOutputFormat};
