//! Observability utilities.
//!
//! This module provides:
//! - `init_tracing`, which installs a pretty or JSON `tracing` subscriber
//! - Wide run payloads attached to terminal run events

mod subscriber;
mod wide_events;

pub use subscriber::{build_subscriber, env_filter, init_tracing, LogFormat, DEFAULT_FILTER};
pub use wide_events::run_payload;
