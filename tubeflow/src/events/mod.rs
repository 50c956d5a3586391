//! Run lifecycle events.
//!
//! The orchestrator emits one event per run boundary and per stage boundary.
//! Sinks are passed to the orchestrator explicitly; there is no global sink.

mod sink;

pub use sink::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink};

/// A run began.
pub const RUN_STARTED: &str = "run.started";
/// A stage began.
pub const STAGE_STARTED: &str = "stage.started";
/// A stage finished, successfully or with fallback output.
pub const STAGE_COMPLETED: &str = "stage.completed";
/// A run finished successfully.
pub const RUN_COMPLETED: &str = "run.completed";
/// A run terminated with an error.
pub const RUN_FAILED: &str = "run.failed";
