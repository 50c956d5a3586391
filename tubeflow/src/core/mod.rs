//! Core domain types for tubeflow runs.
//!
//! This module contains:
//! - Run phase, pipeline state and stage status enums
//! - The tagged `StageOutcome` returned by every stage
//! - `StageReport`, the per-stage record attached to run results

mod outcome;
mod report;
mod status;

pub use outcome::StageOutcome;
pub use report::StageReport;
pub use status::{Phase, PipelineState, StageName, StageStatus};
