//! Pipeline orchestration.
//!
//! This module provides:
//! - `SummarizationOrchestrator`, the run state machine
//! - Source URL validation
//! - The retry policy used for content channel reads
//! - `RunResult`, the caller-facing run outcome

mod orchestrator;
mod result;
mod retry;
mod validation;

pub use orchestrator::{
    SummarizationOrchestrator, INSUFFICIENT_BODY, MIN_BODY_CHARS, REFRESH_PAGE, TRANSCRIPT_FAILED,
};
pub use result::{DetailedSummary, InitialSummary, ProcessingState, RunResult, SummaryData};
pub use retry::{
    should_retry, with_retry, BackoffStrategy, JitterStrategy, RetryConfig, RetryDecision,
    RetryError,
};
pub use validation::{video_id, INVALID_URL};
