//! # Tubeflow
//!
//! A two-phase Map-Reduce pipeline that turns a video watch page into
//! kid-friendly summaries.
//!
//! Tubeflow provides:
//!
//! - **Content extraction**: An ordered cascade over captions, description,
//!   comments and page metadata
//! - **Topic generation**: One generative call that splits content into topics
//! - **Map-Reduce elaboration**: Per-topic elaboration in order, a
//!   connection-finding reduce and a final composed summary
//! - **Graceful degradation**: Every generative stage falls back to templated
//!   output instead of failing the run
//! - **Cancellation and deadlines**: Runs stop between and during stages
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tubeflow::prelude::*;
//!
//! let settings = Settings::load("settings.json")?;
//! let client = Arc::new(GeminiClient::new(GeminiConfig::new(api_key))?);
//! let channel = Arc::new(HttpPageChannel::new(FetchConfig::default())?);
//!
//! let orchestrator = SummarizationOrchestrator::new(client, channel, settings);
//! let result = orchestrator
//!     .run("https://www.youtube.com/watch?v=dQw4w9WgXcQ", Phase::Detailed)
//!     .await;
//! println!("{}", result.to_json());
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod cancellation;
pub mod config;
pub mod context;
pub mod core;
pub mod errors;
pub mod events;
pub mod extraction;
pub mod generation;
pub mod observability;
pub mod parsing;
pub mod pipeline;
pub mod prompts;
pub mod stages;
pub mod testing;
pub mod utils;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::cancellation::CancellationToken;
    pub use crate::config::{AgeBand, Settings, SummaryLength};
    pub use crate::context::{
        ContentSource, ExtractedContent, ProcessedTopic, QaPair, RankingEntry, SharedContext,
        Topic, VideoInfo,
    };
    pub use crate::core::{Phase, PipelineState, StageName, StageOutcome, StageReport, StageStatus};
    pub use crate::errors::{ErrorKind, GenerationError, TubeflowError};
    pub use crate::events::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink};
    pub use crate::extraction::{
        ContentChannel, ContentExtractor, ExtractionConfig, FetchConfig, HtmlPage, PageChannel,
        PageSource,
    };
    #[cfg(feature = "http")]
    pub use crate::extraction::HttpPageChannel;
    pub use crate::generation::{GeminiConfig, GenerativeClient, SamplingConfig};
    #[cfg(feature = "http")]
    pub use crate::generation::GeminiClient;
    pub use crate::observability::{init_tracing, LogFormat};
    pub use crate::pipeline::{RetryConfig, RunResult, SummarizationOrchestrator, SummaryData};
    pub use crate::stages::Stage;
}
