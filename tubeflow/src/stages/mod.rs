//! Generative stages.
//!
//! Each stage reads the run's `SharedContext`, calls the generative client,
//! and returns a tagged `StageOutcome`. Generation and parse failures never
//! escape a stage: they become `Degraded` outcomes carrying fallback data.

pub mod fallback;
mod map;
mod reduce;
mod summary;
mod topics;

use crate::context::SharedContext;
use crate::core::{StageName, StageOutcome};
use async_trait::async_trait;
use std::fmt::Debug;

pub use map::TopicMapStage;
pub use reduce::{ConnectionStage, TopicConnections};
pub use summary::DetailedSummaryStage;
pub use topics::{TopicStage, TopicsOutput};

/// Trait for generative pipeline stages.
#[async_trait]
pub trait Stage: Send + Sync + Debug {
    /// What the stage produces.
    type Output: Send;

    /// Returns the stage name.
    fn name(&self) -> StageName;

    /// Executes the stage against the run context.
    async fn execute(&self, ctx: &SharedContext) -> StageOutcome<Self::Output>;
}
