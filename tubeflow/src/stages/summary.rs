//! Final prose summary.

use super::{fallback, Stage};
use crate::config::{AgeBand, SummaryLength};
use crate::context::SharedContext;
use crate::core::{StageName, StageOutcome};
use crate::errors::{GenerationError, TubeflowError};
use crate::generation::GenerativeClient;
use crate::prompts;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Writes the detailed summary from processed topics and their connections.
pub struct DetailedSummaryStage {
    client: Arc<dyn GenerativeClient>,
    age: AgeBand,
    length: SummaryLength,
}

impl fmt::Debug for DetailedSummaryStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DetailedSummaryStage")
            .field("age", &self.age)
            .field("length", &self.length)
            .finish_non_exhaustive()
    }
}

impl DetailedSummaryStage {
    /// Creates the stage.
    #[must_use]
    pub fn new(client: Arc<dyn GenerativeClient>, age: AgeBand, length: SummaryLength) -> Self {
        Self {
            client,
            age,
            length,
        }
    }

    async fn compose(&self, ctx: &SharedContext) -> Result<String, TubeflowError> {
        let prompt = prompts::detailed_summary(
            ctx.title(),
            &ctx.processed_topics,
            &ctx.topic_connections,
            self.age,
            self.length,
        );
        let text = self.client.generate(&prompt).await?;
        let text = text.trim();
        if text.is_empty() {
            return Err(GenerationError::EmptyContent.into());
        }
        Ok(text.to_string())
    }
}

#[async_trait]
impl Stage for DetailedSummaryStage {
    type Output = String;

    fn name(&self) -> StageName {
        StageName::ComposeSummary
    }

    async fn execute(&self, ctx: &SharedContext) -> StageOutcome<String> {
        match self.compose(ctx).await {
            Ok(summary) => {
                debug!(chars = summary.chars().count(), "Composed detailed summary");
                StageOutcome::Ok(summary)
            }
            Err(err) => {
                warn!(error = %err, "Using fallback detailed summary");
                let summary = fallback::detailed_summary(ctx.title(), &ctx.topic_names());
                StageOutcome::degraded(summary, err.to_string())
            }
        }
    }
}
