//! Cross-topic connections and importance ranking.

use super::Stage;
use crate::context::{RankingEntry, SharedContext};
use crate::core::{StageName, StageOutcome};
use crate::errors::TubeflowError;
use crate::generation::GenerativeClient;
use crate::parsing::{array_field, id_value, parse_object, str_field};
use crate::prompts;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Output of the reduce stage. Both lists may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicConnections {
    /// Sentences relating two or more topics.
    pub connections: Vec<String>,
    /// Topics ordered by importance.
    pub ranking: Vec<RankingEntry>,
}

/// Asks the model how the elaborated topics relate and which matter most.
pub struct ConnectionStage {
    client: Arc<dyn GenerativeClient>,
}

impl fmt::Debug for ConnectionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionStage").finish_non_exhaustive()
    }
}

impl ConnectionStage {
    /// Creates the stage.
    #[must_use]
    pub fn new(client: Arc<dyn GenerativeClient>) -> Self {
        Self { client }
    }

    async fn reduce(&self, ctx: &SharedContext) -> Result<TopicConnections, TubeflowError> {
        let raw = self
            .client
            .generate(&prompts::connections(ctx.title(), &ctx.processed_topics))
            .await?;
        let object = parse_object(&raw)?;

        let connections = array_field(&object, "connections")
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        let mut entries = array_field(&object, "ranking");
        if entries.is_empty() {
            entries = array_field(&object, "topicRanking");
        }
        let ranking = entries
            .iter()
            .filter_map(Value::as_object)
            .filter_map(|entry| {
                Some(RankingEntry {
                    topic_id: id_value(entry.get("topicId"))?,
                    importance: str_field(entry, "importance").unwrap_or_default(),
                    reason: str_field(entry, "reason").unwrap_or_default(),
                })
            })
            .collect();

        Ok(TopicConnections {
            connections,
            ranking,
        })
    }
}

#[async_trait]
impl Stage for ConnectionStage {
    type Output = TopicConnections;

    fn name(&self) -> StageName {
        StageName::ReduceConnections
    }

    async fn execute(&self, ctx: &SharedContext) -> StageOutcome<TopicConnections> {
        if ctx.processed_topics.is_empty() {
            return StageOutcome::degraded(TopicConnections::default(), "no processed topics");
        }

        match self.reduce(ctx).await {
            Ok(output) => {
                debug!(
                    connections = output.connections.len(),
                    ranked = output.ranking.len(),
                    "Reduced topic connections"
                );
                StageOutcome::Ok(output)
            }
            Err(err) => {
                warn!(error = %err, "Topic connection analysis failed");
                StageOutcome::degraded(TopicConnections::default(), err.to_string())
            }
        }
    }
}
