//! Topic decomposition.

use super::{fallback, Stage};
use crate::context::{SharedContext, Topic};
use crate::core::{StageName, StageOutcome};
use crate::errors::{GenerationError, TubeflowError};
use crate::generation::GenerativeClient;
use crate::parsing::{array_field, id_value, parse_object, str_field};
use crate::prompts;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Topics plus the short overview shown in the initial phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicsOutput {
    /// Topics in generation order.
    pub topics: Vec<Topic>,
    /// Short overview of the whole video.
    pub initial_summary: String,
}

/// Splits extracted content into topics with one generative call.
pub struct TopicStage {
    client: Arc<dyn GenerativeClient>,
    topic_count: usize,
}

impl fmt::Debug for TopicStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TopicStage")
            .field("topic_count", &self.topic_count)
            .finish_non_exhaustive()
    }
}

impl TopicStage {
    /// Creates the stage. `topic_count` is clamped to at least one.
    #[must_use]
    pub fn new(client: Arc<dyn GenerativeClient>, topic_count: usize) -> Self {
        Self {
            client,
            topic_count: topic_count.max(1),
        }
    }

    fn fallback(title: &str, reason: impl Into<String>) -> StageOutcome<TopicsOutput> {
        let reason = reason.into();
        warn!(stage = %StageName::GenerateTopics, %reason, "Using fallback topic");
        StageOutcome::degraded(
            TopicsOutput {
                topics: vec![fallback::topic(title)],
                initial_summary: fallback::initial_summary(title),
            },
            reason,
        )
    }

    async fn overview(&self, title: &str, topics: &[Topic]) -> Result<String, TubeflowError> {
        let text = self
            .client
            .generate(&prompts::initial_summary(title, topics))
            .await?;
        let text = text.trim();
        if text.is_empty() {
            return Err(GenerationError::EmptyContent.into());
        }
        Ok(text.to_string())
    }
}

#[async_trait]
impl Stage for TopicStage {
    type Output = TopicsOutput;

    fn name(&self) -> StageName {
        StageName::GenerateTopics
    }

    async fn execute(&self, ctx: &SharedContext) -> StageOutcome<TopicsOutput> {
        let title = ctx.title();
        let prompt = prompts::topics(title, &ctx.raw_content, self.topic_count);

        let raw = match self.client.generate(&prompt).await {
            Ok(raw) => raw,
            Err(err) => return Self::fallback(title, err.to_string()),
        };
        let object = match parse_object(&raw) {
            Ok(object) => object,
            Err(err) => return Self::fallback(title, err.to_string()),
        };

        let topics = decode_topics(array_field(&object, "topics"), self.topic_count);
        if topics.is_empty() {
            return Self::fallback(title, "No valid topics found");
        }
        debug!(count = topics.len(), "Generated topics");

        match str_field(&object, "initialSummary") {
            Some(initial_summary) => StageOutcome::Ok(TopicsOutput {
                topics,
                initial_summary,
            }),
            None => match self.overview(title, &topics).await {
                Ok(initial_summary) => StageOutcome::Ok(TopicsOutput {
                    topics,
                    initial_summary,
                }),
                Err(err) => {
                    warn!(error = %err, "Initial summary generation failed");
                    StageOutcome::degraded(
                        TopicsOutput {
                            topics,
                            initial_summary: fallback::short_initial_summary(title),
                        },
                        format!("initial summary unavailable: {err}"),
                    )
                }
            },
        }
    }
}

/// Turns the model's topic entries into at most `limit` topics.
///
/// Entries without a name are skipped. Ids are kept when every kept entry has
/// a distinct one; otherwise topics are renumbered `1..=n` in order.
fn decode_topics(entries: &[Value], limit: usize) -> Vec<Topic> {
    let decoded: Vec<(Option<u32>, String, String)> = entries
        .iter()
        .filter_map(Value::as_object)
        .filter_map(|entry| {
            let name = str_field(entry, "name")?;
            let content = str_field(entry, "content").unwrap_or_else(|| name.clone());
            Some((id_value(entry.get("id")), name, content))
        })
        .take(limit)
        .collect();

    let mut seen = HashSet::new();
    let ids_usable = decoded
        .iter()
        .all(|(id, _, _)| id.is_some_and(|id| seen.insert(id)));

    decoded
        .into_iter()
        .zip(1u32..)
        .map(|((id, name, content), position)| {
            let id = if ids_usable { id.unwrap_or(position) } else { position };
            Topic::new(id, name, content)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{ContentSource, ExtractedContent};
    use crate::generation::MockGenerativeClient;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn ctx() -> SharedContext {
        let mut ctx = SharedContext::new("abcdefghijk", "https://youtu.be/abcdefghijk");
        ctx.apply_content(ExtractedContent {
            title: "Volcanoes".into(),
            duration: 0,
            thumbnail_url: String::new(),
            body: "Volcanoes erupt when magma rises.".into(),
            source: ContentSource::Captions,
        });
        ctx
    }

    fn stage(mock: MockGenerativeClient, count: usize) -> TopicStage {
        TopicStage::new(Arc::new(mock), count)
    }

    #[tokio::test]
    async fn test_topics_from_prose_wrapped_json() {
        let mut mock = MockGenerativeClient::new();
        mock.expect_generate().times(1).returning(|_| {
            Ok(r#"Here is the JSON: {"topics":[{"id":1,"name":"X","content":"Y"}],"initialSummary":"Z"} Thanks!"#.into())
        });

        let outcome = stage(mock, 5).execute(&ctx()).await;
        assert!(outcome.is_ok());
        let output = outcome.data().unwrap();
        assert_eq!(output.topics, vec![Topic::new(1, "X", "Y")]);
        assert_eq!(output.initial_summary, "Z");
    }

    #[tokio::test]
    async fn test_generation_failure_uses_fallback() {
        let mut mock = MockGenerativeClient::new();
        mock.expect_generate()
            .returning(|_| Err(GenerationError::Request("offline".into())));

        let outcome = stage(mock, 5).execute(&ctx()).await;
        assert!(outcome.is_degraded());
        let (output, reason) = outcome.into_result().unwrap();
        assert_eq!(output.topics.len(), 1);
        assert_eq!(output.topics[0].name, "Main Content");
        assert!(output.initial_summary.contains("\"Volcanoes\""));
        assert!(reason.unwrap().contains("offline"));
    }

    #[tokio::test]
    async fn test_empty_topics_uses_fallback() {
        let mut mock = MockGenerativeClient::new();
        mock.expect_generate()
            .returning(|_| Ok(json!({"topics": [], "initialSummary": "x"}).to_string()));

        let outcome = stage(mock, 5).execute(&ctx()).await;
        assert!(outcome.is_degraded());
        assert_eq!(outcome.reason().as_deref(), Some("No valid topics found"));
    }

    #[tokio::test]
    async fn test_unparseable_response_uses_fallback() {
        let mut mock = MockGenerativeClient::new();
        mock.expect_generate()
            .returning(|_| Ok("I'd rather tell you a story.".into()));

        let outcome = stage(mock, 5).execute(&ctx()).await;
        assert!(outcome.is_degraded());
        assert_eq!(outcome.data().unwrap().topics[0].id, 1);
    }

    #[tokio::test]
    async fn test_extra_topics_dropped() {
        let mut mock = MockGenerativeClient::new();
        mock.expect_generate().returning(|_| {
            Ok(json!({
                "topics": [
                    {"id": 1, "name": "A", "content": "a"},
                    {"id": 2, "name": "B", "content": "b"},
                    {"id": 3, "name": "C", "content": "c"}
                ],
                "initialSummary": "s"
            })
            .to_string())
        });

        let output = stage(mock, 2).execute(&ctx()).await.into_result().unwrap().0;
        assert_eq!(output.topics.len(), 2);
        assert_eq!(output.topics[1].name, "B");
    }

    #[tokio::test]
    async fn test_missing_overview_triggers_second_prompt() {
        let mut mock = MockGenerativeClient::new();
        mock.expect_generate()
            .withf(|p| p.starts_with(prompts::TOPICS_HEADER))
            .times(1)
            .returning(|_| Ok(json!({"topics": [{"id": 1, "name": "Lava", "content": "hot"}]}).to_string()));
        mock.expect_generate()
            .withf(|p| p.starts_with(prompts::INITIAL_SUMMARY_HEADER))
            .times(1)
            .returning(|_| Ok("  Lava is very hot rock!  ".into()));

        let outcome = stage(mock, 5).execute(&ctx()).await;
        assert!(outcome.is_ok());
        assert_eq!(outcome.data().unwrap().initial_summary, "Lava is very hot rock!");
    }

    #[tokio::test]
    async fn test_failed_overview_keeps_topics() {
        let mut mock = MockGenerativeClient::new();
        mock.expect_generate()
            .withf(|p| p.starts_with(prompts::TOPICS_HEADER))
            .returning(|_| Ok(json!({"topics": [{"id": 1, "name": "Lava", "content": "hot"}], "initialSummary": " "}).to_string()));
        mock.expect_generate()
            .withf(|p| p.starts_with(prompts::INITIAL_SUMMARY_HEADER))
            .returning(|_| Err(GenerationError::EmptyContent));

        let outcome = stage(mock, 5).execute(&ctx()).await;
        assert!(outcome.is_degraded());
        let output = outcome.data().unwrap();
        assert_eq!(output.topics[0].name, "Lava");
        assert_eq!(
            output.initial_summary,
            "This video \"Volcanoes\" covers various interesting topics!"
        );
    }

    #[test]
    fn test_decode_renumbers_duplicate_ids() {
        let entries = vec![
            json!({"id": 3, "name": "A", "content": "a"}),
            json!({"id": 3, "name": "B", "content": "b"}),
        ];
        let ids: Vec<u32> = decode_topics(&entries, 5).iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_decode_renumbers_missing_ids_and_skips_nameless() {
        let entries = vec![
            json!({"name": "A"}),
            json!({"id": 9, "content": "no name"}),
            json!("not an object"),
            json!({"id": "7", "name": "B", "content": "b"}),
        ];
        let topics = decode_topics(&entries, 5);
        assert_eq!(topics, vec![Topic::new(1, "A", "A"), Topic::new(2, "B", "b")]);
    }

    #[test]
    fn test_decode_keeps_distinct_ids() {
        let entries = vec![
            json!({"id": 10, "name": "A", "content": "a"}),
            json!({"id": "20", "name": "B", "content": "b"}),
        ];
        let ids: Vec<u32> = decode_topics(&entries, 5).iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![10, 20]);
    }
}
