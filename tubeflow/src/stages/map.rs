//! Per-topic elaboration, the map half of the pipeline.

use super::{fallback, Stage};
use crate::config::AgeBand;
use crate::context::{ProcessedTopic, QaPair, SharedContext, Topic};
use crate::core::{StageName, StageOutcome};
use crate::generation::GenerativeClient;
use crate::parsing::{array_field, parse_object, str_field};
use crate::prompts;
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Elaborates each topic independently, in order, one call at a time.
///
/// A failure for one topic replaces only that topic with the templated
/// fallback, so the output always has one entry per input topic.
pub struct TopicMapStage {
    client: Arc<dyn GenerativeClient>,
    age: AgeBand,
}

impl fmt::Debug for TopicMapStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TopicMapStage")
            .field("age", &self.age)
            .finish_non_exhaustive()
    }
}

impl TopicMapStage {
    /// Creates the stage.
    #[must_use]
    pub fn new(client: Arc<dyn GenerativeClient>, age: AgeBand) -> Self {
        Self { client, age }
    }

    async fn elaborate(&self, topic: &Topic) -> Result<ProcessedTopic, String> {
        let raw = self
            .client
            .generate(&prompts::elaboration(topic, self.age))
            .await
            .map_err(|e| e.to_string())?;
        let object = parse_object(&raw).map_err(|e| e.to_string())?;

        let summary = str_field(&object, "summary").ok_or("missing summary")?;
        let explanation = str_field(&object, "explanation").ok_or("missing explanation")?;
        let mut qa_pairs = decode_pairs(array_field(&object, "qaPairs"));
        if qa_pairs.is_empty() {
            qa_pairs.push(fallback::default_qa_pair(&topic.name));
        }

        Ok(ProcessedTopic {
            id: topic.id,
            name: topic.name.clone(),
            content: topic.content.clone(),
            summary,
            explanation,
            qa_pairs,
            fallback: false,
        })
    }
}

#[async_trait]
impl Stage for TopicMapStage {
    type Output = Vec<ProcessedTopic>;

    fn name(&self) -> StageName {
        StageName::ProcessTopics
    }

    async fn execute(&self, ctx: &SharedContext) -> StageOutcome<Vec<ProcessedTopic>> {
        let mut processed = Vec::with_capacity(ctx.topics.len());
        let mut failed = Vec::new();

        for topic in &ctx.topics {
            match self.elaborate(topic).await {
                Ok(done) => {
                    debug!(topic_id = topic.id, name = %topic.name, "Topic elaborated");
                    processed.push(done);
                }
                Err(reason) => {
                    warn!(topic_id = topic.id, name = %topic.name, %reason, "Using fallback for topic");
                    failed.push(topic.name.clone());
                    processed.push(fallback::processed_topic(topic));
                }
            }
        }

        if failed.is_empty() {
            StageOutcome::Ok(processed)
        } else {
            let reason = format!(
                "{} of {} topics used fallback: {}",
                failed.len(),
                ctx.topics.len(),
                failed.join(", ")
            );
            StageOutcome::degraded(processed, reason)
        }
    }
}

fn decode_pairs(entries: &[Value]) -> Vec<QaPair> {
    entries
        .iter()
        .filter_map(Value::as_object)
        .filter_map(|pair| {
            Some(QaPair::new(
                str_field(pair, "question")?,
                str_field(pair, "answer")?,
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::GenerationError;
    use crate::generation::MockGenerativeClient;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn ctx(names: &[&str]) -> SharedContext {
        let mut ctx = SharedContext::new("abcdefghijk", "https://youtu.be/abcdefghijk");
        ctx.topics = names
            .iter()
            .zip(1u32..)
            .map(|(name, id)| Topic::new(id, *name, format!("about {name}")))
            .collect();
        ctx
    }

    fn elaboration(summary: &str) -> String {
        json!({
            "summary": summary,
            "explanation": "A longer explanation.",
            "qaPairs": [
                {"question": "Why?", "answer": "Because."},
                {"question": "How?", "answer": "Like this."}
            ]
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_all_topics_elaborated() {
        let mut mock = MockGenerativeClient::new();
        mock.expect_generate()
            .times(2)
            .returning(|_| Ok(elaboration("Simple summary")));

        let stage = TopicMapStage::new(Arc::new(mock), AgeBand::default());
        let outcome = stage.execute(&ctx(&["Sun", "Moon"])).await;

        assert!(outcome.is_ok());
        let processed = outcome.data().unwrap();
        assert_eq!(processed.len(), 2);
        assert_eq!(processed[1].name, "Moon");
        assert_eq!(processed[0].qa_pairs.len(), 2);
        assert!(!processed[0].fallback);
    }

    #[tokio::test]
    async fn test_one_failure_falls_back_for_that_topic_only() {
        let mut mock = MockGenerativeClient::new();
        mock.expect_generate()
            .withf(|p| p.contains("TOPIC: Moon"))
            .times(1)
            .returning(|_| Err(GenerationError::Request("connection reset".into())));
        mock.expect_generate()
            .times(2)
            .returning(|_| Ok(elaboration("Generated")));

        let stage = TopicMapStage::new(Arc::new(mock), AgeBand::default());
        let outcome = stage.execute(&ctx(&["Sun", "Moon", "Stars"])).await;

        assert!(outcome.is_degraded());
        let processed = outcome.data().unwrap();
        assert_eq!(processed.len(), 3);
        assert_eq!(processed[0].summary, "Generated");
        assert_eq!(processed[1], fallback::processed_topic(&Topic::new(2, "Moon", "about Moon")));
        assert_eq!(processed[2].summary, "Generated");
        assert!(outcome.reason().unwrap().contains("1 of 3"));
    }

    #[tokio::test]
    async fn test_missing_explanation_is_full_fallback() {
        let mut mock = MockGenerativeClient::new();
        mock.expect_generate()
            .returning(|_| Ok(json!({"summary": "only this"}).to_string()));

        let stage = TopicMapStage::new(Arc::new(mock), AgeBand::default());
        let processed = stage.execute(&ctx(&["Sun"])).await.into_result().unwrap().0;
        assert!(processed[0].fallback);
        assert_eq!(processed[0].summary, "This part talks about Sun");
    }

    #[tokio::test]
    async fn test_missing_pairs_get_default_pair() {
        let mut mock = MockGenerativeClient::new();
        mock.expect_generate().returning(|_| {
            Ok(json!({"summary": "s", "explanation": "e", "qaPairs": []}).to_string())
        });

        let stage = TopicMapStage::new(Arc::new(mock), AgeBand::default());
        let outcome = stage.execute(&ctx(&["Sun"])).await;
        assert!(outcome.is_ok());
        let processed = outcome.data().unwrap();
        assert!(!processed[0].fallback);
        assert_eq!(
            processed[0].qa_pairs,
            vec![QaPair::new("What is Sun?", "It's something educational from the video!")]
        );
    }

    #[tokio::test]
    async fn test_age_band_reaches_prompt() {
        let mut mock = MockGenerativeClient::new();
        mock.expect_generate()
            .withf(|p| p.contains("TARGET AGE: 9-12 years old"))
            .times(1)
            .returning(|_| Ok(elaboration("s")));

        let stage = TopicMapStage::new(Arc::new(mock), AgeBand::NineToTwelve);
        assert!(stage.execute(&ctx(&["Sun"])).await.is_ok());
    }

    #[tokio::test]
    async fn test_no_topics_no_calls() {
        let mut mock = MockGenerativeClient::new();
        mock.expect_generate().never();

        let stage = TopicMapStage::new(Arc::new(mock), AgeBand::default());
        let outcome = stage.execute(&ctx(&[])).await;
        assert!(outcome.is_ok());
        assert!(outcome.data().unwrap().is_empty());
    }
}
