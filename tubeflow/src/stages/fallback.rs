//! Deterministic output used when generation cannot be trusted.

use crate::context::{ProcessedTopic, QaPair, Topic};

/// Name of the single topic used when topic generation fails.
pub const FALLBACK_TOPIC_NAME: &str = "Main Content";

/// Answer inserted when a topic elaboration has no question/answer pairs.
pub const DEFAULT_QA_ANSWER: &str = "It's something educational from the video!";

/// Answer used in the fully templated topic elaboration.
pub const FALLBACK_QA_ANSWER: &str = "It's something interesting discussed in the video!";

/// The single topic that stands in for failed topic generation.
#[must_use]
pub fn topic(title: &str) -> Topic {
    Topic::new(
        1,
        FALLBACK_TOPIC_NAME,
        format!(
            "This video \"{title}\" discusses various educational topics that can be explained in a kid-friendly way."
        ),
    )
}

/// Overview that stands in for failed topic generation.
#[must_use]
pub fn initial_summary(title: &str) -> String {
    format!("This video \"{title}\" contains educational content that can be fun to learn about!")
}

/// Overview used when topics parsed but no overview could be generated.
#[must_use]
pub fn short_initial_summary(title: &str) -> String {
    format!("This video \"{title}\" covers various interesting topics!")
}

/// Templated elaboration for a topic whose generation failed.
#[must_use]
pub fn processed_topic(topic: &Topic) -> ProcessedTopic {
    ProcessedTopic {
        id: topic.id,
        name: topic.name.clone(),
        content: topic.content.clone(),
        summary: format!("This part talks about {}", topic.name),
        explanation: format!("This section discusses {} in the video.", topic.name),
        qa_pairs: vec![QaPair::new(
            format!("What is {}?", topic.name),
            FALLBACK_QA_ANSWER,
        )],
        fallback: true,
    }
}

/// Pair inserted when generated text came back without any pairs.
#[must_use]
pub fn default_qa_pair(name: &str) -> QaPair {
    QaPair::new(format!("What is {name}?"), DEFAULT_QA_ANSWER)
}

/// Prose that stands in for a failed detailed summary.
#[must_use]
pub fn detailed_summary(title: &str, names: &[&str]) -> String {
    format!(
        "This video called \"{title}\" has some interesting information about {}. Each topic is explained in a way that's easy to understand. You can explore each topic section to learn more!",
        names.join(", ")
    )
}
