//! Prompt builders for the generative stages.
//!
//! Each prompt opens with a fixed header line, exported as a constant, so
//! test clients can tell the stages apart.

use crate::config::{AgeBand, SummaryLength};
use crate::context::{ProcessedTopic, Topic};
use crate::utils::truncate_with_ellipsis;

/// Opening line of the topic generation prompt.
pub const TOPICS_HEADER: &str = "You are analyzing a YouTube video to identify the main topics discussed and creating an initial summary.";

/// Opening line of the follow-up initial summary prompt.
pub const INITIAL_SUMMARY_HEADER: &str =
    "You are creating an initial summary of a YouTube video for children.";

/// Opening line of the per-topic elaboration prompt.
pub const ELABORATION_HEADER: &str =
    "You are creating a child-friendly explanation for a YouTube video topic.";

/// Opening line of the connections and ranking prompt.
pub const CONNECTIONS_HEADER: &str =
    "You are reviewing child-friendly explanations of topics from a YouTube video.";

/// Opening line of the detailed summary prompt.
pub const DETAILED_SUMMARY_HEADER: &str =
    "You are creating a detailed summary of a YouTube video for young children";

/// Body text beyond this many characters is cut before topic generation.
pub const MAX_BODY_CHARS: usize = 8000;

/// Builds the prompt that splits content into topics.
#[must_use]
pub fn topics(title: &str, body: &str, topic_count: usize) -> String {
    let content = truncate_with_ellipsis(body, MAX_BODY_CHARS);
    format!(
        r#"{TOPICS_HEADER}

VIDEO TITLE: {title}

CONTENT:
{content}

TASK:
1. Identify {topic_count} main topics or themes from this video content (or fewer if the content doesn't support that many).
2. For each topic, create a brief description.
3. Create a kid-friendly initial summary of the overall video (150-200 words).
4. Format your response as JSON following this structure:

{{
  "topics": [
    {{
      "id": 1,
      "name": "First Topic Name",
      "content": "Brief description of what this topic covers"
    }}
  ],
  "initialSummary": "A clear, simple summary of the video suitable for children."
}}

Only include valid JSON in your response."#
    )
}

/// Builds the short overview prompt used when topic generation gave no summary.
#[must_use]
pub fn initial_summary(title: &str, topics: &[Topic]) -> String {
    let highlights = topics
        .iter()
        .map(|t| format!("- {}", t.name))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        r"{INITIAL_SUMMARY_HEADER}
This summary should highlight the main topics without going into detail.

VIDEO TITLE: {title}

MAIN TOPICS:
{highlights}

TASK:
Create a very simple, engaging initial summary of this video that children would understand.
Use simple words and a friendly tone.
Keep it to 2-3 sentences.

Your summary:"
    )
}

/// Builds the prompt that elaborates a single topic.
#[must_use]
pub fn elaboration(topic: &Topic, age: AgeBand) -> String {
    format!(
        r#"{ELABORATION_HEADER}

TARGET AGE: {label} years old
AGE INSTRUCTION: {instruction}

TOPIC: {name}
CONTENT: {content}

TASK:
1. Create a very simple summary of this topic that fits the target age.
2. Create a detailed but age-appropriate explanation.
3. Create 2-3 question and answer pairs that a curious child might ask.

Format your response as JSON:

{{
  "summary": "Your child-friendly summary here",
  "explanation": "Your detailed but simple explanation here",
  "qaPairs": [
    {{
      "question": "First question?",
      "answer": "Simple answer for the first question"
    }},
    {{
      "question": "Second question?",
      "answer": "Simple answer for the second question"
    }}
  ]
}}

Only include valid JSON in your response."#,
        label = age.label(),
        instruction = age.instruction(),
        name = topic.name,
        content = topic.content,
    )
}

/// Builds the prompt that connects and ranks processed topics.
#[must_use]
pub fn connections(title: &str, processed: &[ProcessedTopic]) -> String {
    let overview = processed
        .iter()
        .map(|t| format!("TOPIC {}: {}\nSUMMARY: {}", t.id, t.name, t.summary))
        .collect::<Vec<_>>()
        .join("\n\n");
    format!(
        r#"{CONNECTIONS_HEADER}

VIDEO TITLE: {title}

TOPICS OVERVIEW:
{overview}

TASK:
1. Create 1-2 connections between topics to form a cohesive story.
2. Rank the topics by importance for learning.

Format your response as JSON:

{{
  "connections": [
    "Brief connection between topics 1 and 2",
    "Another connection between topics"
  ],
  "ranking": [
    {{
      "topicId": 1,
      "importance": "high",
      "reason": "Why this topic is important"
    }}
  ]
}}

Only include valid JSON in your response."#
    )
}

/// Builds the prompt for the final prose summary.
#[must_use]
pub fn detailed_summary(
    title: &str,
    processed: &[ProcessedTopic],
    connections: &[String],
    age: AgeBand,
    length: SummaryLength,
) -> String {
    let topics_json = serde_json::to_string_pretty(processed).unwrap_or_else(|_| "[]".into());
    let connections_json =
        serde_json::to_string_pretty(connections).unwrap_or_else(|_| "[]".into());
    let label = age.label();
    let words = length.word_band();
    format!(
        r"{DETAILED_SUMMARY_HEADER} (age range: {label}).

VIDEO TITLE: {title}

PROCESSED TOPICS:
{topics_json}

TOPIC CONNECTIONS:
{connections_json}

TASK:
Create a thorough but accessible detailed summary that:
1. Uses simple, engaging language suitable for children aged {label}
2. Captures the main points and how they connect
3. Is approximately {words}
4. Doesn't include complex terminology without explanation
5. Uses a friendly, positive tone

SUMMARY:"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::QaPair;

    fn processed(id: u32, name: &str) -> ProcessedTopic {
        ProcessedTopic {
            id,
            name: name.into(),
            content: "c".into(),
            summary: format!("{name} summary"),
            explanation: "e".into(),
            qa_pairs: vec![QaPair::new("q?", "a")],
            fallback: false,
        }
    }

    #[test]
    fn test_topics_prompt_truncates_body() {
        let body = "a".repeat(9000);
        let prompt = topics("Space", &body, 4);
        assert!(prompt.starts_with(TOPICS_HEADER));
        assert!(prompt.contains(&format!("{}...", "a".repeat(8000))));
        assert!(!prompt.contains(&"a".repeat(8001)));
        assert!(prompt.contains("Identify 4 main topics"));
        assert!(prompt.contains("VIDEO TITLE: Space"));
    }

    #[test]
    fn test_short_body_not_truncated() {
        let prompt = topics("Space", "Stars are hot.", 5);
        assert!(prompt.contains("CONTENT:\nStars are hot.\n"));
    }

    #[test]
    fn test_elaboration_prompt_uses_age_band() {
        let topic = Topic::new(2, "Gravity", "Why things fall");
        let prompt = elaboration(&topic, AgeBand::ThreeToFive);
        assert!(prompt.starts_with(ELABORATION_HEADER));
        assert!(prompt.contains("TARGET AGE: 3-5 years old"));
        assert!(prompt.contains("fun analogies"));
        assert!(prompt.contains("TOPIC: Gravity\nCONTENT: Why things fall"));
    }

    #[test]
    fn test_connections_prompt_lists_topics() {
        let prompt = connections("Space", &[processed(1, "Stars"), processed(2, "Planets")]);
        assert!(prompt.contains("TOPIC 1: Stars\nSUMMARY: Stars summary\n\nTOPIC 2: Planets"));
    }

    #[test]
    fn test_detailed_summary_prompt() {
        let prompt = detailed_summary(
            "Space",
            &[processed(1, "Stars")],
            &["Stars light planets".to_string()],
            AgeBand::NineToTwelve,
            SummaryLength::Long,
        );
        assert!(prompt.starts_with(DETAILED_SUMMARY_HEADER));
        assert!(prompt.contains("(age range: 9-12)"));
        assert!(prompt.contains("approximately 350-400 words"));
        assert!(prompt.contains("\"qaPairs\""));
        assert!(prompt.contains("Stars light planets"));
    }

    #[test]
    fn test_initial_summary_prompt() {
        let prompt = initial_summary("Space", &[Topic::new(1, "Stars", "c")]);
        assert!(prompt.starts_with(INITIAL_SUMMARY_HEADER));
        assert!(prompt.contains("MAIN TOPICS:\n- Stars\n"));
    }

    #[test]
    fn test_headers_are_distinct() {
        let headers = [
            TOPICS_HEADER,
            INITIAL_SUMMARY_HEADER,
            ELABORATION_HEADER,
            CONNECTIONS_HEADER,
            DETAILED_SUMMARY_HEADER,
        ];
        for (i, a) in headers.iter().enumerate() {
            for b in &headers[i + 1..] {
                assert!(!a.contains(b) && !b.contains(a));
            }
        }
    }
}
