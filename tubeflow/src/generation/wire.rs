//! Request and response envelopes for `generateContent`.

use super::config::SamplingConfig;
use serde::{Deserialize, Serialize};

/// Request body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// Conversation turns; always one here.
    pub contents: Vec<Content>,
    /// Sampling parameters.
    pub generation_config: GenerationConfig,
}

impl GenerateContentRequest {
    /// Builds a single-turn request.
    #[must_use]
    pub fn single_turn(prompt: &str, sampling: &SamplingConfig) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig::from(sampling),
        }
    }
}

/// One turn of content.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Content {
    /// Text parts.
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// A text part.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Part {
    /// The text.
    #[serde(default)]
    pub text: String,
}

/// Sampling parameters as sent on the wire.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Sampling temperature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Top-k cutoff.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    /// Nucleus sampling mass.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    /// Output token cap.
    pub max_output_tokens: u32,
}

impl GenerationConfig {
    /// Only caps the output; used for key checks.
    #[must_use]
    pub fn capped(max_output_tokens: u32) -> Self {
        Self {
            temperature: None,
            top_k: None,
            top_p: None,
            max_output_tokens,
        }
    }
}

impl From<&SamplingConfig> for GenerationConfig {
    fn from(sampling: &SamplingConfig) -> Self {
        Self {
            temperature: Some(sampling.temperature),
            top_k: Some(sampling.top_k),
            top_p: Some(sampling.top_p),
            max_output_tokens: sampling.max_output_tokens,
        }
    }
}

/// Response body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Generated candidates.
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    /// Token accounting.
    #[serde(default)]
    pub usage_metadata: Option<UsageMetadata>,
    /// Model that served the request.
    #[serde(default)]
    pub model_version: Option<String>,
}

impl GenerateContentResponse {
    /// Returns the text of the first candidate, if it has any.
    #[must_use]
    pub fn first_text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content.parts.iter().map(|p| p.text.as_str()).collect();
        Some(text).filter(|t| !t.is_empty())
    }

    /// Returns the finish reason of the first candidate.
    #[must_use]
    pub fn finish_reason(&self) -> Option<String> {
        self.candidates.first()?.finish_reason.clone()
    }
}

/// A generated candidate.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Candidate content.
    #[serde(default)]
    pub content: Option<Content>,
    /// Why generation stopped.
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Token accounting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    /// Tokens in the prompt.
    #[serde(default)]
    pub prompt_token_count: u32,
    /// Tokens generated.
    #[serde(default)]
    pub candidates_token_count: u32,
    /// Total tokens billed.
    #[serde(default)]
    pub total_token_count: u32,
}
