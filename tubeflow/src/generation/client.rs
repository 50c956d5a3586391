//! The generative service seam.

use crate::errors::GenerationError;
use async_trait::async_trait;

/// Stateless text generation: one prompt in, raw text out.
///
/// Implementations do not retry; stages decide what a failure means.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenerativeClient: Send + Sync {
    /// Sends a single-turn prompt and returns the generated text.
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}
