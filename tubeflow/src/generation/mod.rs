//! Text generation.
//!
//! `GenerativeClient` is the seam every generative stage calls through.
//! `GeminiClient` implements it over the Gemini `generateContent` API.

mod client;
mod config;
#[cfg(feature = "http")]
mod gemini;
pub mod wire;

#[cfg(test)]
pub use client::MockGenerativeClient;
pub use client::GenerativeClient;
pub use config::{GeminiConfig, SamplingConfig, DEFAULT_BASE_URL, DEFAULT_MODEL};
#[cfg(feature = "http")]
pub use gemini::{GeminiClient, GenerationResponse, KeyStatus};
