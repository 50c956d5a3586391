//! Gemini `generateContent` client.

use super::client::GenerativeClient;
use super::config::GeminiConfig;
use super::wire::{GenerateContentRequest, GenerateContentResponse, GenerationConfig, UsageMetadata};
use crate::config::Settings;
use crate::errors::{GenerationError, TubeflowError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;
use tracing::{debug, warn};

const API_KEY_HEADER: &str = "x-goog-api-key";

const KEY_CHECK_PROMPT: &str = "Hello! This is a test. Please respond with just \"API key working!\"";

const KEY_CHECK_MAX_TOKENS: u32 = 10;

const MISSING_KEY: &str =
    "Gemini API key not configured. Set geminiApiKey in settings or GEMINI_API_KEY.";

/// Generated text with request metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// Generated text.
    pub text: String,
    /// Model that served the request.
    pub model: String,
    /// Why generation stopped.
    pub finish_reason: Option<String>,
    /// Token accounting.
    pub usage: Option<UsageMetadata>,
    /// Round-trip time in milliseconds.
    pub latency_ms: u64,
}

/// Result of checking an API key against the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum KeyStatus {
    /// The key works.
    Working,
    /// The service accepted the key but the answer had no candidates.
    UnexpectedFormat,
    /// The key was rejected.
    Invalid,
    /// The key is valid but currently rate limited.
    RateLimited,
    /// Any other HTTP failure.
    ApiError(u16),
    /// The service could not be reached.
    Network(String),
}

impl KeyStatus {
    /// Returns true when the key can be used.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        matches!(self, Self::Working | Self::UnexpectedFormat | Self::RateLimited)
    }

    fn from_status(status: u16) -> Self {
        match status {
            403 => Self::Invalid,
            429 => Self::RateLimited,
            other => Self::ApiError(other),
        }
    }
}

impl fmt::Display for KeyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Working => write!(f, "API key is working correctly"),
            Self::UnexpectedFormat => write!(f, "API key works but response format unexpected"),
            Self::Invalid => write!(f, "Invalid API key or access denied"),
            Self::RateLimited => write!(f, "Rate limited - API key is valid but try again later"),
            Self::ApiError(status) => write!(f, "API error: {status}"),
            Self::Network(message) => write!(f, "Network error: {message}"),
        }
    }
}

/// Client for the Gemini API.
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    config: GeminiConfig,
}

impl fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Creates a client.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the key is blank or the HTTP client
    /// cannot be built.
    pub fn new(config: GeminiConfig) -> Result<Self, TubeflowError> {
        if config.api_key.trim().is_empty() {
            return Err(TubeflowError::config(MISSING_KEY));
        }
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| TubeflowError::config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http, config })
    }

    /// Creates a client from user settings.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when no API key is configured in the
    /// settings or the `GEMINI_API_KEY` environment variable.
    pub fn from_settings(settings: &Settings) -> Result<Self, TubeflowError> {
        let api_key = settings
            .resolved_api_key()
            .ok_or_else(|| TubeflowError::config(MISSING_KEY))?;
        Self::new(GeminiConfig::new(api_key))
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    async fn post(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<reqwest::Response, GenerationError> {
        self.http
            .post(self.config.endpoint())
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| GenerationError::Request(e.to_string()))
    }

    /// Sends a prompt and returns the text with request metadata.
    ///
    /// # Errors
    ///
    /// `Status` for non-success responses, `Request` for transport failures,
    /// `InvalidResponse` for undecodable bodies and `EmptyContent` when the
    /// first candidate has no text.
    pub async fn complete(&self, prompt: &str) -> Result<GenerationResponse, GenerationError> {
        let started = Instant::now();
        let request = GenerateContentRequest::single_turn(prompt, &self.config.sampling);
        let response = self.post(&request).await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("unknown error").to_string()
            } else {
                body
            };
            warn!(status = status.as_u16(), model = %self.config.model, "Gemini request rejected");
            return Err(GenerationError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::InvalidResponse(e.to_string()))?;
        let text = envelope.first_text().ok_or(GenerationError::EmptyContent)?;
        let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        debug!(
            model = %self.config.model,
            latency_ms,
            chars = text.len(),
            "Gemini request completed"
        );

        Ok(GenerationResponse {
            text,
            model: envelope
                .model_version
                .clone()
                .unwrap_or_else(|| self.config.model.clone()),
            finish_reason: envelope.finish_reason(),
            usage: envelope.usage_metadata,
            latency_ms,
        })
    }

    /// Checks whether the configured key is accepted.
    pub async fn check_key(&self) -> KeyStatus {
        let mut request = GenerateContentRequest::single_turn(KEY_CHECK_PROMPT, &self.config.sampling);
        request.generation_config = GenerationConfig::capped(KEY_CHECK_MAX_TOKENS);

        let response = match self.post(&request).await {
            Ok(response) => response,
            Err(err) => return KeyStatus::Network(err.to_string()),
        };

        let status = response.status();
        if !status.is_success() {
            return KeyStatus::from_status(status.as_u16());
        }

        match response.json::<GenerateContentResponse>().await {
            Ok(envelope) if !envelope.candidates.is_empty() => KeyStatus::Working,
            _ => KeyStatus::UnexpectedFormat,
        }
    }
}

#[async_trait]
impl GenerativeClient for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self.complete(prompt).await.map(|r| r.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serves one canned HTTP response and returns the raw request it saw.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut raw = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                raw.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&raw).to_string();
                if let Some(header_end) = text.find("\r\n\r\n") {
                    let content_length = text[..header_end]
                        .lines()
                        .find_map(|l| {
                            let lower = l.to_ascii_lowercase();
                            lower
                                .strip_prefix("content-length:")
                                .map(|v| v.trim().parse::<usize>().unwrap_or(0))
                        })
                        .unwrap_or(0);
                    if raw.len() >= header_end + 4 + content_length {
                        break;
                    }
                }
            }
            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&raw).to_string()
        });
        (format!("http://{addr}/v1beta"), handle)
    }

    fn client(base_url: &str) -> GeminiClient {
        GeminiClient::new(
            GeminiConfig::new("test-key")
                .with_base_url(base_url)
                .with_timeout(5.0),
        )
        .unwrap()
    }

    #[test]
    fn test_blank_key_is_config_error() {
        let err = GeminiClient::new(GeminiConfig::new("  ")).unwrap_err();
        assert!(matches!(err, TubeflowError::Config(_)));
    }

    #[test]
    fn test_key_status_mapping() {
        assert_eq!(KeyStatus::from_status(403), KeyStatus::Invalid);
        assert_eq!(KeyStatus::from_status(429), KeyStatus::RateLimited);
        assert_eq!(KeyStatus::from_status(500), KeyStatus::ApiError(500));
        assert!(KeyStatus::RateLimited.is_usable());
        assert!(!KeyStatus::Invalid.is_usable());
    }

    #[tokio::test]
    async fn test_complete_success() {
        let (base, server) = serve_once(
            "200 OK",
            r#"{"candidates":[{"content":{"parts":[{"text":"Plants eat sunlight."}]},"finishReason":"STOP"}],"usageMetadata":{"promptTokenCount":5,"candidatesTokenCount":4,"totalTokenCount":9}}"#,
        )
        .await;

        let response = client(&base).complete("Why are plants green?").await.unwrap();
        assert_eq!(response.text, "Plants eat sunlight.");
        assert_eq!(response.model, "gemini-2.0-flash");
        assert_eq!(response.finish_reason.as_deref(), Some("STOP"));
        assert_eq!(response.usage.unwrap().total_token_count, 9);

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /v1beta/models/gemini-2.0-flash:generateContent"));
        assert!(request.to_ascii_lowercase().contains("x-goog-api-key: test-key"));
        assert!(request.contains("Why are plants green?"));
        assert!(request.contains("\"maxOutputTokens\":2048"));
    }

    #[tokio::test]
    async fn test_non_success_status() {
        let (base, _server) = serve_once("503 Service Unavailable", r#"{"error":"overloaded"}"#).await;
        let err = client(&base).generate("x").await.unwrap_err();
        assert_eq!(err.status(), Some(503));
        assert!(err.to_string().contains("overloaded"));
    }

    #[tokio::test]
    async fn test_empty_candidates() {
        let (base, _server) = serve_once("200 OK", r#"{"candidates":[]}"#).await;
        let err = client(&base).generate("x").await.unwrap_err();
        assert_eq!(err, GenerationError::EmptyContent);
    }

    #[tokio::test]
    async fn test_unreachable_service_is_request_error() {
        let err = client("http://127.0.0.1:9/v1beta").generate("x").await.unwrap_err();
        assert!(matches!(err, GenerationError::Request(_)));
    }

    #[tokio::test]
    async fn test_check_key_invalid() {
        let (base, server) = serve_once("403 Forbidden", "{}").await;
        assert_eq!(client(&base).check_key().await, KeyStatus::Invalid);
        let request = server.await.unwrap();
        assert!(request.contains("\"maxOutputTokens\":10"));
        assert!(!request.contains("topK"));
    }

    #[tokio::test]
    async fn test_check_key_working() {
        let (base, _server) =
            serve_once("200 OK", r#"{"candidates":[{"content":{"parts":[{"text":"API key working!"}]}}]}"#)
                .await;
        assert_eq!(client(&base).check_key().await, KeyStatus::Working);
    }

    #[tokio::test]
    async fn test_check_key_unexpected_format() {
        let (base, _server) = serve_once("200 OK", r#"{"promptFeedback":{}}"#).await;
        assert_eq!(client(&base).check_key().await, KeyStatus::UnexpectedFormat);
    }

    #[test]
    fn test_from_settings_uses_configured_key() {
        let settings = Settings::default().with_api_key("configured");
        let client = GeminiClient::from_settings(&settings).unwrap();
        assert_eq!(client.config().api_key, "configured");
    }
}
