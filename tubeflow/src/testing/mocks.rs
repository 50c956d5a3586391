//! Scripted generative clients and content channels.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::context::ExtractedContent;
use crate::errors::{GenerationError, TubeflowError};
use crate::extraction::ContentChannel;
use crate::generation::GenerativeClient;

#[derive(Debug, Clone)]
enum Reply {
    Text(String),
    Fail(GenerationError),
}

impl Reply {
    fn produce(&self) -> Result<String, GenerationError> {
        match self {
            Self::Text(text) => Ok(text.clone()),
            Self::Fail(err) => Err(err.clone()),
        }
    }
}

/// A generative client that answers by pattern.
///
/// Rules are checked in the order they were added; the first rule whose
/// pattern occurs in the prompt wins. Prompts without a matching rule get the
/// default reply, which fails unless [`otherwise`](Self::otherwise) was set.
/// Every prompt is recorded.
#[derive(Debug)]
pub struct ScriptedClient {
    rules: Vec<(String, Reply)>,
    default: Reply,
    delay: Option<Duration>,
    prompts: Mutex<Vec<String>>,
}

impl Default for ScriptedClient {
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            default: Reply::Fail(GenerationError::Request("no scripted reply".into())),
            delay: None,
            prompts: Mutex::new(Vec::new()),
        }
    }
}

impl ScriptedClient {
    /// Creates a client with no rules.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers prompts containing `pattern` with `text`.
    #[must_use]
    pub fn on(mut self, pattern: impl Into<String>, text: impl Into<String>) -> Self {
        self.rules.push((pattern.into(), Reply::Text(text.into())));
        self
    }

    /// Fails prompts containing `pattern` with `error`.
    #[must_use]
    pub fn fail_on(mut self, pattern: impl Into<String>, error: GenerationError) -> Self {
        self.rules.push((pattern.into(), Reply::Fail(error)));
        self
    }

    /// Answers unmatched prompts with `text`.
    #[must_use]
    pub fn otherwise(mut self, text: impl Into<String>) -> Self {
        self.default = Reply::Text(text.into());
        self
    }

    /// Fails every unmatched prompt with `error`.
    #[must_use]
    pub fn otherwise_fail(mut self, error: GenerationError) -> Self {
        self.default = Reply::Fail(error);
        self
    }

    /// Sleeps before every reply.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Returns every prompt received, in order.
    #[must_use]
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }

    /// Returns the number of calls.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.prompts.lock().len()
    }

    /// Returns how many prompts contained `pattern`.
    #[must_use]
    pub fn calls_matching(&self, pattern: &str) -> usize {
        self.prompts
            .lock()
            .iter()
            .filter(|p| p.contains(pattern))
            .count()
    }
}

#[async_trait]
impl GenerativeClient for ScriptedClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self.prompts.lock().push(prompt.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.rules
            .iter()
            .find(|(pattern, _)| prompt.contains(pattern.as_str()))
            .map_or(&self.default, |(_, reply)| reply)
            .produce()
    }
}

/// A channel that gives the same answer every time.
#[derive(Debug)]
pub struct StaticChannel {
    reply: Result<ExtractedContent, TubeflowError>,
    calls: AtomicUsize,
}

impl StaticChannel {
    /// Always returns `content`.
    #[must_use]
    pub fn new(content: ExtractedContent) -> Self {
        Self {
            reply: Ok(content),
            calls: AtomicUsize::new(0),
        }
    }

    /// Always fails with `error`.
    #[must_use]
    pub fn failing(error: TubeflowError) -> Self {
        Self {
            reply: Err(error),
            calls: AtomicUsize::new(0),
        }
    }

    /// Returns the number of requests received.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentChannel for StaticChannel {
    async fn request_content(&self, _video_id: &str) -> Result<ExtractedContent, TubeflowError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.clone()
    }
}

/// A channel that fails a fixed number of times before answering.
#[derive(Debug)]
pub struct FlakyChannel {
    content: ExtractedContent,
    error: TubeflowError,
    failures: usize,
    calls: AtomicUsize,
}

impl FlakyChannel {
    /// Fails the first `failures` requests with `error`, then returns `content`.
    #[must_use]
    pub fn new(content: ExtractedContent, error: TubeflowError, failures: usize) -> Self {
        Self {
            content,
            error,
            failures,
            calls: AtomicUsize::new(0),
        }
    }

    /// Returns the number of requests received.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentChannel for FlakyChannel {
    async fn request_content(&self, _video_id: &str) -> Result<ExtractedContent, TubeflowError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures {
            Err(self.error.clone())
        } else {
            Ok(self.content.clone())
        }
    }
}
