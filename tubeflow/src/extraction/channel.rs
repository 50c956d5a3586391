//! Channels that deliver extracted page content to the orchestrator.

use super::extractor::ContentExtractor;
use super::page::PageSource;
use crate::context::ExtractedContent;
use crate::errors::TubeflowError;
use async_trait::async_trait;
use std::sync::Arc;

/// Request/response link to whatever holds the video page.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentChannel: Send + Sync {
    /// Asks for the content of `video_id`.
    ///
    /// Fails with a transport error when the page holder does not answer and
    /// with an extraction error when the page lacks usable text.
    async fn request_content(&self, video_id: &str) -> Result<ExtractedContent, TubeflowError>;
}

/// Runs the extractor over a page that is already loaded.
#[derive(Debug)]
pub struct PageChannel<P> {
    page: Arc<P>,
    extractor: ContentExtractor,
}

impl<P: PageSource> PageChannel<P> {
    /// Creates a channel over `page` with the default extractor.
    #[must_use]
    pub fn new(page: Arc<P>) -> Self {
        Self {
            page,
            extractor: ContentExtractor::default(),
        }
    }

    /// Replaces the extractor.
    #[must_use]
    pub fn with_extractor(mut self, extractor: ContentExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// Returns the page.
    #[must_use]
    pub fn page(&self) -> &Arc<P> {
        &self.page
    }
}

#[async_trait]
impl<P: PageSource + 'static> ContentChannel for PageChannel<P> {
    async fn request_content(&self, video_id: &str) -> Result<ExtractedContent, TubeflowError> {
        self.extractor.extract(self.page.as_ref(), video_id).await
    }
}

#[cfg(feature = "http")]
pub use http::HttpPageChannel;

#[cfg(feature = "http")]
mod http {
    use super::{ContentChannel, ContentExtractor, ExtractedContent, TubeflowError};
    use crate::extraction::config::{ExtractionConfig, FetchConfig};
    use crate::extraction::page::HtmlPage;
    use async_trait::async_trait;
    use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
    use tracing::{debug, warn};

    /// Fetches the watch page over HTTP and extracts from the returned HTML.
    ///
    /// Only server-rendered markup is available this way, so the cascade
    /// usually lands on the description or metadata strategies.
    #[derive(Debug)]
    pub struct HttpPageChannel {
        client: reqwest::Client,
        config: FetchConfig,
        extractor: ContentExtractor,
    }

    impl HttpPageChannel {
        /// Creates a channel from a fetch configuration.
        ///
        /// # Errors
        ///
        /// Returns a configuration error if a header is invalid or the HTTP
        /// client cannot be built.
        pub fn new(config: FetchConfig) -> Result<Self, TubeflowError> {
            let mut headers = HeaderMap::new();
            for (key, value) in &config.headers {
                let name = HeaderName::from_bytes(key.as_bytes())
                    .map_err(|e| TubeflowError::config(format!("invalid header '{key}': {e}")))?;
                let value = HeaderValue::from_str(value)
                    .map_err(|e| TubeflowError::config(format!("invalid header '{key}': {e}")))?;
                headers.insert(name, value);
            }

            let client = reqwest::Client::builder()
                .timeout(config.timeout())
                .user_agent(config.user_agent.clone())
                .default_headers(headers)
                .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
                .build()
                .map_err(|e| TubeflowError::config(format!("failed to build HTTP client: {e}")))?;

            // Fetched snapshots never change.
            let extractor = ContentExtractor::new(ExtractionConfig::default().with_wait_ms(0));

            Ok(Self {
                client,
                config,
                extractor,
            })
        }

        /// Replaces the extractor.
        #[must_use]
        pub fn with_extractor(mut self, extractor: ContentExtractor) -> Self {
            self.extractor = extractor;
            self
        }

        async fn fetch_html(&self, url: &str) -> Result<String, TubeflowError> {
            let response = self.client.get(url).send().await.map_err(|e| {
                warn!(url, error = %e, "Page request failed");
                TubeflowError::transport(format!("request to {url} failed: {e}"))
            })?;

            let status = response.status();
            if !status.is_success() {
                return Err(TubeflowError::transport(format!("HTTP {status} for {url}")));
            }

            response
                .text()
                .await
                .map_err(|e| TubeflowError::transport(format!("failed to read body: {e}")))
        }
    }

    #[async_trait]
    impl ContentChannel for HttpPageChannel {
        async fn request_content(
            &self,
            video_id: &str,
        ) -> Result<ExtractedContent, TubeflowError> {
            let url = self.config.page_url(video_id);
            let html = self.fetch_html(&url).await?;
            debug!(%url, bytes = html.len(), "Fetched watch page");

            let page = HtmlPage::new(html);
            self.extractor.extract(&page, video_id).await
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_invalid_header_is_config_error() {
            let config = FetchConfig::new().with_header("bad header", "x");
            let err = HttpPageChannel::new(config).unwrap_err();
            assert!(matches!(err, TubeflowError::Config(_)));
        }

        #[tokio::test]
        async fn test_unreachable_host_is_transport_error() {
            let config = FetchConfig::new()
                .with_watch_base_url("http://127.0.0.1:9/watch?v=")
                .with_timeout(2.0);
            let channel = HttpPageChannel::new(config).unwrap();
            let err = channel.request_content("abcdefghijk").await.unwrap_err();
            assert!(matches!(err, TubeflowError::Transport(_)));
            assert!(err.is_retryable());
        }
    }
}
