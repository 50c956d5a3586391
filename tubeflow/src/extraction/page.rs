//! Read-only access to a rendered page.

use async_trait::async_trait;
use parking_lot::RwLock;
use scraper::{Html, Selector};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// The DOM surface extraction reads from.
///
/// Implementations never let extraction mutate the page.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Returns the text content of every element matching `selector`, in
    /// document order. An invalid selector matches nothing.
    fn select_texts(&self, selector: &str) -> Vec<String>;

    /// Runs every selector against one view of the page.
    ///
    /// The result has one entry per selector, in the same order.
    fn select_many(&self, selectors: &[&str]) -> Vec<Vec<String>> {
        selectors.iter().map(|s| self.select_texts(s)).collect()
    }

    /// Returns the document title, if any.
    fn document_title(&self) -> Option<String>;

    /// Polls every `poll` until an element matches `selector` or `timeout`
    /// elapses.
    ///
    /// Returns true if an element matched.
    async fn wait_for(&self, selector: &str, timeout: Duration, poll: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            if !self.select_texts(selector).is_empty() {
                return true;
            }
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            tokio::time::sleep(poll.max(Duration::from_millis(1)).min(deadline - now)).await;
        }
    }
}

/// A page backed by an HTML snapshot.
///
/// The snapshot can be swapped with [`HtmlPage::replace_html`] to model a
/// page that keeps loading; pending `wait_for` calls observe the change.
#[derive(Debug)]
pub struct HtmlPage {
    html: RwLock<String>,
}

impl HtmlPage {
    /// Creates a page from an HTML document.
    #[must_use]
    pub fn new(html: impl Into<String>) -> Self {
        Self {
            html: RwLock::new(html.into()),
        }
    }

    /// Replaces the page snapshot.
    pub fn replace_html(&self, html: impl Into<String>) {
        *self.html.write() = html.into();
    }

    fn document(&self) -> Html {
        Html::parse_document(&self.html.read())
    }
}

#[async_trait]
impl PageSource for HtmlPage {
    fn select_texts(&self, selector: &str) -> Vec<String> {
        self.select_many(&[selector]).pop().unwrap_or_default()
    }

    fn select_many(&self, selectors: &[&str]) -> Vec<Vec<String>> {
        let document = self.document();
        selectors
            .iter()
            .map(|selector| select_in(&document, selector))
            .collect()
    }

    fn document_title(&self) -> Option<String> {
        self.select_texts("title")
            .into_iter()
            .next()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    }

}

fn select_in(document: &Html, selector: &str) -> Vec<String> {
    match Selector::parse(selector) {
        Ok(parsed) => document
            .select(&parsed)
            .map(|el| el.text().collect::<String>())
            .collect(),
        Err(err) => {
            debug!(selector, error = %err, "Ignoring invalid selector");
            Vec::new()
        }
    }
}
