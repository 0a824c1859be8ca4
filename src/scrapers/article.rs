//! Generic article scraper.
//!
//! Title resolution: first `<h1>`, then `<title>`, then [`NO_TITLE`].
//!
//! Body resolution: the selectors in [`CONTENT_SELECTORS`] are tried in
//! order and the first one matching anything wins, even if a later one
//! would match more text. Without any match the whole `<body>` is used.
//! Text inside `<script>` and `<style>` is never collected.

use crate::models::{ArticleContent, NO_TITLE};
use crate::utils::{normalize_whitespace, truncate_chars};
use once_cell::sync::Lazy;
use reqwest::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue};
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Timeout for a single page fetch.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Content limit used by the main pipeline.
pub const PIPELINE_MAX_CHARS: usize = 4000;

/// Content limit used when comparing providers.
pub const COMPARE_MAX_CHARS: usize = 2000;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Body selectors in priority order.
pub const CONTENT_SELECTORS: [&str; 7] = [
    "article",
    ".content",
    ".article-content",
    ".post-content",
    ".entry-content",
    "main",
    ".main-content",
];

/// Elements whose text is never part of the article.
const SKIPPED_ELEMENTS: [&str; 2] = ["script", "style"];

static CONTENT: Lazy<Vec<Selector>> = Lazy::new(|| {
    CONTENT_SELECTORS
        .iter()
        .filter_map(|s| Selector::parse(s).ok())
        .collect()
});
static H1: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").expect("static selector"));
static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("title").expect("static selector"));
static BODY: Lazy<Selector> = Lazy::new(|| Selector::parse("body").expect("static selector"));

/// Why a fetch produced nothing. Only ever logged.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("server answered {0}")]
    Status(reqwest::StatusCode),
    #[error("could not read response body: {0}")]
    Body(#[source] reqwest::Error),
}

/// Source of scraped articles for the debriefing loop.
pub trait FetchArticle {
    /// The article at `url`, or `None` when it cannot be scraped.
    async fn fetch_article(&self, url: &str, max_chars: usize) -> Option<ArticleContent>;
}

/// HTTP client configured for scraping article pages.
#[derive(Debug, Clone)]
pub struct ArticleFetcher {
    client: Client,
}

impl ArticleFetcher {
    /// Build a fetcher with the browser-like headers and [`FETCH_TIMEOUT`].
    pub fn new() -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(FETCH_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }

    /// Fetch `url` and extract its article, or `None` on any failure.
    ///
    /// The cause of a failure is logged here and not returned.
    #[instrument(level = "info", skip(self), fields(%url))]
    pub async fn fetch(&self, url: &str, max_chars: usize) -> Option<ArticleContent> {
        match self.try_fetch(url, max_chars).await {
            Ok(article) => {
                info!(
                    title = %article.title,
                    chars = article.content.chars().count(),
                    "Fetched article"
                );
                Some(article)
            }
            Err(e) => {
                warn!(error = %e, "Article fetch failed");
                None
            }
        }
    }

    async fn try_fetch(&self, url: &str, max_chars: usize) -> Result<ArticleContent, FetchError> {
        let parsed = Url::parse(url)?;
        let response = self.client.get(parsed).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(FETCH_TIMEOUT)
            } else {
                FetchError::Request(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let html = response.text().await.map_err(FetchError::Body)?;
        debug!(bytes = html.len(), "Downloaded page");
        Ok(extract_article(url, &html, max_chars))
    }
}

impl FetchArticle for ArticleFetcher {
    async fn fetch_article(&self, url: &str, max_chars: usize) -> Option<ArticleContent> {
        self.fetch(url, max_chars).await
    }
}

/// Extract title and body from an HTML document.
pub fn extract_article(url: &str, html: &str, max_chars: usize) -> ArticleContent {
    let document = Html::parse_document(html);
    let title = extract_title(&document);
    let raw = extract_body(&document);
    let content = truncate_chars(&normalize_whitespace(&raw), max_chars);

    ArticleContent {
        url: url.to_string(),
        title,
        content,
    }
}

fn extract_title(document: &Html) -> String {
    [&*H1, &*TITLE]
        .into_iter()
        .filter_map(|selector| document.select(selector).next())
        .map(|el| visible_text(el).trim().to_string())
        .find(|t| !t.is_empty())
        .unwrap_or_else(|| NO_TITLE.to_string())
}

fn extract_body(document: &Html) -> String {
    for (selector, name) in CONTENT.iter().zip(CONTENT_SELECTORS) {
        let matched: Vec<ElementRef> = document.select(selector).collect();
        if !matched.is_empty() {
            debug!(selector = name, matches = matched.len(), "Content selector matched");
            return matched.into_iter().map(visible_text).collect::<Vec<_>>().join(" ");
        }
    }

    debug!("No content selector matched; using <body>");
    match document.select(&BODY).next() {
        Some(body) => visible_text(body),
        None => visible_text(document.root_element()),
    }
}

/// Text of `element` and its descendants, minus script and style contents.
///
/// Text nodes are concatenated as-is, like [`ElementRef::text`].
fn visible_text(element: ElementRef) -> String {
    element
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let hidden = node.ancestors().any(|a| {
                a.value()
                    .as_element()
                    .is_some_and(|e| SKIPPED_ELEMENTS.contains(&e.name()))
            });
            (!hidden).then(|| &**text)
        })
        .collect()
}
