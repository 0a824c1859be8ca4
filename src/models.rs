//! Data models passed between pipeline stages.
//!
//! - [`ArticleContent`]: the scraped title and body of one link
//! - [`Debriefing`]: the LLM-written summary of one article
//!
//! Both are built once and handed to exactly one downstream stage.

/// Title used when a page has neither an `<h1>` nor a `<title>`.
pub const NO_TITLE: &str = "No title found";

/// Summary used when a provider answers without any usable text.
pub const NO_SUMMARY: &str = "No summary generated";

/// A scraped article, ready to be summarized.
///
/// `content` is whitespace-normalized and already truncated to the
/// caller's character limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleContent {
    /// The URL the article was fetched from.
    pub url: String,
    /// Best-effort headline, or [`NO_TITLE`].
    pub title: String,
    /// Body text with whitespace runs collapsed to single spaces.
    pub content: String,
}

/// One entry of the final report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Debriefing {
    pub url: String,
    pub title: String,
    pub summary: String,
}

impl Debriefing {
    /// Pair a generated summary with the article it describes.
    pub fn from_article(article: ArticleContent, summary: String) -> Self {
        Self {
            url: article.url,
            title: article.title,
            summary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debriefing_from_article() {
        let article = ArticleContent {
            url: "https://example.com/a".to_string(),
            title: "Headline".to_string(),
            content: "Body".to_string(),
        };
        let d = Debriefing::from_article(article, "Summary".to_string());
        assert_eq!(d.url, "https://example.com/a");
        assert_eq!(d.title, "Headline");
        assert_eq!(d.summary, "Summary");
    }
}
