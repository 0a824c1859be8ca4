//! Debriefing generation: prompt rendering and summary resolution.

use crate::api::AskAsync;
use crate::models::{ArticleContent, Debriefing, NO_SUMMARY};
use crate::utils::truncate_for_log;
use tracing::{debug, error, info, instrument};

/// Prompt sent for every article. `{title}` and `{content}` are replaced once.
pub const DEBRIEF_PROMPT: &str = "You are a senior intelligence analyst preparing a short \
debriefing for a busy reader. Read the article below and write a debriefing of roughly \
200-300 words in clear, professional prose. Cover:
- The main points of the article
- The key takeaways and why they matter
- Any notable quotes, figures, or data
- How the story relates to current events

Article title: {title}

Article content:
{content}

Debriefing:";

/// Fill the prompt template with one article.
///
/// Each placeholder is substituted once, and text coming from the article is
/// never rescanned, so a page containing `{content}` does not expand twice.
pub fn build_prompt(article: &ArticleContent) -> String {
    let (head, rest) = DEBRIEF_PROMPT
        .split_once("{title}")
        .unwrap_or((DEBRIEF_PROMPT, ""));
    let (middle, tail) = rest.split_once("{content}").unwrap_or((rest, ""));
    format!("{head}{}{middle}{}{tail}", article.title, article.content)
}

/// Trimmed provider text, or [`NO_SUMMARY`] when there is none.
pub fn resolve_summary(text: Option<String>) -> String {
    text.map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| NO_SUMMARY.to_string())
}

/// Ask `provider` for a debriefing of `article`.
///
/// Provider failures are logged and turned into `None`; the caller skips the
/// article.
#[instrument(level = "info", skip_all, fields(provider = provider.name(), url = %article.url))]
pub async fn generate_debriefing<A: AskAsync>(
    provider: &A,
    article: ArticleContent,
) -> Option<Debriefing> {
    let prompt = build_prompt(&article);
    debug!(prompt = %truncate_for_log(&prompt, 200), "Built prompt");

    match provider.ask(&prompt).await {
        Ok(text) => {
            let summary = resolve_summary(text);
            info!(words = summary.split_whitespace().count(), "Generated debriefing");
            Some(Debriefing::from_article(article, summary))
        }
        Err(e) => {
            error!(error = %e, "Debriefing generation failed; skipping article");
            None
        }
    }
}
