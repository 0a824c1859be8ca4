//! Run orchestration: links in, report out.
//!
//! Links are processed strictly one after another. After each debriefing is
//! appended the loop pauses for a fixed delay. A link that cannot be fetched
//! or summarized is logged and skipped without a pause; only the conditions
//! in [`PipelineError`] abort the run.

use chrono::NaiveDate;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};

use crate::api::AskAsync;
use crate::debrief::generate_debriefing;
use crate::links::{LinkError, extract_links};
use crate::models::Debriefing;
use crate::outputs::report::write_report;
use crate::scrapers::article::FetchArticle;
use crate::utils::{dated_paths, default_materials_dir, ensure_parent_dir};

/// Conditions that stop the whole run with a non-zero exit.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("no LLM credential configured: set OPENAI_API_KEY or GEMINI_API_KEY")]
    NoProvider,
    #[error("could not determine the home directory; pass --materials-dir")]
    NoHomeDir,
    #[error("input CSV not found: {0}")]
    MissingInput(PathBuf),
    #[error("no links found in {0}")]
    NoLinks(PathBuf),
    #[error(transparent)]
    Links(#[from] LinkError),
    #[error("failed to write report {path}: {source}")]
    Report {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Input and output files of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPaths {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl RunPaths {
    /// Dated paths under the materials directory, with explicit overrides
    /// taking precedence.
    pub fn resolve(
        materials_dir: Option<PathBuf>,
        input: Option<PathBuf>,
        output: Option<PathBuf>,
        date: NaiveDate,
    ) -> Result<Self, PipelineError> {
        if let (Some(input), Some(output)) = (&input, &output) {
            return Ok(Self {
                input: input.clone(),
                output: output.clone(),
            });
        }
        let dir = materials_dir
            .or_else(default_materials_dir)
            .ok_or(PipelineError::NoHomeDir)?;
        let (dated_input, dated_output) = dated_paths(&dir, date);
        Ok(Self {
            input: input.unwrap_or(dated_input),
            output: output.unwrap_or(dated_output),
        })
    }
}

/// Tuning for the per-link loop.
#[derive(Debug, Clone, Copy)]
pub struct LoopOptions {
    pub delay: Duration,
    pub max_chars: usize,
}

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub attempted: usize,
    pub succeeded: usize,
    pub report: PathBuf,
}

/// Debrief `links` in order, skipping any that fail.
///
/// The delay follows every appended debriefing except the last link's.
pub async fn debrief_links<F: FetchArticle, A: AskAsync>(
    links: &[String],
    fetcher: &F,
    provider: &A,
    options: LoopOptions,
) -> Vec<Debriefing> {
    let mut debriefings = Vec::with_capacity(links.len());

    for (i, url) in links.iter().enumerate() {
        info!(index = i + 1, total = links.len(), %url, "Processing link");

        let Some(article) = fetcher.fetch_article(url, options.max_chars).await else {
            warn!(%url, "Skipping link: fetch failed");
            continue;
        };
        let Some(debriefing) = generate_debriefing(provider, article).await else {
            warn!(%url, "Skipping link: no debriefing");
            continue;
        };
        debriefings.push(debriefing);

        if i + 1 < links.len() && !options.delay.is_zero() {
            sleep(options.delay).await;
        }
    }

    debriefings
}

/// Run the whole pipeline for `paths`.
///
/// The report is always written once the links are known, even when every
/// link was skipped.
#[instrument(level = "info", skip_all, fields(input = %paths.input.display(), output = %paths.output.display()))]
pub async fn run<F: FetchArticle, A: AskAsync>(
    paths: &RunPaths,
    fetcher: &F,
    provider: &A,
    options: LoopOptions,
) -> Result<RunSummary, PipelineError> {
    let t0 = Instant::now();

    if !paths.input.exists() {
        error!("Input CSV does not exist");
        return Err(PipelineError::MissingInput(paths.input.clone()));
    }

    let links = extract_links(&paths.input).await?;
    if links.is_empty() {
        error!("Input CSV has no links");
        return Err(PipelineError::NoLinks(paths.input.clone()));
    }
    info!(count = links.len(), provider = provider.name(), "Starting debriefings");

    let debriefings = debrief_links(&links, fetcher, provider, options).await;

    let report_error = |source| PipelineError::Report {
        path: paths.output.clone(),
        source,
    };
    ensure_parent_dir(&paths.output).await.map_err(report_error)?;
    write_report(&debriefings, &paths.output)
        .await
        .map_err(report_error)?;

    let summary = RunSummary {
        attempted: links.len(),
        succeeded: debriefings.len(),
        report: paths.output.clone(),
    };
    info!(
        succeeded = summary.succeeded,
        attempted = summary.attempted,
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "Debriefed {} of {} links",
        summary.succeeded,
        summary.attempted
    );
    Ok(summary)
}
