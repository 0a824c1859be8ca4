//! # Article Debrief
//!
//! Reads a day's list of article links from a CSV file, scrapes each page,
//! asks an LLM for a short analyst-style debriefing of it, and writes all
//! debriefings to one text report. The report can then be narrated with a
//! text-to-speech API.
//!
//! ## Usage
//!
//! ```sh
//! article_debrief                     # ~/Materials/dd-MM-yyyy.csv -> .txt
//! article_debrief --speak             # ... and narrate the report
//! article_debrief speak report.txt    # narrate an existing file
//! article_debrief compare <URL>       # every configured provider on one page
//! ```
//!
//! ## Architecture
//!
//! 1. **Links**: read the CSV once ([`links`])
//! 2. **Fetching**: scrape title and body of each link ([`scrapers::article`])
//! 3. **Debriefing**: one LLM call per article ([`debrief`], [`api`])
//! 4. **Output**: write the report ([`outputs::report`])
//! 5. **Voice** (optional): narrate the report ([`voice`])
//!
//! Links are handled one at a time with a one second pause in between.

use chrono::Local;
use clap::Parser;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cli;
mod debrief;
mod links;
mod models;
mod outputs;
mod pipeline;
mod scrapers;
#[cfg(test)]
mod test_support;
mod utils;
mod voice;

use api::{AskAsync, Provider};
use cli::{Cli, Command};
use debrief::generate_debriefing;
use pipeline::{LoopOptions, PipelineError, RunPaths};
use scrapers::article::{ArticleFetcher, COMPARE_MAX_CHARS};
use voice::convert_file_to_speech;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let dotenv = dotenvy::dotenv();

    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    if let Err(e) = dotenv {
        debug!(error = %e, "No .env file loaded");
    }

    let start_time = std::time::Instant::now();
    let args = Cli::parse();
    debug!(command = ?args.command, input = ?args.input, output = ?args.output, "Parsed CLI arguments");

    let result = match &args.command {
        None | Some(Command::Run) => run(&args).await,
        Some(Command::Speak { file }) => {
            let voice = args.voice_config();
            if convert_file_to_speech(voice.as_ref(), file).await.is_none() {
                warn!(path = %file.display(), "No audio produced");
            }
            Ok(())
        }
        Some(Command::Compare { url }) => compare(&args, url).await,
    };

    if let Err(e) = result {
        error!(error = %e, "Fatal error");
        return Err(e);
    }

    let elapsed = start_time.elapsed();
    info!(?elapsed, secs = elapsed.as_secs(), "Execution complete");
    Ok(())
}

/// The default pipeline: CSV in, report out, optional narration.
async fn run(args: &Cli) -> Result<(), Box<dyn Error>> {
    let provider = Provider::select(&args.provider_settings()).ok_or(PipelineError::NoProvider)?;
    info!(provider = provider.name(), "Selected LLM provider");

    let paths = RunPaths::resolve(
        args.materials_dir.clone(),
        args.input.clone(),
        args.output.clone(),
        Local::now().date_naive(),
    )?;
    let fetcher = ArticleFetcher::new()?;
    let options = LoopOptions {
        delay: Duration::from_millis(args.delay_ms),
        max_chars: args.max_chars,
    };

    let summary = pipeline::run(&paths, &fetcher, &provider, options).await?;
    println!(
        "Debriefed {} of {} articles -> {}",
        summary.succeeded,
        summary.attempted,
        summary.report.display()
    );

    if args.speak {
        let voice = args.voice_config();
        if let Some(audio) = convert_file_to_speech(voice.as_ref(), &summary.report).await {
            println!("Audio -> {}", audio.display());
        }
    }
    Ok(())
}

/// Ask every configured provider about the same page.
async fn compare(args: &Cli, url: &str) -> Result<(), Box<dyn Error>> {
    let providers = Provider::all_configured(&args.provider_settings());
    if providers.is_empty() {
        return Err(PipelineError::NoProvider.into());
    }

    let fetcher = ArticleFetcher::new()?;
    let Some(article) = fetcher.fetch(url, COMPARE_MAX_CHARS).await else {
        return Err(format!("could not fetch {url}").into());
    };
    println!("TITLE: {}\n", article.title);

    for provider in &providers {
        println!("--- {} ---", provider.name());
        match generate_debriefing(provider, article.clone()).await {
            Some(d) => println!("{}\n", d.summary),
            None => println!("(no debriefing)\n"),
        }
    }
    Ok(())
}
