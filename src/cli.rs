//! Command-line interface definitions for Article Debrief.
//!
//! All credentials can be provided via flags or environment variables; a
//! `.env` file in the working directory is loaded before parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::api::{DEFAULT_GEMINI_MODEL, DEFAULT_OPENAI_MODEL, ProviderSettings};
use crate::scrapers::article::PIPELINE_MAX_CHARS;
use crate::voice::{DEFAULT_VOICE_ID, VoiceConfig};

/// Command-line arguments for the Article Debrief application.
///
/// # Examples
///
/// ```sh
/// # Today's ~/Materials/dd-MM-yyyy.csv -> ~/Materials/dd-MM-yyyy.txt
/// article_debrief
///
/// # Explicit files, then narrate the report
/// article_debrief -i links.csv -o report.txt --speak
///
/// # Narrate an existing text file
/// article_debrief speak ~/Materials/18-10-2026.txt
///
/// # Compare both providers on one page
/// article_debrief compare https://example.com/story
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// OpenAI API key (primary provider)
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// OpenAI model name
    #[arg(long, env = "OPENAI_MODEL", default_value = DEFAULT_OPENAI_MODEL)]
    pub openai_model: String,

    /// Google Gemini API key (used when no OpenAI key is set)
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    /// Gemini model name
    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_GEMINI_MODEL)]
    pub gemini_model: String,

    /// ElevenLabs API key (enables text-to-speech)
    #[arg(long, env = "ELEVENLABS_API_KEY", hide_env_values = true)]
    pub elevenlabs_api_key: Option<String>,

    /// ElevenLabs voice id
    #[arg(long, env = "ELEVENLABS_VOICE_ID", default_value = DEFAULT_VOICE_ID)]
    pub voice_id: String,

    /// Directory holding the dated CSV and report [default: ~/Materials]
    #[arg(long, env = "MATERIALS_DIR")]
    pub materials_dir: Option<PathBuf>,

    /// Input CSV (overrides the dated file)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output report (overrides the dated file)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Delay between links, in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub delay_ms: u64,

    /// Maximum characters of article text sent to the model
    #[arg(long, default_value_t = PIPELINE_MAX_CHARS)]
    pub max_chars: usize,

    /// Convert the finished report to speech
    #[arg(long)]
    pub speak: bool,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Debrief every link of the input CSV (default)
    Run,
    /// Convert a text file to speech
    Speak {
        /// Text file to narrate
        file: PathBuf,
    },
    /// Print the debriefing of one URL from every configured provider
    Compare {
        /// Article URL
        url: String,
    },
}

impl Cli {
    pub fn provider_settings(&self) -> ProviderSettings {
        ProviderSettings {
            openai_api_key: self.openai_api_key.clone(),
            openai_model: self.openai_model.clone(),
            gemini_api_key: self.gemini_api_key.clone(),
            gemini_model: self.gemini_model.clone(),
        }
    }

    pub fn voice_config(&self) -> Option<VoiceConfig> {
        VoiceConfig::from_key(self.elevenlabs_api_key.as_deref(), &self.voice_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["article_debrief"]);
        assert_eq!(cli.command, None);
        assert_eq!(cli.delay_ms, 1000);
        assert_eq!(cli.max_chars, 4000);
        assert!(!cli.speak);
        assert!(cli.input.is_none());
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from([
            "article_debrief",
            "-i",
            "/tmp/links.csv",
            "-o",
            "/tmp/report.txt",
            "--speak",
        ]);
        assert_eq!(cli.input, Some(PathBuf::from("/tmp/links.csv")));
        assert_eq!(cli.output, Some(PathBuf::from("/tmp/report.txt")));
        assert!(cli.speak);
    }

    #[test]
    fn test_cli_subcommands() {
        let cli = Cli::parse_from(["article_debrief", "speak", "notes.txt"]);
        assert_eq!(
            cli.command,
            Some(Command::Speak {
                file: PathBuf::from("notes.txt")
            })
        );

        let cli = Cli::parse_from(["article_debrief", "compare", "https://example.com"]);
        assert_eq!(
            cli.command,
            Some(Command::Compare {
                url: "https://example.com".to_string()
            })
        );
    }

    #[test]
    fn test_cli_keys_feed_settings() {
        let cli = Cli::parse_from([
            "article_debrief",
            "--openai-api-key",
            "sk-1",
            "--gemini-model",
            "gemini-pro",
        ]);
        let settings = cli.provider_settings();
        assert_eq!(settings.openai_api_key.as_deref(), Some("sk-1"));
        assert_eq!(settings.gemini_model, "gemini-pro");
    }
}
