//! Optional text-to-speech step backed by the ElevenLabs API.
//!
//! A missing credential disables the step rather than failing it: callers get
//! `None` and no file is written.

use reqwest::Client;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument, warn};

use crate::utils::truncate_for_log;

pub const ELEVENLABS_API_URL: &str = "https://api.elevenlabs.io/v1";
pub const DEFAULT_VOICE_ID: &str = "21m00Tcm4TlvDq8ikWCM";
pub const DEFAULT_VOICE_MODEL: &str = "eleven_multilingual_v2";

/// Extension of produced audio files.
pub const AUDIO_EXTENSION: &str = "mp3";

#[derive(Debug, thiserror::Error)]
pub enum VoiceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("input text is empty")]
    EmptyInput,
}

/// Speech credentials and voice selection.
#[derive(Clone)]
pub struct VoiceConfig {
    pub api_key: String,
    pub voice_id: String,
    pub model_id: String,
    pub base_url: String,
}

impl VoiceConfig {
    /// `None` when `api_key` is unset or blank.
    pub fn from_key(api_key: Option<&str>, voice_id: &str) -> Option<Self> {
        let api_key = api_key.map(str::trim).filter(|k| !k.is_empty())?;
        Some(Self {
            api_key: api_key.to_string(),
            voice_id: voice_id.to_string(),
            model_id: DEFAULT_VOICE_MODEL.to_string(),
            base_url: ELEVENLABS_API_URL.to_string(),
        })
    }
}

impl fmt::Debug for VoiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VoiceConfig")
            .field("voice_id", &self.voice_id)
            .field("model_id", &self.model_id)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    text: &'a str,
    model_id: &'a str,
}

/// Sibling of `text_path` with the audio extension.
pub fn audio_path_for(text_path: &Path) -> PathBuf {
    text_path.with_extension(AUDIO_EXTENSION)
}

/// Convert the text file at `text_path` to speech.
///
/// Returns the written audio path, or `None` when the step is disabled or
/// fails. Failures are logged, never propagated.
#[instrument(level = "info", skip(config), fields(path = %text_path.display()))]
pub async fn convert_file_to_speech(
    config: Option<&VoiceConfig>,
    text_path: &Path,
) -> Option<PathBuf> {
    let Some(config) = config else {
        info!("No speech credential configured; skipping voice conversion");
        return None;
    };

    match try_convert(config, text_path).await {
        Ok(out) => {
            info!(output = %out.display(), "Wrote audio file");
            Some(out)
        }
        Err(e) => {
            warn!(error = %e, "Voice conversion failed");
            None
        }
    }
}

async fn try_convert(config: &VoiceConfig, text_path: &Path) -> Result<PathBuf, VoiceError> {
    let text = fs::read_to_string(text_path).await?;
    let text = text.trim();
    if text.is_empty() {
        return Err(VoiceError::EmptyInput);
    }

    let resp = Client::new()
        .post(format!("{}/text-to-speech/{}", config.base_url, config.voice_id))
        .header("xi-api-key", &config.api_key)
        .header(reqwest::header::ACCEPT, "audio/mpeg")
        .json(&SpeechRequest {
            text,
            model_id: &config.model_id,
        })
        .send()
        .await?;

    if !resp.status().is_success() {
        let status = resp.status().as_u16();
        let message = resp.text().await.unwrap_or_default();
        return Err(VoiceError::Api {
            status,
            message: truncate_for_log(&message, 300),
        });
    }

    let audio = resp.bytes().await?;
    let out = audio_path_for(text_path);
    fs::write(&out, &audio).await?;
    Ok(out)
}
