//! LLM provider clients.
//!
//! Two interchangeable backends sit behind the [`AskAsync`] trait:
//!
//! - [`OpenAiClient`]: OpenAI chat completions (primary)
//! - [`GeminiClient`]: Google Gemini `generateContent` (secondary)
//!
//! [`Provider`] is chosen once at startup from the configured credentials
//! and then passed by reference to everything that needs it.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

use crate::utils::truncate_for_log;

pub const OPENAI_API_URL: &str = "https://api.openai.com/v1";
pub const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
}

/// Trait for async LLM interaction.
///
/// `Ok(None)` means the provider answered but produced no text; transport
/// and API failures are `Err`.
pub trait AskAsync {
    /// Short provider name for logs and comparison output.
    fn name(&self) -> &'static str;

    /// Send `prompt` as a single user message.
    async fn ask(&self, prompt: &str) -> Result<Option<String>, ProviderError>;
}

/// Credentials and model names for both providers, as configured.
#[derive(Debug, Clone, Default)]
pub struct ProviderSettings {
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
}

impl ProviderSettings {
    fn openai(&self) -> Option<OpenAiClient> {
        configured(&self.openai_api_key).map(|key| OpenAiClient::new(key, &self.openai_model))
    }

    fn gemini(&self) -> Option<GeminiClient> {
        configured(&self.gemini_api_key).map(|key| GeminiClient::new(key, &self.gemini_model))
    }
}

fn configured(key: &Option<String>) -> Option<&str> {
    key.as_deref().map(str::trim).filter(|k| !k.is_empty())
}

/// The single LLM backend used for a run.
#[derive(Debug)]
pub enum Provider {
    OpenAi(OpenAiClient),
    Gemini(GeminiClient),
}

impl Provider {
    /// OpenAI when its key is set, otherwise Gemini, otherwise `None`.
    pub fn select(settings: &ProviderSettings) -> Option<Self> {
        settings
            .openai()
            .map(Provider::OpenAi)
            .or_else(|| settings.gemini().map(Provider::Gemini))
    }

    /// Every provider that has a credential, primary first.
    pub fn all_configured(settings: &ProviderSettings) -> Vec<Self> {
        settings
            .openai()
            .map(Provider::OpenAi)
            .into_iter()
            .chain(settings.gemini().map(Provider::Gemini))
            .collect()
    }
}

impl AskAsync for Provider {
    fn name(&self) -> &'static str {
        match self {
            Provider::OpenAi(c) => c.name(),
            Provider::Gemini(c) => c.name(),
        }
    }

    async fn ask(&self, prompt: &str) -> Result<Option<String>, ProviderError> {
        match self {
            Provider::OpenAi(c) => c.ask(prompt).await,
            Provider::Gemini(c) => c.ask(prompt).await,
        }
    }
}

/// OpenAI chat completions client.
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: OPENAI_API_URL.into(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

impl fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

impl AskAsync for OpenAiClient {
    fn name(&self) -> &'static str {
        "openai"
    }

    #[instrument(level = "info", skip_all, fields(model = %self.model))]
    async fn ask(&self, prompt: &str) -> Result<Option<String>, ProviderError> {
        let t0 = Instant::now();
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .inspect_err(|e| warn!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            warn!(status, message = %truncate_for_log(&message, 300), "OpenAI API error");
            return Err(ProviderError::Api { status, message });
        }

        let response = resp.json::<ChatResponse>().await?;
        let text = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content);

        info!(
            elapsed_ms = t0.elapsed().as_millis() as u64,
            has_text = text.is_some(),
            "OpenAI completion finished"
        );
        Ok(text)
    }
}

/// Google Gemini `generateContent` client.
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: GEMINI_API_URL.into(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

impl fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiClient")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
}

impl AskAsync for GeminiClient {
    fn name(&self) -> &'static str {
        "gemini"
    }

    #[instrument(level = "info", skip_all, fields(model = %self.model))]
    async fn ask(&self, prompt: &str) -> Result<Option<String>, ProviderError> {
        let t0 = Instant::now();
        let body = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: Some(prompt.to_string()),
                }],
            }],
        };

        let resp = self
            .client
            .post(format!("{}/models/{}:generateContent", self.base_url, self.model))
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .inspect_err(|e| warn!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            warn!(status, message = %truncate_for_log(&message, 300), "Gemini API error");
            return Err(ProviderError::Api { status, message });
        }

        let response = resp.json::<GeminiResponse>().await?;
        let text: String = response
            .candidates
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();
        debug!(chars = text.len(), "Gemini candidate text");

        info!(
            elapsed_ms = t0.elapsed().as_millis() as u64,
            has_text = !text.is_empty(),
            "Gemini completion finished"
        );
        Ok((!text.is_empty()).then_some(text))
    }
}
