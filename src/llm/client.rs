//! Completion client with rate-limit retry and mock fallback.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::qa::AnswerProvider;

use super::config::CompletionConfig;
use super::prompts::build_prompt;

/// Returned without contacting the service when the context is empty.
pub const INSUFFICIENT_TEXT_MESSAGE: &str =
    "The image does not contain sufficient text information.";

/// Returned after exhausting all rate-limit retries.
pub const SERVICE_BUSY_MESSAGE: &str =
    "Sorry, the AI service is currently busy. Please try again later.";

/// Returned on any non-retryable remote failure.
pub const GENERIC_FAILURE_MESSAGE: &str =
    "Sorry, I encountered an error while processing your request with the AI model.";

/// Errors that can occur when calling the completion service.
///
/// Only [`CompletionError::RateLimited`] is retryable; everything else is
/// assumed non-transient (bad prompt, malformed response, auth failure).
#[derive(Debug, Error)]
pub enum CompletionError {
    /// Service signaled throttling; retry after a delay.
    #[error("rate limited by completion service")]
    RateLimited,
    /// Failed to reach the service.
    #[error("connection error: {0}")]
    Connection(String),
    /// Service returned an error response.
    #[error("API error: {0}")]
    Api(String),
    /// Response could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),
}

/// A generative-text collaborator: one prompt in, one completion out.
///
/// The seam exists so the retry state machine can be exercised against fake
/// collaborators in tests.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, CompletionError>;
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
struct GeminiGenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
    error: Option<GeminiApiError>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiResponseContent,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiApiError {
    message: String,
}

/// Gemini `generateContent` backend.
pub struct GeminiBackend {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
    temperature: f32,
    max_tokens: u32,
}

impl GeminiBackend {
    /// Create a backend from a config with a credential present.
    pub fn new(config: &CompletionConfig, api_key: String) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            api_key,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }
}

#[async_trait]
impl GenerativeBackend for GeminiBackend {
    async fn generate(&self, prompt: &str) -> Result<String, CompletionError> {
        let request = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GeminiGenerationConfig {
                temperature: self.temperature,
                max_output_tokens: self.max_tokens,
            },
        };

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.endpoint, self.model, self.api_key
        );

        let resp = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| CompletionError::Connection(e.to_string()))?;

        if resp.status() == StatusCode::TOO_MANY_REQUESTS {
            return Err(CompletionError::RateLimited);
        }

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(CompletionError::Api(format!("HTTP {}: {}", status, body)));
        }

        let response: GeminiResponse = resp
            .json()
            .await
            .map_err(|e| CompletionError::Parse(e.to_string()))?;

        if let Some(error) = response.error {
            return Err(CompletionError::Api(error.message));
        }

        response
            .candidates
            .and_then(|c| c.into_iter().next())
            .and_then(|c| c.content.parts.into_iter().next())
            .and_then(|p| p.text)
            .ok_or_else(|| CompletionError::Parse("response contained no candidates".to_string()))
    }
}

/// Resilient client for the remote completion collaborator.
///
/// Credential presence is decided once at construction: without an API key
/// the client never touches the network and answers in mock mode.
pub struct CompletionClient {
    config: CompletionConfig,
    backend: Option<Box<dyn GenerativeBackend>>,
}

impl CompletionClient {
    /// Create a client, building the Gemini backend when a credential is
    /// configured.
    pub fn new(config: CompletionConfig) -> Self {
        let backend: Option<Box<dyn GenerativeBackend>> = if config.has_credential() {
            let api_key = config.api_key.clone().unwrap_or_default();
            Some(Box::new(GeminiBackend::new(&config, api_key)))
        } else {
            None
        };

        Self { config, backend }
    }

    /// Create a client with an injected backend (for tests and alternative
    /// providers).
    pub fn with_backend(config: CompletionConfig, backend: Box<dyn GenerativeBackend>) -> Self {
        Self {
            config,
            backend: Some(backend),
        }
    }

    /// Get the config.
    pub fn config(&self) -> &CompletionConfig {
        &self.config
    }

    /// Ask a question grounded in the provided context text.
    ///
    /// Retries on rate limiting with exponential backoff
    /// (`base_delay * 2^(attempt-1)`), capped at `max_retries` attempts.
    /// Every failure mode maps to a fixed user-facing string.
    pub async fn ask(&self, context_text: &str, question: &str) -> String {
        if context_text.trim().is_empty() {
            return INSUFFICIENT_TEXT_MESSAGE.to_string();
        }

        let backend = match &self.backend {
            Some(backend) => backend,
            None => {
                info!("running in mock mode (no API key)");
                return self.mock_answer(question);
            }
        };

        let prompt = build_prompt(self.truncate_context(context_text), question);

        for attempt in 1..=self.config.max_retries {
            match backend.generate(&prompt).await {
                Ok(text) => return text.trim().to_string(),
                Err(CompletionError::RateLimited) => {
                    if attempt == self.config.max_retries {
                        break;
                    }
                    let delay = self.config.base_delay() * 2u32.pow(attempt - 1);
                    warn!(
                        "rate limited, retrying in {:?} (attempt {}/{})",
                        delay, attempt, self.config.max_retries
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    error!("completion failed: {}", e);
                    return GENERIC_FAILURE_MESSAGE.to_string();
                }
            }
        }

        SERVICE_BUSY_MESSAGE.to_string()
    }

    /// Deterministic placeholder answer, clearly labeled as such.
    fn mock_answer(&self, question: &str) -> String {
        format!(
            "[MOCK ANSWER] This is a placeholder answer because no API key is configured. \
             The system would normally use {} to answer: {}",
            self.config.model, question
        )
    }

    /// Truncate context to the configured maximum number of characters.
    fn truncate_context<'a>(&self, text: &'a str) -> &'a str {
        match text.char_indices().nth(self.config.max_content_chars) {
            Some((idx, _)) => &text[..idx],
            None => text,
        }
    }
}

#[async_trait]
impl AnswerProvider for CompletionClient {
    async fn answer(&self, text: &str, question: &str) -> String {
        self.ask(text, question).await
    }
}
