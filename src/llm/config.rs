//! Completion client configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the remote completion client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionConfig {
    /// API endpoint base URL.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// API key; absence routes every request to the mock path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Model to query.
    #[serde(default = "default_model")]
    pub model: String,
    /// Maximum attempts when the service signals rate limiting.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Base backoff delay in milliseconds (doubles per attempt).
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    /// Temperature for generation (0.0 - 1.0).
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Maximum tokens in response.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Maximum characters of context to send.
    #[serde(default = "default_max_content_chars")]
    pub max_content_chars: usize,
}

fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_max_retries() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    2000
}

fn default_temperature() -> f32 {
    0.1
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_max_content_chars() -> usize {
    12000
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self::base_default().with_env_overrides()
    }
}

impl CompletionConfig {
    /// Base default without env overrides (used internally to avoid recursion).
    pub(crate) fn base_default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: None,
            model: default_model(),
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            max_content_chars: default_max_content_chars(),
        }
    }

    /// Apply environment variable overrides.
    ///
    /// Supported env vars:
    /// - `GEMINI_API_KEY` / `QA_API_KEY`: API key (mock mode when neither is set)
    /// - `QA_ENDPOINT`: API endpoint base URL
    /// - `QA_MODEL`: Model name
    /// - `QA_MAX_RETRIES`: Rate-limit retry cap
    /// - `QA_BASE_DELAY_MS`: Base backoff delay
    /// - `QA_TEMPERATURE`: Generation temperature
    /// - `QA_MAX_TOKENS`: Maximum response tokens
    /// - `QA_MAX_CONTENT_CHARS`: Max context chars to send
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(val) = std::env::var("GEMINI_API_KEY") {
            self.api_key = Some(val);
        }
        if let Ok(val) = std::env::var("QA_API_KEY") {
            self.api_key = Some(val);
        }
        if let Ok(val) = std::env::var("QA_ENDPOINT") {
            self.endpoint = val;
        }
        if let Ok(val) = std::env::var("QA_MODEL") {
            self.model = val;
        }
        if let Ok(val) = std::env::var("QA_MAX_RETRIES") {
            if let Ok(n) = val.parse() {
                self.max_retries = n;
            }
        }
        if let Ok(val) = std::env::var("QA_BASE_DELAY_MS") {
            if let Ok(n) = val.parse() {
                self.base_delay_ms = n;
            }
        }
        if let Ok(val) = std::env::var("QA_TEMPERATURE") {
            if let Ok(t) = val.parse() {
                self.temperature = t;
            }
        }
        if let Ok(val) = std::env::var("QA_MAX_TOKENS") {
            if let Ok(n) = val.parse() {
                self.max_tokens = n;
            }
        }
        if let Ok(val) = std::env::var("QA_MAX_CONTENT_CHARS") {
            if let Ok(n) = val.parse() {
                self.max_content_chars = n;
            }
        }
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    /// Whether a remote-service credential is configured.
    pub fn has_credential(&self) -> bool {
        self.api_key.as_deref().map(|k| !k.is_empty()).unwrap_or(false)
    }

    /// Base backoff delay as a `Duration`.
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_defaults() {
        let config = CompletionConfig::base_default();
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.base_delay(), Duration::from_secs(2));
        assert!(config.model.contains("gemini"));
        assert!(!config.has_credential());
    }

    #[test]
    fn test_empty_key_is_no_credential() {
        let config = CompletionConfig::base_default().with_api_key("");
        assert!(!config.has_credential());
        let config = config.with_api_key("k");
        assert!(config.has_credential());
    }
}
