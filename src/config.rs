//! Application settings: strategy selection plus completion client config.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::llm::CompletionConfig;

/// Which answer strategy handles a request.
///
/// Both strategies are first-class and share the same contract; the remote
/// client is the default, with the rule-based engine as the drop-in offline
/// fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AnswerMode {
    /// Deterministic rule-based engine (offline, free).
    Rules,
    /// Remote completion client (mock mode without a credential).
    #[default]
    Remote,
}

impl AnswerMode {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "rules" | "offline" => Some(Self::Rules),
            "remote" | "llm" => Some(Self::Remote),
            _ => None,
        }
    }
}

/// Top-level settings, loadable from a TOML file with env overrides.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Answer strategy to use.
    #[serde(default)]
    pub mode: AnswerMode,
    /// Completion client configuration.
    #[serde(default)]
    pub completion: CompletionConfig,
}

impl Settings {
    /// Load settings from an optional TOML file, then apply env overrides.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let settings = match path {
            Some(path) => {
                let raw = fs::read_to_string(path)?;
                toml::from_str(&raw)?
            }
            None => Self::default(),
        };
        Ok(settings.with_env_overrides())
    }

    /// Apply environment variable overrides (`QA_MODE`: "rules" or "remote",
    /// plus the completion client's `QA_*` / `GEMINI_API_KEY` variables).
    ///
    /// A TOML file with a `[completion]` section fills missing fields from
    /// the serde per-field defaults, not from `CompletionConfig::default()`,
    /// so the sub-config overrides must be re-applied here.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(val) = std::env::var("QA_MODE") {
            if let Some(mode) = AnswerMode::from_str(&val) {
                self.mode = mode;
            }
        }
        self.completion = self.completion.with_env_overrides();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_str() {
        assert_eq!(AnswerMode::from_str("rules"), Some(AnswerMode::Rules));
        assert_eq!(AnswerMode::from_str("REMOTE"), Some(AnswerMode::Remote));
        assert_eq!(AnswerMode::from_str("llm"), Some(AnswerMode::Remote));
        assert_eq!(AnswerMode::from_str("magic"), None);
    }

    #[test]
    fn test_settings_parse_toml() {
        let settings: Settings = toml::from_str(
            r#"
            mode = "rules"

            [completion]
            model = "gemini-1.5-pro"
            max_retries = 5
            "#,
        )
        .expect("valid settings");
        assert_eq!(settings.mode, AnswerMode::Rules);
        assert_eq!(settings.completion.model, "gemini-1.5-pro");
        assert_eq!(settings.completion.max_retries, 5);
    }

    #[test]
    fn test_env_credential_survives_file_load() {
        std::env::set_var("QA_API_KEY", "from-env");

        // A [completion] section fills missing fields via serde defaults;
        // the env credential must still land after the override pass.
        let settings: Settings = toml::from_str(
            r#"
            [completion]
            model = "gemini-1.5-pro"
            "#,
        )
        .expect("valid settings");
        assert!(!settings.completion.has_credential());

        let settings = settings.with_env_overrides();
        assert!(settings.completion.has_credential());
        assert_eq!(settings.completion.api_key.as_deref(), Some("from-env"));
        assert_eq!(settings.completion.model, "gemini-1.5-pro");

        std::env::remove_var("QA_API_KEY");
    }
}
