//! Typed configuration from environment variables.
//!
//! Loads once at startup and fails fast when the provider credential is
//! missing. The key is held as a `SecretString` so it never reaches logs.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use clap::ValueEnum;
use secrecy::SecretString;

use crate::llm::{GeminiClient, LlmClient, LlmError, OpenAiClient};

pub const MODEL_VAR: &str = "CHAT_RELAY_MODEL";
pub const BASE_URL_VAR: &str = "CHAT_RELAY_BASE_URL";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Provider {
    /// Google Generative Language API
    #[value(name = "google_genai", alias = "gemini")]
    GoogleGenai,
    /// OpenAI chat completions
    #[value(name = "openai")]
    OpenAi,
}

impl Provider {
    pub fn credential_var(self) -> &'static str {
        match self {
            Provider::GoogleGenai => "GOOGLE_API_KEY",
            Provider::OpenAi => "OPENAI_API_KEY",
        }
    }

    pub fn default_model(self) -> &'static str {
        match self {
            Provider::GoogleGenai => "gemini-1.5-flash",
            Provider::OpenAi => "gpt-3.5-turbo",
        }
    }

    fn default_base_url(self) -> &'static str {
        match self {
            Provider::GoogleGenai => GeminiClient::DEFAULT_BASE_URL,
            Provider::OpenAi => OpenAiClient::DEFAULT_BASE_URL,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::GoogleGenai => f.write_str("google_genai"),
            Provider::OpenAi => f.write_str("openai"),
        }
    }
}

#[derive(Debug)]
pub struct Config {
    pub provider: Provider,
    pub model: String,
    pub base_url: String,
    pub api_key: SecretString,
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// Call [`load_env_file`] or `dotenvy::dotenv()` first to seed the
    /// environment from a file.
    pub fn from_env(provider: Provider, model: Option<String>) -> Result<Self, LlmError> {
        Self::from_lookup(provider, model, |name| std::env::var(name).ok())
    }

    /// Same as [`Config::from_env`] with a caller-supplied variable source.
    pub fn from_lookup<F>(
        provider: Provider,
        model: Option<String>,
        lookup: F,
    ) -> Result<Self, LlmError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = provider.credential_var();
        let api_key = lookup(var)
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| LlmError::MissingCredential {
                var: var.to_string(),
            })?;

        let model = non_blank(model)
            .or_else(|| non_blank(lookup(MODEL_VAR)))
            .unwrap_or_else(|| provider.default_model().to_string());

        let base_url = non_blank(lookup(BASE_URL_VAR))
            .unwrap_or_else(|| provider.default_base_url().to_string());

        Ok(Self {
            provider,
            model,
            base_url,
            api_key: SecretString::from(api_key),
        })
    }

    /// Consume the configuration into the shared client handle.
    pub fn into_client(self) -> Arc<dyn LlmClient> {
        match self.provider {
            Provider::GoogleGenai => {
                Arc::new(GeminiClient::new(self.base_url, self.model, self.api_key))
            }
            Provider::OpenAi => Arc::new(OpenAiClient::new(self.base_url, self.model, self.api_key)),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Load variables from an explicit dotenv file. Unlike `dotenvy::dotenv()`,
/// a missing file is an error.
pub fn load_env_file(path: &Path) -> anyhow::Result<()> {
    dotenvy::from_path(path)
        .with_context(|| format!("failed to load env file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_gemini_defaults() {
        let config =
            Config::from_lookup(Provider::GoogleGenai, None, lookup_from(&[("GOOGLE_API_KEY", "g-key")]))
                .unwrap();

        assert_eq!(config.model, "gemini-1.5-flash");
        assert_eq!(config.base_url, GeminiClient::DEFAULT_BASE_URL);
        assert_eq!(config.api_key.expose_secret(), "g-key");
    }

    #[test]
    fn test_missing_credential_fails() {
        let err = Config::from_lookup(Provider::GoogleGenai, None, lookup_from(&[])).unwrap_err();
        match err {
            LlmError::MissingCredential { var } => assert_eq!(var, "GOOGLE_API_KEY"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_blank_credential_counts_as_missing() {
        let result = Config::from_lookup(
            Provider::OpenAi,
            None,
            lookup_from(&[("OPENAI_API_KEY", "   "), ("GOOGLE_API_KEY", "g-key")]),
        );
        assert!(matches!(result, Err(LlmError::MissingCredential { .. })));
    }

    #[test]
    fn test_model_precedence() {
        let vars = [("OPENAI_API_KEY", "o-key"), (MODEL_VAR, "gpt-4o-mini")];

        let from_env = Config::from_lookup(Provider::OpenAi, None, lookup_from(&vars)).unwrap();
        assert_eq!(from_env.model, "gpt-4o-mini");

        let from_flag =
            Config::from_lookup(Provider::OpenAi, Some("gpt-4".into()), lookup_from(&vars)).unwrap();
        assert_eq!(from_flag.model, "gpt-4");
    }

    #[test]
    fn test_blank_model_flag_falls_back_to_env() {
        let vars = [("OPENAI_API_KEY", "o-key"), (MODEL_VAR, " gpt-4o-mini ")];

        let config = Config::from_lookup(Provider::OpenAi, Some("".into()), lookup_from(&vars)).unwrap();
        assert_eq!(config.model, "gpt-4o-mini");

        let config =
            Config::from_lookup(Provider::OpenAi, Some("  ".into()), lookup_from(&vars[..1])).unwrap();
        assert_eq!(config.model, "gpt-3.5-turbo");
    }

    #[test]
    fn test_base_url_override() {
        let config = Config::from_lookup(
            Provider::OpenAi,
            None,
            lookup_from(&[("OPENAI_API_KEY", "o-key"), (BASE_URL_VAR, "http://localhost:1234/v1")]),
        )
        .unwrap();
        assert_eq!(config.base_url, "http://localhost:1234/v1");
    }

    #[test]
    fn test_debug_redacts_key() {
        let config =
            Config::from_lookup(Provider::GoogleGenai, None, lookup_from(&[("GOOGLE_API_KEY", "super-secret")]))
                .unwrap();
        assert!(!format!("{config:?}").contains("super-secret"));
    }

    #[test]
    fn test_into_client_binds_model() {
        let config = Config::from_lookup(
            Provider::GoogleGenai,
            Some("gemini-1.5-pro".into()),
            lookup_from(&[("GOOGLE_API_KEY", "g-key")]),
        )
        .unwrap();
        assert_eq!(config.into_client().model(), "gemini-1.5-pro");
    }

    #[test]
    fn test_load_env_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "CHAT_RELAY_ENV_FILE_TEST=loaded").unwrap();

        load_env_file(file.path()).unwrap();
        assert_eq!(std::env::var("CHAT_RELAY_ENV_FILE_TEST").unwrap(), "loaded");
    }

    #[test]
    fn test_load_missing_env_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_env_file(&dir.path().join("absent.env")).is_err());
    }

    #[test]
    fn test_provider_names() {
        assert_eq!(Provider::from_str("google_genai", false), Ok(Provider::GoogleGenai));
        assert_eq!(Provider::from_str("gemini", false), Ok(Provider::GoogleGenai));
        assert_eq!(Provider::OpenAi.to_string(), "openai");
    }
}
