//! Application configuration, read once at startup.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::error::Result;
use crate::llm::{
    CompletionProvider, DEFAULT_OLLAMA_HOST, GROQ_API_URL, LlmConfig, MockProvider,
    OPENAI_API_URL, OllamaProvider, OpenAICompatibleProvider,
};

/// Configuration problems, reported before any work starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{var} must be set to use the {provider} provider")]
    MissingApiKey {
        provider: ProviderKind,
        var: &'static str,
    },

    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("unknown provider '{0}' (use groq, openai, ollama or mock)")]
    UnknownProvider(String),
}

/// Which completion service to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderKind {
    #[default]
    Groq,
    OpenAI,
    Ollama,
    Mock,
}

impl ProviderKind {
    /// Environment variable holding the API key, if the provider needs one.
    pub fn api_key_var(&self) -> Option<&'static str> {
        match self {
            ProviderKind::Groq => Some("GROQ_API_KEY"),
            ProviderKind::OpenAI => Some("OPENAI_API_KEY"),
            ProviderKind::Ollama | ProviderKind::Mock => None,
        }
    }

    fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::Groq | ProviderKind::Mock => "llama-3.3-70b-versatile",
            ProviderKind::OpenAI => "gpt-4o",
            ProviderKind::Ollama => "llama3.2",
        }
    }
}

impl FromStr for ProviderKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "groq" => Ok(ProviderKind::Groq),
            "openai" | "gpt" => Ok(ProviderKind::OpenAI),
            "ollama" | "local" => Ok(ProviderKind::Ollama),
            "mock" | "test" => Ok(ProviderKind::Mock),
            _ => Err(ConfigError::UnknownProvider(s.to_string())),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Groq => write!(f, "groq"),
            ProviderKind::OpenAI => write!(f, "openai"),
            ProviderKind::Ollama => write!(f, "ollama"),
            ProviderKind::Mock => write!(f, "mock"),
        }
    }
}

/// Everything needed to construct the completion provider.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub provider: ProviderKind,
    pub api_key: Option<String>,
    /// Override for the chat-completions URL (OpenAI-compatible providers).
    pub api_url: Option<String>,
    pub ollama_host: String,
    pub llm: LlmConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            api_key: None,
            api_url: None,
            ollama_host: DEFAULT_OLLAMA_HOST.to_string(),
            llm: LlmConfig::default(),
        }
    }
}

impl AppConfig {
    /// Read configuration from the process environment.
    ///
    /// Recognized variables: `CHAUFFEUR_PROVIDER`, `GROQ_API_KEY`,
    /// `OPENAI_API_KEY`, `CHAUFFEUR_API_URL`, `OLLAMA_HOST`,
    /// `CHAUFFEUR_MODEL`, `CHAUFFEUR_TIMEOUT_SECS`, `CHAUFFEUR_MAX_RETRIES`.
    pub fn from_env() -> std::result::Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> std::result::Result<Self, ConfigError> {
        let provider = match lookup("CHAUFFEUR_PROVIDER") {
            Some(value) => value.parse()?,
            None => ProviderKind::default(),
        };
        let mut config = Self::for_provider(provider);

        config.api_key = provider
            .api_key_var()
            .and_then(&lookup)
            .filter(|k| !k.trim().is_empty());
        config.api_url = lookup("CHAUFFEUR_API_URL");
        if let Some(host) = lookup("OLLAMA_HOST") {
            config.ollama_host = host;
        }
        if let Some(model) = lookup("CHAUFFEUR_MODEL") {
            config.llm.model = model;
        }
        if let Some(raw) = lookup("CHAUFFEUR_TIMEOUT_SECS") {
            config.llm.timeout = Duration::from_secs(parse_number("CHAUFFEUR_TIMEOUT_SECS", &raw)?);
        }
        if let Some(raw) = lookup("CHAUFFEUR_MAX_RETRIES") {
            config.llm.max_retries = parse_number("CHAUFFEUR_MAX_RETRIES", &raw)?;
        }

        Ok(config)
    }

    /// Defaults for a provider, with its usual model.
    pub fn for_provider(provider: ProviderKind) -> Self {
        let mut config = Self {
            provider,
            ..Self::default()
        };
        config.llm.model = provider.default_model().to_string();
        config
    }

    /// Check the configuration is usable.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if let Some(var) = self.provider.api_key_var() {
            if self.api_key.as_deref().is_none_or(|k| k.trim().is_empty()) {
                return Err(ConfigError::MissingApiKey {
                    provider: self.provider,
                    var,
                });
            }
        }
        if self.llm.timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                key: "timeout".to_string(),
                value: "0".to_string(),
                reason: "must be at least one second".to_string(),
            });
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(ConfigError::InvalidValue {
                key: "temperature".to_string(),
                value: self.llm.temperature.to_string(),
                reason: "must be between 0.0 and 2.0".to_string(),
            });
        }
        if self.llm.model.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "model".to_string(),
                value: String::new(),
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Validate and construct the configured provider.
    pub fn build_provider(&self) -> Result<Arc<dyn CompletionProvider>> {
        self.validate()?;
        let key = self.api_key.clone().unwrap_or_default();

        let provider: Arc<dyn CompletionProvider> = match self.provider {
            ProviderKind::Groq => Arc::new(OpenAICompatibleProvider::with_endpoint(
                key,
                self.api_url.as_deref().unwrap_or(GROQ_API_URL),
                "groq",
                self.llm.clone(),
            )?),
            ProviderKind::OpenAI => Arc::new(OpenAICompatibleProvider::with_endpoint(
                key,
                self.api_url.as_deref().unwrap_or(OPENAI_API_URL),
                "openai",
                self.llm.clone(),
            )?),
            ProviderKind::Ollama => {
                Arc::new(OllamaProvider::new(&self.ollama_host, self.llm.clone())?)
            }
            ProviderKind::Mock => Arc::new(MockProvider::with_config(self.llm.clone())),
        };

        tracing::debug!(
            provider = provider.name(),
            model = %self.llm.model,
            "completion provider ready"
        );
        Ok(provider)
    }
}

fn parse_number<T: FromStr>(key: &str, raw: &str) -> std::result::Result<T, ConfigError>
where
    T::Err: fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key: key.to_string(),
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_to_groq() {
        let config = AppConfig::from_lookup(lookup(&[("GROQ_API_KEY", "gsk_test")])).unwrap();
        assert_eq!(config.provider, ProviderKind::Groq);
        assert_eq!(config.api_key.as_deref(), Some("gsk_test"));
        assert_eq!(config.llm.model, "llama-3.3-70b-versatile");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_key_is_typed_error() {
        let config = AppConfig::from_lookup(lookup(&[("CHAUFFEUR_PROVIDER", "openai")])).unwrap();
        assert_eq!(
            config.validate(),
            Err(ConfigError::MissingApiKey {
                provider: ProviderKind::OpenAI,
                var: "OPENAI_API_KEY"
            })
        );
    }

    #[test]
    fn test_ollama_needs_no_key() {
        let config = AppConfig::from_lookup(lookup(&[
            ("CHAUFFEUR_PROVIDER", "ollama"),
            ("OLLAMA_HOST", "http://gpu-box:11434"),
        ]))
        .unwrap();
        assert_eq!(config.llm.model, "llama3.2");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_numbers_rejected() {
        let err = AppConfig::from_lookup(lookup(&[("CHAUFFEUR_MAX_RETRIES", "lots")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));

        let err = AppConfig::from_lookup(lookup(&[("CHAUFFEUR_PROVIDER", "claude")])).unwrap_err();
        assert_eq!(err, ConfigError::UnknownProvider("claude".to_string()));
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("CHAUFFEUR_PROVIDER", "mock"),
            ("CHAUFFEUR_MODEL", "tiny"),
            ("CHAUFFEUR_TIMEOUT_SECS", "5"),
            ("CHAUFFEUR_MAX_RETRIES", "0"),
        ]))
        .unwrap();
        assert_eq!(config.llm.model, "tiny");
        assert_eq!(config.llm.timeout, Duration::from_secs(5));
        assert_eq!(config.llm.max_retries, 0);
        assert_eq!(config.build_provider().unwrap().name(), "mock");
    }
}
