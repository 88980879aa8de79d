//! Ollama local model provider.
//!
//! Runs without an API key against a local `ollama serve`.

use reqwest::blocking::Client;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde_json::json;

use crate::error::{Result, SummaryError};

use super::provider::{CompletionProvider, LlmConfig, with_retries};

/// Default Ollama host.
pub const DEFAULT_OLLAMA_HOST: &str = "http://localhost:11434";

/// Ollama local LLM provider.
pub struct OllamaProvider {
    client: Client,
    api_url: String,
    config: LlmConfig,
}

impl OllamaProvider {
    /// Create a provider for `host` (e.g. `http://localhost:11434`).
    pub fn new(host: &str, config: LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SummaryError::Completion(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_url: format!("{}/api/chat", host.trim_end_matches('/')),
            config,
        })
    }

    /// Create with a specific model on the default host.
    pub fn with_model(model: impl Into<String>) -> Result<Self> {
        let config = LlmConfig {
            model: model.into(),
            ..LlmConfig::default()
        };
        Self::new(DEFAULT_OLLAMA_HOST, config)
    }

    fn build_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }

    /// Send a message to Ollama.
    fn send_message(&self, system: Option<&str>, user_prompt: &str) -> Result<String> {
        let mut messages = Vec::new();
        if let Some(system) = system {
            messages.push(json!({ "role": "system", "content": system }));
        }
        messages.push(json!({ "role": "user", "content": user_prompt }));

        let body = json!({
            "model": self.config.model,
            "stream": false,
            "options": {
                "temperature": self.config.temperature,
                "num_predict": self.config.max_tokens
            },
            "messages": messages,
        });

        let response = self
            .client
            .post(&self.api_url)
            .headers(self.build_headers())
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    SummaryError::Completion(
                        "Failed to connect to Ollama. Is it running? Start with: ollama serve"
                            .to_string(),
                    )
                } else {
                    SummaryError::Completion(format!("Ollama request failed: {}", e))
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().unwrap_or_default();

            if error_text.contains("not found") {
                return Err(SummaryError::Rejected {
                    status: status.as_u16(),
                    message: format!(
                        "Model '{}' not found. Pull it with: ollama pull {}",
                        self.config.model, self.config.model
                    ),
                });
            }

            return Err(SummaryError::from_status(
                status.as_u16(),
                format!("Ollama error: {}", error_text),
            ));
        }

        let api_response: OllamaResponse = response.json().map_err(|e| {
            SummaryError::Completion(format!("Failed to parse Ollama response: {}", e))
        })?;

        Ok(api_response.message.content)
    }
}

impl CompletionProvider for OllamaProvider {
    fn complete(&self, prompt: &str) -> Result<String> {
        with_retries(&self.config, "ollama", || self.send_message(None, prompt))
    }

    fn complete_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        with_retries(&self.config, "ollama", || {
            self.send_message(Some(system), prompt)
        })
    }

    fn config(&self) -> &LlmConfig {
        &self.config
    }

    fn name(&self) -> &str {
        "ollama"
    }
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    message: OllamaMessage,
}

#[derive(Debug, Deserialize)]
struct OllamaMessage {
    #[serde(default)]
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_url_from_host() {
        let provider = OllamaProvider::new("http://gpu-box:11434/", LlmConfig::default()).unwrap();
        assert_eq!(provider.api_url, "http://gpu-box:11434/api/chat");

        let local = OllamaProvider::with_model("mistral").unwrap();
        assert_eq!(local.api_url, "http://localhost:11434/api/chat");
        assert_eq!(local.config().model, "mistral");
    }

    #[test]
    fn test_parse_response() {
        let raw = r#"{"model":"llama3.2","message":{"role":"assistant","content":"hello"},"done":true}"#;
        let parsed: OllamaResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.message.content, "hello");
    }
}
