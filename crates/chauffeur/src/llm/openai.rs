//! OpenAI-compatible chat-completions provider (OpenAI and Groq).

use reqwest::blocking::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde_json::json;

use crate::error::{Result, SummaryError};

use super::provider::{CompletionProvider, LlmConfig, with_retries};

/// Groq's OpenAI-compatible endpoint.
pub const GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// OpenAI API endpoint.
pub const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Provider for any service speaking the OpenAI chat-completions protocol.
pub struct OpenAICompatibleProvider {
    client: Client,
    api_key: String,
    api_url: String,
    label: &'static str,
    config: LlmConfig,
}

impl OpenAICompatibleProvider {
    /// Groq provider with the default model.
    pub fn groq(api_key: impl Into<String>) -> Result<Self> {
        Self::with_endpoint(api_key, GROQ_API_URL, "groq", LlmConfig::default())
    }

    /// OpenAI provider with `gpt-4o`.
    pub fn openai(api_key: impl Into<String>) -> Result<Self> {
        let config = LlmConfig {
            model: "gpt-4o".to_string(),
            ..LlmConfig::default()
        };
        Self::with_endpoint(api_key, OPENAI_API_URL, "openai", config)
    }

    /// Provider for an explicit endpoint and configuration.
    pub fn with_endpoint(
        api_key: impl Into<String>,
        api_url: impl Into<String>,
        label: &'static str,
        config: LlmConfig,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SummaryError::Completion(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            api_url: api_url.into(),
            label,
            config,
        })
    }

    /// Build headers for API requests.
    fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))
                .map_err(|e| SummaryError::Completion(format!("Invalid API key: {}", e)))?,
        );
        Ok(headers)
    }

    /// Send one chat request and return the first choice's text.
    fn send_message(&self, system: Option<&str>, user_prompt: &str) -> Result<String> {
        let mut messages = Vec::new();
        if let Some(system) = system {
            messages.push(json!({ "role": "system", "content": system }));
        }
        messages.push(json!({ "role": "user", "content": user_prompt }));

        let body = json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "stream": false,
            "messages": messages,
        });

        let response = self
            .client
            .post(&self.api_url)
            .headers(self.build_headers()?)
            .json(&body)
            .send()
            .map_err(|e| {
                SummaryError::Completion(format!("{} request failed: {}", self.label, e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().unwrap_or_default();
            return Err(SummaryError::from_status(
                status.as_u16(),
                format!("{} API error: {}", self.label, error_text),
            ));
        }

        let api_response: ChatResponse = response
            .json()
            .map_err(|e| SummaryError::Completion(format!("Failed to parse API response: {}", e)))?;

        extract_text(api_response, self.label)
    }
}

impl CompletionProvider for OpenAICompatibleProvider {
    fn complete(&self, prompt: &str) -> Result<String> {
        with_retries(&self.config, self.label, || self.send_message(None, prompt))
    }

    fn complete_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        with_retries(&self.config, self.label, || {
            self.send_message(Some(system), prompt)
        })
    }

    fn config(&self) -> &LlmConfig {
        &self.config
    }

    fn name(&self) -> &str {
        self.label
    }
}

fn extract_text(response: ChatResponse, label: &str) -> Result<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| SummaryError::Completion(format!("No response text from {}", label)))
}

/// Chat-completions response structure.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    #[serde(default)]
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_first_choice() {
        let raw = r#"{"choices":[{"index":0,"message":{"role":"assistant","content":"[\"Booking\"]"}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(extract_text(parsed, "groq").unwrap(), "[\"Booking\"]");
    }

    #[test]
    fn test_extract_empty_choices() {
        let parsed: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(
            extract_text(parsed, "openai"),
            Err(SummaryError::Completion(_))
        ));
    }

    #[test]
    fn test_constructors_set_endpoint() {
        let groq = OpenAICompatibleProvider::groq("key").unwrap();
        assert_eq!(groq.name(), "groq");
        assert_eq!(groq.api_url, GROQ_API_URL);

        let openai = OpenAICompatibleProvider::openai("key").unwrap();
        assert_eq!(openai.config().model, "gpt-4o");
    }
}
