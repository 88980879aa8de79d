//! Mock completion provider for testing.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::error::{Result, SummaryError};

use super::provider::{CompletionProvider, LlmConfig};

/// One scripted reply.
#[derive(Debug, Clone)]
enum Scripted {
    Text(String),
    Fail(String),
}

/// Mock provider that replays scripted answers and records every prompt.
///
/// When the script runs out, the fallback answer is returned (an empty list
/// by default, which the normalizer treats as unusable).
pub struct MockProvider {
    config: LlmConfig,
    script: Mutex<VecDeque<Scripted>>,
    fallback: String,
    prompts: Mutex<Vec<String>>,
}

impl MockProvider {
    /// Create a new mock provider.
    pub fn new() -> Self {
        Self::with_config(LlmConfig::default())
    }

    /// Create with custom configuration.
    pub fn with_config(config: LlmConfig) -> Self {
        Self {
            config,
            script: Mutex::new(VecDeque::new()),
            fallback: "[]".to_string(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Mock that always answers with `text`.
    pub fn answering(text: impl Into<String>) -> Self {
        let mut mock = Self::new();
        mock.fallback = text.into();
        mock
    }

    /// Queue a successful answer.
    pub fn then_reply(self, text: impl Into<String>) -> Self {
        self.push(Scripted::Text(text.into()));
        self
    }

    /// Queue a failed call.
    pub fn then_fail(self, message: impl Into<String>) -> Self {
        self.push(Scripted::Fail(message.into()));
        self
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }

    /// Number of calls received so far.
    pub fn call_count(&self) -> usize {
        self.prompts.lock().map(|p| p.len()).unwrap_or(0)
    }

    fn push(&self, item: Scripted) {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(item);
        }
    }

    fn next_reply(&self, prompt: String) -> Result<String> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt);
        }
        let next = self.script.lock().ok().and_then(|mut s| s.pop_front());
        match next {
            Some(Scripted::Text(text)) => Ok(text),
            Some(Scripted::Fail(message)) => Err(SummaryError::Completion(message)),
            None => Ok(self.fallback.clone()),
        }
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl CompletionProvider for MockProvider {
    fn complete(&self, prompt: &str) -> Result<String> {
        self.next_reply(prompt.to_string())
    }

    fn complete_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        self.next_reply(format!("[system]\n{}\n[user]\n{}", system, prompt))
    }

    fn config(&self) -> &LlmConfig {
        &self.config
    }

    fn name(&self) -> &str {
        "mock"
    }
}
