//! Completion provider trait and shared request settings.

use std::time::Duration;

use crate::error::{Result, SummaryError};

/// Configuration shared by all completion providers.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Model to use (e.g., "llama-3.3-70b-versatile").
    pub model: String,

    /// Maximum tokens in response.
    pub max_tokens: usize,

    /// Temperature for generation.
    pub temperature: f64,

    /// Per-request timeout.
    pub timeout: Duration,

    /// Extra attempts after a failed completion.
    pub max_retries: u32,

    /// Base delay between attempts; grows linearly with the attempt number.
    pub retry_backoff: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "llama-3.3-70b-versatile".to_string(),
            max_tokens: 1024,
            temperature: 0.3,
            timeout: Duration::from_secs(60),
            max_retries: 2,
            retry_backoff: Duration::from_millis(500),
        }
    }
}

/// A text-completion capability: one prompt in, one text answer out.
///
/// Implementations must be thread-safe (Send + Sync) so a single configured
/// provider can be shared between the normalizer and the chat component.
pub trait CompletionProvider: Send + Sync {
    /// Send a prompt and return the full text of the answer.
    fn complete(&self, prompt: &str) -> Result<String>;

    /// Send a prompt under a system message.
    ///
    /// Providers without a separate system role prepend it to the prompt.
    fn complete_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        self.complete(&format!("{}\n\n{}", system, prompt))
    }

    /// Get the configuration for this provider.
    fn config(&self) -> &LlmConfig;

    /// Get the name of this provider (for logging/debugging).
    fn name(&self) -> &str;
}

/// Call `attempt` until it succeeds or `config.max_retries` extra attempts
/// are used up. Returns the last error on exhaustion. Only transient
/// failures are retried.
pub fn with_retries<T>(
    config: &LlmConfig,
    provider_name: &str,
    mut attempt: impl FnMut() -> Result<T>,
) -> Result<T> {
    let total = config.max_retries.saturating_add(1);
    let mut last_error = None;

    for n in 1..=total {
        match attempt() {
            Ok(value) => return Ok(value),
            Err(e) => {
                tracing::debug!(
                    provider = provider_name,
                    attempt = n,
                    of = total,
                    error = %e,
                    "completion attempt failed"
                );
                if !e.is_transient() {
                    return Err(e);
                }
                last_error = Some(e);
                if n < total && !config.retry_backoff.is_zero() {
                    let base = config.retry_backoff * n;
                    let jitter = Duration::from_millis(fastrand::u64(0..=50));
                    std::thread::sleep(base + jitter);
                }
            }
        }
    }

    Err(last_error.unwrap_or_else(|| SummaryError::Completion("no attempts made".to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn no_backoff(retries: u32) -> LlmConfig {
        LlmConfig {
            max_retries: retries,
            retry_backoff: Duration::ZERO,
            ..Default::default()
        }
    }

    #[test]
    fn test_retry_succeeds_after_failures() {
        let calls = Cell::new(0);
        let result = with_retries(&no_backoff(2), "test", || {
            calls.set(calls.get() + 1);
            if calls.get() < 3 {
                Err(SummaryError::Completion("busy".into()))
            } else {
                Ok("done")
            }
        });
        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn test_retry_exhaustion_returns_last_error() {
        let calls = Cell::new(0);
        let result: Result<()> = with_retries(&no_backoff(1), "test", || {
            calls.set(calls.get() + 1);
            Err(SummaryError::Completion(format!("fail {}", calls.get())))
        });
        assert_eq!(calls.get(), 2);
        match result {
            Err(SummaryError::Completion(msg)) => assert_eq!(msg, "fail 2"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_rejected_request_is_not_retried() {
        let calls = Cell::new(0);
        let result: Result<()> = with_retries(&no_backoff(3), "test", || {
            calls.set(calls.get() + 1);
            Err(SummaryError::from_status(401, "invalid api key".into()))
        });
        assert_eq!(calls.get(), 1);
        assert!(matches!(result, Err(SummaryError::Rejected { status: 401, .. })));
    }

    #[test]
    fn test_rate_limit_is_retried() {
        let calls = Cell::new(0);
        let result = with_retries(&no_backoff(2), "test", || {
            calls.set(calls.get() + 1);
            if calls.get() == 1 {
                Err(SummaryError::from_status(429, "rate limited".into()))
            } else {
                Ok(calls.get())
            }
        });
        assert_eq!(result.unwrap(), 2);
    }
}
