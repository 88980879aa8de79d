//! Completion providers.
//!
//! Everything in the crate that needs a language model goes through the
//! [`CompletionProvider`] trait: the LLM column mapper and the context chat.
//!
//! # Supported Providers
//!
//! - **Groq** - OpenAI-compatible API (requires `GROQ_API_KEY`)
//! - **OpenAI** - GPT models via API (requires `OPENAI_API_KEY`)
//! - **Ollama** - Local models, no API key needed (requires Ollama running)
//! - **Mock** - Scripted answers for tests and offline runs
//!
//! # Example
//!
//! ```no_run
//! use chauffeur::{CompletionProvider, OpenAICompatibleProvider};
//!
//! let provider = OpenAICompatibleProvider::groq("gsk_...").unwrap();
//! let answer = provider.complete("Say hello").unwrap();
//! ```

mod mock;
mod ollama;
mod openai;
pub mod prompts;
mod provider;

pub use mock::MockProvider;
pub use ollama::{DEFAULT_OLLAMA_HOST, OllamaProvider};
pub use openai::{GROQ_API_URL, OPENAI_API_URL, OpenAICompatibleProvider};
pub use provider::{CompletionProvider, LlmConfig, with_retries};
