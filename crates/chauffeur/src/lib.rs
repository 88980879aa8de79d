//! Chauffeur: booking-data summaries with LLM-assisted column standardization.
//!
//! Booking exports from different dispatch systems name their columns in
//! different ways. This crate maps each header onto a small canonical
//! vocabulary (`Booking`, `PAX`, `Chauffer`, `Pickup`, `Dropoff`, `Price`,
//! `Date`, `Notes`), computes a plain-text summary report, and answers
//! questions about that report through a chat completion provider.
//!
//! # Example
//!
//! ```no_run
//! use chauffeur::{AppConfig, LlmColumnMapper, Normalizer, Summarizer};
//!
//! let config = AppConfig::from_env().unwrap();
//! let provider = config.build_provider().unwrap();
//!
//! let summarizer = Summarizer::new()
//!     .with_normalizer(Normalizer::new(LlmColumnMapper::new(provider)));
//! let (outcome, path) = summarizer
//!     .generate_summary("bookings.csv", "data_summary.txt")
//!     .unwrap();
//!
//! println!("{} lines written to {}", outcome.report.len(), path.display());
//! ```

pub mod chat;
pub mod config;
pub mod error;
pub mod input;
pub mod llm;
pub mod normalize;
pub mod report;
pub mod schema;

mod summarizer;

pub use crate::summarizer::{DEFAULT_SUMMARY_FILE, SummaryOutcome, Summarizer};
pub use chat::{ContextChat, KeywordRetriever, PromptTemplate, Retriever};
pub use config::{AppConfig, ConfigError, ProviderKind};
pub use error::{Result, SummaryError};
pub use input::{Cell, DataTable, Parser, ParserConfig, SourceMetadata};
pub use llm::{
    CompletionProvider, LlmConfig, MockProvider, OllamaProvider, OpenAICompatibleProvider,
};
pub use normalize::{
    ColumnMapper, LlmColumnMapper, Normalization, NormalizationOutcome, Normalizer,
    RuleBasedMapper,
};
pub use report::{ReportBuilder, StepError, SummaryReport};
pub use schema::CanonicalColumn;
