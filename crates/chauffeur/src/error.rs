//! Error types for the chauffeur library.

use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;

/// Main error type for summarization and chat operations.
#[derive(Debug, Error)]
pub enum SummaryError {
    /// The input table cannot be located or read.
    #[error("Source unavailable '{path}': {source}")]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error writing an output artifact.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// No header or no columns to work with.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Completion text was not a bracketed list of labels.
    #[error("Failed to parse completion response: {0}")]
    ResponseParse(String),

    /// Parsed label list does not line up with the header.
    #[error("Label count mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// The standardized header would name two columns the same.
    #[error("Duplicate column name after standardization: {0}")]
    DuplicateLabel(String),

    /// The completion provider failed in a way worth retrying.
    #[error("Completion failed: {0}")]
    Completion(String),

    /// The completion service refused the request; retrying will not help.
    #[error("Completion rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The table header was rewritten more than once or with the wrong width.
    #[error("Header rewrite rejected: {0}")]
    HeaderRewrite(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl SummaryError {
    /// Returns true for failures the normalizer recovers from by keeping the
    /// original header.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SummaryError::ResponseParse(_)
                | SummaryError::LengthMismatch { .. }
                | SummaryError::DuplicateLabel(_)
                | SummaryError::Completion(_)
                | SummaryError::Rejected { .. }
        )
    }

    /// Returns true when the same completion request may succeed if sent
    /// again.
    pub fn is_transient(&self) -> bool {
        matches!(self, SummaryError::Completion(_))
    }

    /// Classify an unsuccessful HTTP status from a completion service.
    /// Rate limiting and server errors are transient.
    pub fn from_status(status: u16, message: String) -> Self {
        if status == 429 || (500..600).contains(&status) {
            SummaryError::Completion(format!("HTTP {}: {}", status, message))
        } else {
            SummaryError::Rejected { status, message }
        }
    }
}

/// Result type alias for chauffeur operations.
pub type Result<T> = std::result::Result<T, SummaryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_failures() {
        assert!(SummaryError::ResponseParse("prose".into()).is_recoverable());
        assert!(SummaryError::LengthMismatch { expected: 4, actual: 2 }.is_recoverable());
        assert!(SummaryError::Completion("timeout".into()).is_recoverable());
        assert!(SummaryError::DuplicateLabel("Price".into()).is_recoverable());
        assert!(!SummaryError::EmptyData("no header".into()).is_recoverable());
    }

    #[test]
    fn test_status_classification() {
        assert!(SummaryError::from_status(429, "slow down".into()).is_transient());
        assert!(SummaryError::from_status(503, "unavailable".into()).is_transient());
        let unauthorized = SummaryError::from_status(401, "bad key".into());
        assert!(!unauthorized.is_transient());
        assert!(unauthorized.is_recoverable());
        assert_eq!(unauthorized.to_string(), "Completion rejected (401): bad key");
        assert!(!SummaryError::from_status(400, "bad request".into()).is_transient());
    }
}
