//! Retrieval of supporting context lines.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::{Result, SummaryError};

/// A source of context snippets for a question.
///
/// This is the seam where a hosted vector index plugs in.
pub trait Retriever: Send + Sync {
    /// Up to `k` snippets relevant to `query`, best first.
    fn retrieve(&self, query: &str, k: usize) -> Result<Vec<String>>;
}

/// One retrievable line.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub text: String,
}

/// Keyword-overlap retriever over the lines of a text file.
///
/// Every non-empty line becomes a document with id `vec{n}` (1-based line
/// number).
#[derive(Debug, Clone, Default)]
pub struct KeywordRetriever {
    documents: Vec<Document>,
}

impl KeywordRetriever {
    pub fn from_text(text: &str) -> Self {
        let documents = text
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(i, line)| Document {
                id: format!("vec{}", i + 1),
                text: line.trim().to_string(),
            })
            .collect();
        Self { documents }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| SummaryError::SourceUnavailable {
            path: path.to_path_buf(),
            source: e,
        })?;
        let retriever = Self::from_text(&text);
        tracing::info!(
            path = %path.display(),
            documents = retriever.documents.len(),
            "retrieval corpus loaded"
        );
        Ok(retriever)
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }
}

impl Retriever for KeywordRetriever {
    fn retrieve(&self, query: &str, k: usize) -> Result<Vec<String>> {
        let terms = terms(query);
        if terms.is_empty() {
            return Ok(Vec::new());
        }

        let mut scored: Vec<(usize, &Document)> = self
            .documents
            .iter()
            .map(|doc| (terms.intersection(&self::terms(&doc.text)).count(), doc))
            .filter(|(score, _)| *score > 0)
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));

        Ok(scored
            .into_iter()
            .take(k)
            .map(|(_, doc)| doc.text.clone())
            .collect())
    }
}

/// Lowercase word terms of three or more characters.
fn terms(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.chars().count() >= 3)
        .map(|w| w.to_lowercase())
        .collect()
}
