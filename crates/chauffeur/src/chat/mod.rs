//! Question answering over a generated summary.
//!
//! [`ContextChat`] builds one prompt per question from a [`PromptTemplate`],
//! the summary text and (optionally) lines pulled from a [`Retriever`], then
//! sends it to a [`CompletionProvider`]. Questions are independent: nothing
//! from earlier turns is carried into later prompts.

mod retriever;
mod template;

pub use retriever::{Document, KeywordRetriever, Retriever};
pub use template::{PromptTemplate, SYSTEM_PROMPT};

use std::path::Path;
use std::sync::Arc;

use crate::error::{Result, SummaryError};
use crate::llm::CompletionProvider;

/// Number of retrieved snippets per question.
pub const DEFAULT_TOP_K: usize = 5;

/// Answers questions using a summary and/or retrieved records as context.
pub struct ContextChat {
    provider: Arc<dyn CompletionProvider>,
    template: PromptTemplate,
    summary: String,
    retriever: Option<Box<dyn Retriever>>,
    top_k: usize,
}

impl ContextChat {
    pub fn new(provider: Arc<dyn CompletionProvider>, template: PromptTemplate) -> Self {
        Self {
            provider,
            template,
            summary: String::new(),
            retriever: None,
            top_k: DEFAULT_TOP_K,
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    /// Load the summary text from a file written by the summarizer.
    pub fn with_summary_file(self, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| SummaryError::SourceUnavailable {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(self.with_summary(text))
    }

    pub fn with_retriever(mut self, retriever: impl Retriever + 'static) -> Self {
        self.retriever = Some(Box::new(retriever));
        self
    }

    pub fn with_top_k(mut self, k: usize) -> Self {
        self.top_k = k;
        self
    }

    pub fn template(&self) -> PromptTemplate {
        self.template
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Context lines that would accompany `question`.
    pub fn retrieve(&self, question: &str) -> Result<Vec<String>> {
        match (&self.retriever, self.template.needs_retrieval()) {
            (Some(retriever), true) => retriever.retrieve(question, self.top_k),
            _ => Ok(Vec::new()),
        }
    }

    /// The full prompt sent for `question`.
    pub fn prompt_for(&self, question: &str) -> Result<String> {
        let retrieved = self.retrieve(question)?;
        let summary = if self.template.needs_summary() {
            self.summary.as_str()
        } else {
            ""
        };
        Ok(self.template.render(summary, &retrieved, question))
    }

    /// Answer one question. Provider failures are returned to the caller.
    pub fn answer(&self, question: &str) -> Result<String> {
        let question = question.trim();
        if question.is_empty() {
            return Err(SummaryError::EmptyData("question is empty".to_string()));
        }

        let prompt = self.prompt_for(question)?;
        tracing::debug!(template = %self.template, prompt_len = prompt.len(), "asking provider");

        let answer = self.provider.complete_with_system(SYSTEM_PROMPT, &prompt)?;
        Ok(answer.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockProvider;

    const SUMMARY: &str = "Data Analysis Summary\nTotal Company Earnings: $350.00";
    const RECORDS: &str = "Ride 1: Heathrow to Savoy, child seat requested\n\
                           Ride 2: Savoy to Gatwick\n\
                           Ride 3: Paddington to Heathrow, waiting time 30 minutes\n";

    #[test]
    fn test_summary_only_prompt() {
        let mock = Arc::new(MockProvider::answering("$350.00"));
        let chat = ContextChat::new(mock.clone(), PromptTemplate::SummaryOnly)
            .with_summary(SUMMARY)
            .with_retriever(KeywordRetriever::from_text(RECORDS));

        let answer = chat.answer("What were the total earnings?").unwrap();
        assert_eq!(answer, "$350.00");

        let prompts = mock.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Total Company Earnings: $350.00"));
        // retriever ignored for the summary-only template
        assert!(!prompts[0].contains("Ride 1"));
        assert!(prompts[0].contains(SYSTEM_PROMPT));
    }

    #[test]
    fn test_hybrid_prompt_includes_retrieved_lines() {
        let mock = Arc::new(MockProvider::answering("Ride 1."));
        let chat = ContextChat::new(mock.clone(), PromptTemplate::Hybrid)
            .with_summary(SUMMARY)
            .with_retriever(KeywordRetriever::from_text(RECORDS))
            .with_top_k(1);

        chat.answer("Which ride needed a child seat?").unwrap();
        let prompt = &mock.prompts()[0];
        assert!(prompt.contains("Total Company Earnings"));
        assert!(prompt.contains("Ride 1: Heathrow to Savoy, child seat requested"));
        assert!(!prompt.contains("Ride 2"));
    }

    #[test]
    fn test_no_memory_between_questions() {
        let mock = Arc::new(
            MockProvider::new()
                .then_reply("first answer")
                .then_reply("second answer"),
        );
        let chat =
            ContextChat::new(mock.clone(), PromptTemplate::SummaryOnly).with_summary(SUMMARY);

        chat.answer("first question").unwrap();
        chat.answer("second question").unwrap();

        let prompts = mock.prompts();
        assert!(!prompts[1].contains("first question"));
        assert!(!prompts[1].contains("first answer"));
    }

    #[test]
    fn test_provider_error_propagates() {
        let mock = Arc::new(MockProvider::new().then_fail("rate limited"));
        let chat = ContextChat::new(mock, PromptTemplate::SummaryOnly).with_summary(SUMMARY);
        assert!(matches!(
            chat.answer("anything"),
            Err(SummaryError::Completion(_))
        ));
    }

    #[test]
    fn test_empty_question_rejected() {
        let mock = Arc::new(MockProvider::new());
        let chat = ContextChat::new(mock.clone(), PromptTemplate::SummaryOnly);
        assert!(chat.answer("   ").is_err());
        assert_eq!(mock.call_count(), 0);
    }
}
