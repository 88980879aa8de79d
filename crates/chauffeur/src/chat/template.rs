//! Prompt templates for the context chat.

use std::fmt;
use std::str::FromStr;

/// How context is laid out around the user's question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PromptTemplate {
    /// Only the generated data summary.
    #[default]
    SummaryOnly,
    /// Only lines retrieved for the question.
    Retrieval,
    /// The summary plus retrieved lines.
    Hybrid,
}

/// System message shared by all templates.
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant for a chauffeur service. \
You answer questions about bookings, chauffeurs, prices and rides using the context you are given.";

impl PromptTemplate {
    pub fn needs_summary(&self) -> bool {
        matches!(self, PromptTemplate::SummaryOnly | PromptTemplate::Hybrid)
    }

    pub fn needs_retrieval(&self) -> bool {
        matches!(self, PromptTemplate::Retrieval | PromptTemplate::Hybrid)
    }

    /// Render the user prompt.
    pub fn render(&self, summary: &str, retrieved: &[String], question: &str) -> String {
        let retrieved = if retrieved.is_empty() {
            "No related records were found.".to_string()
        } else {
            retrieved.join("\n")
        };

        match self {
            PromptTemplate::SummaryOnly => format!(
                "Context Information:\n{summary}\n\n\
                 Question: {question}\n\n\
                 Using the context provided above, please give a helpful and informative response.\n\
                 If the question cannot be answered using the context, please say so and provide\n\
                 a general response based on your knowledge.\n\n\
                 Answer:"
            ),
            PromptTemplate::Retrieval => format!(
                "Context: {retrieved}\n\n\
                 Question: {question}\n\n\
                 Based on the above context, provide a comprehensive and helpful answer.\n\
                 Only use context that is necessary and ignore the rest.\n\
                 If you cannot provide a good answer just say so.\n\
                 Answer:"
            ),
            PromptTemplate::Hybrid => format!(
                "Data Summary:\n{summary}\n\n\
                 Related Records:\n{retrieved}\n\n\
                 Question: {question}\n\n\
                 Use the data summary for totals, rankings and distributions, and the related\n\
                 records for details about individual rides. Only use context that is necessary.\n\
                 If the question cannot be answered from the context, say so.\n\n\
                 Answer:"
            ),
        }
    }
}

impl FromStr for PromptTemplate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "summary" => Ok(PromptTemplate::SummaryOnly),
            "retrieval" | "rag" => Ok(PromptTemplate::Retrieval),
            "hybrid" => Ok(PromptTemplate::Hybrid),
            _ => Err(format!(
                "Unknown template: {}. Use: summary, retrieval, or hybrid.",
                s
            )),
        }
    }
}

impl fmt::Display for PromptTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromptTemplate::SummaryOnly => write!(f, "summary"),
            PromptTemplate::Retrieval => write!(f, "retrieval"),
            PromptTemplate::Hybrid => write!(f, "hybrid"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_template() {
        let prompt =
            PromptTemplate::SummaryOnly.render("Total Company Earnings: $350.00", &[], "Total?");
        assert!(prompt.starts_with("Context Information:\nTotal Company Earnings: $350.00"));
        assert!(prompt.contains("Question: Total?"));
        assert!(prompt.ends_with("Answer:"));
    }

    #[test]
    fn test_retrieval_template_ignores_summary() {
        let prompt = PromptTemplate::Retrieval.render(
            "SUMMARY",
            &["Ride 12: Heathrow to Savoy".to_string()],
            "Where did ride 12 go?",
        );
        assert!(!prompt.contains("SUMMARY"));
        assert!(prompt.contains("Context: Ride 12: Heathrow to Savoy"));
    }

    #[test]
    fn test_hybrid_template_without_hits() {
        let prompt = PromptTemplate::Hybrid.render("SUMMARY", &[], "q");
        assert!(prompt.contains("SUMMARY"));
        assert!(prompt.contains("No related records were found."));
    }

    #[test]
    fn test_parse() {
        assert_eq!("RAG".parse::<PromptTemplate>().unwrap(), PromptTemplate::Retrieval);
        assert!("memory".parse::<PromptTemplate>().is_err());
    }
}
