//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use chauffeur::{PromptTemplate, ProviderKind};

/// Chauffeur: booking data summaries and questions over them
#[derive(Parser)]
#[command(name = "chauffeur")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Standardize a booking file's columns and write its summary report
    Summarize {
        /// Path to the booking file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output path for the summary (default: data_summary.txt next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// How to standardize column names
        #[arg(long, default_value = "llm")]
        mapper: MapperChoice,

        /// LLM provider (default: CHAUFFEUR_PROVIDER or groq)
        #[arg(long)]
        llm: Option<LlmProviderChoice>,

        /// Model to use (provider-specific, e.g., "llama-3.3-70b-versatile", "gpt-4o")
        #[arg(long)]
        model: Option<String>,
    },

    /// Show how a file's header would be standardized
    Normalize {
        /// Path to the booking file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// How to standardize column names
        #[arg(long, default_value = "llm")]
        mapper: MapperChoice,

        /// LLM provider (default: CHAUFFEUR_PROVIDER or groq)
        #[arg(long)]
        llm: Option<LlmProviderChoice>,

        /// Model to use
        #[arg(long)]
        model: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Ask questions about a written summary
    Ask {
        /// Path to a summary written by `chauffeur summarize`
        #[arg(value_name = "SUMMARY")]
        summary: PathBuf,

        /// Text file with one record per line for retrieval
        #[arg(long, value_name = "FILE")]
        rag: Option<PathBuf>,

        /// Prompt template
        #[arg(short, long, default_value = "summary")]
        template: PromptTemplate,

        /// Ask a single question instead of starting a session
        #[arg(short, long)]
        question: Option<String>,

        /// LLM provider (default: CHAUFFEUR_PROVIDER or groq)
        #[arg(long)]
        llm: Option<LlmProviderChoice>,

        /// Model to use
        #[arg(long)]
        model: Option<String>,
    },
}

/// Column standardization strategy
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MapperChoice {
    /// Ask the LLM provider
    #[default]
    Llm,
    /// Offline keyword rules
    Rules,
    /// Keep the original header
    None,
}

impl std::str::FromStr for MapperChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "llm" | "ai" => Ok(MapperChoice::Llm),
            "rules" | "rule" | "keywords" => Ok(MapperChoice::Rules),
            "none" | "off" => Ok(MapperChoice::None),
            _ => Err(format!("Unknown mapper: {}. Use: llm, rules, or none.", s)),
        }
    }
}

impl std::fmt::Display for MapperChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MapperChoice::Llm => write!(f, "llm"),
            MapperChoice::Rules => write!(f, "rules"),
            MapperChoice::None => write!(f, "none"),
        }
    }
}

/// LLM provider choice
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LlmProviderChoice {
    /// Groq chat completions (requires GROQ_API_KEY)
    Groq,
    /// OpenAI GPT API (requires OPENAI_API_KEY)
    OpenAI,
    /// Ollama local models (requires Ollama running)
    Ollama,
    /// Mock provider for testing
    Mock,
}

impl LlmProviderChoice {
    pub fn kind(self) -> ProviderKind {
        match self {
            LlmProviderChoice::Groq => ProviderKind::Groq,
            LlmProviderChoice::OpenAI => ProviderKind::OpenAI,
            LlmProviderChoice::Ollama => ProviderKind::Ollama,
            LlmProviderChoice::Mock => ProviderKind::Mock,
        }
    }
}

impl std::str::FromStr for LlmProviderChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "groq" => Ok(LlmProviderChoice::Groq),
            "openai" | "gpt" => Ok(LlmProviderChoice::OpenAI),
            "ollama" | "local" => Ok(LlmProviderChoice::Ollama),
            "mock" | "test" => Ok(LlmProviderChoice::Mock),
            _ => Err(format!(
                "Unknown provider: {}. Use: groq, openai, ollama, or mock.",
                s
            )),
        }
    }
}

impl std::fmt::Display for LlmProviderChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind())
    }
}
