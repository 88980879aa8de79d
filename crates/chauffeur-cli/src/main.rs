//! Chauffeur CLI - booking summaries and questions over them.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Summarize {
            file,
            output,
            mapper,
            llm,
            model,
        } => commands::summarize::run(file, output, mapper, llm, model, cli.verbose),

        Commands::Normalize {
            file,
            mapper,
            llm,
            model,
            json,
        } => commands::normalize::run(file, mapper, llm, model, json),

        Commands::Ask {
            summary,
            rag,
            template,
            question,
            llm,
            model,
        } => commands::ask::run(summary, rag, template, question, llm, model, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
