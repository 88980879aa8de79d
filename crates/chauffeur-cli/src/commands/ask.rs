//! Ask command - answer questions using a written summary as context.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use chauffeur::{ContextChat, KeywordRetriever, PromptTemplate};
use colored::Colorize;

use crate::cli::LlmProviderChoice;

pub fn run(
    summary: PathBuf,
    rag: Option<PathBuf>,
    template: PromptTemplate,
    question: Option<String>,
    llm: Option<LlmProviderChoice>,
    model: Option<String>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if template == PromptTemplate::Retrieval && rag.is_none() {
        return Err("the retrieval template needs --rag <FILE>".into());
    }

    let provider = super::build_provider(llm, model)?;
    let mut chat = ContextChat::new(provider, template).with_summary_file(&summary)?;
    if let Some(path) = &rag {
        chat = chat.with_retriever(KeywordRetriever::load(path)?);
    }

    if let Some(question) = question {
        let answer = chat.answer(&question)?;
        println!("{}", answer);
        return Ok(());
    }

    println!(
        "{} {} ({} template)",
        "Chatting about".cyan().bold(),
        summary.display().to_string().white(),
        chat.template()
    );
    println!(
        "Type {} to quit, {} to print the summary.",
        "exit".bold(),
        "show context".bold()
    );

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("\n{} ", "You:".green().bold());
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let input = line?;
        let input = input.trim();

        match input.to_lowercase().as_str() {
            "" => continue,
            "exit" | "quit" => break,
            "show context" => {
                println!("\n{}", chat.summary());
                continue;
            }
            _ => {}
        }

        if verbose {
            for snippet in chat.retrieve(input)? {
                println!("  {} {}", "context:".dimmed(), snippet.dimmed());
            }
        }

        // provider hiccups do not end the session
        match chat.answer(input) {
            Ok(answer) => println!("\n{} {}", "Assistant:".cyan().bold(), answer),
            Err(e) if e.is_recoverable() => eprintln!("{} {}", "Error:".red().bold(), e),
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}
