//! Summarize command - standardize columns and write the summary report.

use std::path::PathBuf;

use chauffeur::{DEFAULT_SUMMARY_FILE, NormalizationOutcome, Summarizer};
use colored::Colorize;

use crate::cli::{LlmProviderChoice, MapperChoice};

pub fn run(
    file: PathBuf,
    output: Option<PathBuf>,
    mapper: MapperChoice,
    llm: Option<LlmProviderChoice>,
    model: Option<String>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    println!(
        "{} {}",
        "Summarizing".cyan().bold(),
        file.display().to_string().white()
    );

    let mut summarizer = Summarizer::new();
    if let Some(normalizer) = super::build_normalizer(mapper, llm, model)? {
        summarizer = summarizer.with_normalizer(normalizer);
    }

    let output_path = output.unwrap_or_else(|| file.with_file_name(DEFAULT_SUMMARY_FILE));
    let (outcome, written) = summarizer.generate_summary(&file, &output_path)?;

    println!(
        "Loaded {} bookings with {} columns",
        outcome.source.row_count.to_string().white().bold(),
        outcome.source.column_count.to_string().white().bold()
    );

    match &outcome.normalization {
        Some(n) => match &n.outcome {
            NormalizationOutcome::Applied => {
                println!("{} ({})", "Columns standardized".green(), n.mapper);
                if verbose {
                    for column in &n.columns {
                        println!("  {}", column);
                    }
                }
            }
            NormalizationOutcome::FellBack { reason } => {
                println!(
                    "{} {}",
                    "Column standardization failed - using original column names:".yellow(),
                    reason
                );
            }
        },
        None => println!("{}", "Column standardization skipped".dimmed()),
    }

    if verbose {
        println!();
        println!("{}", outcome.report.to_text());
    }

    println!();
    println!(
        "{} {}",
        "Saved to".green().bold(),
        written.display().to_string().white()
    );
    println!(
        "Run {} to ask questions about it",
        format!("chauffeur ask {}", written.display()).cyan().bold()
    );

    Ok(())
}
