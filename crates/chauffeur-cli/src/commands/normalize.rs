//! Normalize command - preview the standardized header.

use std::path::PathBuf;

use chauffeur::{NormalizationOutcome, Parser};
use colored::Colorize;

use crate::cli::{LlmProviderChoice, MapperChoice};

pub fn run(
    file: PathBuf,
    mapper: MapperChoice,
    llm: Option<LlmProviderChoice>,
    model: Option<String>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let (table, _source) = Parser::new().parse_file(&file)?;
    let original = table.headers().to_vec();

    let Some(normalizer) = super::build_normalizer(mapper, llm, model)? else {
        return Err("nothing to preview with --mapper none".into());
    };
    let normalization = normalizer.normalize(&original);
    let normalized = normalization.header();

    if json {
        let value = serde_json::json!({
            "file": file.display().to_string(),
            "original": original,
            "normalized": normalized,
            "normalization": normalization,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!(
        "{} {} ({})",
        "Header of".cyan().bold(),
        file.display().to_string().white(),
        normalization.mapper
    );
    println!();

    let width = original.iter().map(|h| h.len()).max().unwrap_or(0).max(8);
    for (before, column) in original.iter().zip(&normalization.columns) {
        let after = if column.is_canonical() {
            column.label().green().bold()
        } else {
            column.label().dimmed()
        };
        println!("  {:width$}  ->  {}", before, after, width = width);
    }

    println!();
    match &normalization.outcome {
        NormalizationOutcome::Applied => println!("{}", "Standardization applied".green()),
        NormalizationOutcome::FellBack { reason } => println!(
            "{} {}",
            "Standardization failed, original names kept:".yellow(),
            reason
        ),
    }

    Ok(())
}
