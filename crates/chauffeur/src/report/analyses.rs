//! The individual analyses that make up a summary report.
//!
//! Each analysis reads the table and returns the lines it contributes, or a
//! [`StepError`] that the builder renders as a single explanatory line.

use std::cmp::Ordering;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::input::{Cell, DataTable};

use super::format::{currency, percent, share};

/// Number of distinct values listed per categorical column.
pub const TOP_CATEGORIES: usize = 6;

/// Width of the separator printed after each ride in the notes section.
pub const RIDE_SEPARATOR_WIDTH: usize = 50;

/// Why an analysis could not produce its normal output.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StepError {
    #[error("Error: {} not found in the dataset.", describe_missing(.0))]
    MissingColumns(Vec<&'static str>),

    #[error("{section}: No rows available for this analysis.")]
    NoRows { section: &'static str },

    #[error("Error: {column} column contains no numeric values.")]
    NoNumericValues { column: &'static str },

    #[error("Error: {column} column contains no values.")]
    NoValues { column: &'static str },
}

fn describe_missing(columns: &[&'static str]) -> String {
    match columns {
        [single] => format!("{} column", single),
        many => format!("Required columns ({})", many.join(" or ")),
    }
}

/// One step of the report.
pub trait Analysis: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    fn analyze(&self, table: &DataTable) -> Result<Vec<String>, StepError>;
}

fn require_columns(
    table: &DataTable,
    columns: &[&'static str],
) -> Result<Vec<usize>, StepError> {
    let missing: Vec<&'static str> = columns
        .iter()
        .copied()
        .filter(|c| table.column_index(c).is_none())
        .collect();
    if !missing.is_empty() {
        // Report every required column, as the message names the pair.
        return Err(StepError::MissingColumns(columns.to_vec()));
    }
    Ok(columns
        .iter()
        .filter_map(|c| table.column_index(c))
        .collect())
}

fn require_rows(table: &DataTable, section: &'static str) -> Result<(), StepError> {
    if table.row_count() == 0 {
        Err(StepError::NoRows { section })
    } else {
        Ok(())
    }
}

/// Plain digits, or digits grouped in threes by commas, with optional decimals.
static AMOUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:\d{1,3}(?:,\d{3})+|\d+)(?:\.\d+)?$").unwrap());

/// Read a cell as a money amount.
///
/// Numbers pass through. Text is accepted after trimming, taking an optional
/// leading minus, dropping a currency symbol and removing thousands
/// separators (`"$1,250.00"`, `"-$50.00"`). A comma anywhere else
/// (`"45,50"`) makes the cell non-numeric.
pub fn coerce_amount(cell: &Cell) -> Option<f64> {
    match cell {
        Cell::Number(n) => Some(*n),
        Cell::Text(s) => {
            let trimmed = s.trim();
            let (negative, rest) = match trimmed.strip_prefix('-') {
                Some(rest) => (true, rest.trim_start()),
                None => (false, trimmed),
            };
            let digits = rest.strip_prefix(['$', '£', '€']).unwrap_or(rest).trim_start();
            if !AMOUNT.is_match(digits) {
                return None;
            }
            let cleaned: String = digits.chars().filter(|c| *c != ',').collect();
            let amount = cleaned.parse::<f64>().ok().filter(|n| n.is_finite())?;
            Some(if negative { -amount } else { amount })
        }
        Cell::Missing => None,
    }
}

// =============================================================================
// MISSING VALUES
// =============================================================================

/// Count of missing cells per column.
pub struct MissingValues;

impl Analysis for MissingValues {
    fn name(&self) -> &'static str {
        "missing_values"
    }

    fn analyze(&self, table: &DataTable) -> Result<Vec<String>, StepError> {
        require_rows(table, "Missing Values Analysis")?;
        let rows = table.row_count() as f64;

        let mut lines = Vec::new();
        for (index, name) in table.headers().iter().enumerate() {
            let missing = table.column_cells(index).filter(|c| c.is_missing()).count();
            if missing == 0 {
                continue;
            }
            if lines.is_empty() {
                lines.push(String::new());
                lines.push("Missing Values Analysis:".to_string());
            }
            let pct = share(missing as f64, rows).unwrap_or(0.0);
            lines.push(format!("{}: {} missing values ({})", name, missing, percent(pct)));
        }
        Ok(lines)
    }
}

// =============================================================================
// PRICE STATISTICS
// =============================================================================

/// Distribution of the `Price` column.
pub struct PriceStatistics;

/// Summary numbers for the price column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSummary {
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    /// Sample standard deviation; `None` with fewer than two prices.
    pub std_dev: Option<f64>,
    pub median: f64,
    /// Rows strictly above the mean, as a share of all rows.
    pub above_mean_pct: f64,
    /// Text cells that could not be read as amounts.
    pub non_numeric: usize,
}

impl PriceStatistics {
    /// Compute the price summary without rendering it.
    pub fn summarize(table: &DataTable) -> Result<PriceSummary, StepError> {
        let index = require_columns(table, &["Price"])?[0];
        require_rows(table, "Price Analysis")?;

        let mut values = Vec::new();
        let mut non_numeric = 0;
        for cell in table.column_cells(index) {
            match coerce_amount(cell) {
                Some(v) => values.push(v),
                None if !cell.is_missing() => non_numeric += 1,
                None => {}
            }
        }

        if values.is_empty() {
            return Err(StepError::NoNumericValues { column: "Price" });
        }

        let count = values.len();
        let mean = values.iter().sum::<f64>() / count as f64;
        let std_dev = (count >= 2).then(|| {
            let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
            (ss / (count - 1) as f64).sqrt()
        });

        let mut sorted = values.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        let median = if count % 2 == 1 {
            sorted[count / 2]
        } else {
            (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
        };

        let above = values.iter().filter(|v| **v > mean).count();
        let above_mean_pct = share(above as f64, table.row_count() as f64).unwrap_or(0.0);

        Ok(PriceSummary {
            count,
            mean,
            min: sorted[0],
            max: sorted[count - 1],
            std_dev,
            median,
            above_mean_pct,
            non_numeric,
        })
    }
}

impl Analysis for PriceStatistics {
    fn name(&self) -> &'static str {
        "price_statistics"
    }

    fn analyze(&self, table: &DataTable) -> Result<Vec<String>, StepError> {
        let summary = Self::summarize(table)?;

        let mut lines = vec![
            String::new(),
            "Price Analysis:".to_string(),
            format!("Average Price: {}", currency(summary.mean)),
            format!("Minimum Price: {}", currency(summary.min)),
            format!("Maximum Price: {}", currency(summary.max)),
            format!(
                "Standard Deviation: {}",
                summary.std_dev.map(currency).unwrap_or_else(|| "n/a".to_string())
            ),
            format!("Median Price: {}", currency(summary.median)),
        ];
        if summary.non_numeric > 0 {
            lines.push(format!(
                "{} non-numeric price values were ignored.",
                summary.non_numeric
            ));
        }
        lines.push(String::new());
        lines.push("Price Distribution:".to_string());
        lines.push(format!(
            "{} of items are above the average price",
            percent(summary.above_mean_pct)
        ));
        Ok(lines)
    }
}

// =============================================================================
// CHAUFFER EARNINGS
// =============================================================================

/// Earnings per distinct chauffeur.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChaufferStats {
    pub name: String,
    /// Rows with a usable price.
    pub bookings: usize,
    /// `None` when the chauffeur has no priced rows.
    pub mean: Option<f64>,
    pub total: f64,
}

/// Per-chauffeur earnings ranked by total.
pub struct ChaufferEarnings;

impl ChaufferEarnings {
    /// Group prices by chauffeur, sorted by total descending. Ties keep the
    /// order in which chauffeurs first appear.
    pub fn stats(table: &DataTable) -> Result<Vec<ChaufferStats>, StepError> {
        let indices = require_columns(table, &["Chauffer", "Price"])?;
        let (chauffer_idx, price_idx) = (indices[0], indices[1]);
        require_rows(table, "Chauffer Earnings Analysis")?;

        let mut groups: IndexMap<String, (usize, f64)> = IndexMap::new();
        for row in table.rows() {
            let chauffer = &row[chauffer_idx];
            if chauffer.is_missing() {
                continue;
            }
            let entry = groups.entry(chauffer.to_string()).or_insert((0, 0.0));
            if let Some(price) = coerce_amount(&row[price_idx]) {
                entry.0 += 1;
                entry.1 += price;
            }
        }

        if groups.is_empty() {
            return Err(StepError::NoValues { column: "Chauffer" });
        }

        let mut stats: Vec<ChaufferStats> = groups
            .into_iter()
            .map(|(name, (bookings, total))| ChaufferStats {
                name,
                bookings,
                mean: (bookings > 0).then(|| total / bookings as f64),
                total,
            })
            .collect();
        stats.sort_by(|a, b| b.total.partial_cmp(&a.total).unwrap_or(Ordering::Equal));
        Ok(stats)
    }
}

impl Analysis for ChaufferEarnings {
    fn name(&self) -> &'static str {
        "chauffer_earnings"
    }

    fn analyze(&self, table: &DataTable) -> Result<Vec<String>, StepError> {
        let stats = Self::stats(table)?;

        let company_total: f64 = stats.iter().map(|s| s.total).sum();
        let average_per_chauffer = company_total / stats.len() as f64;

        let mut lines = vec![
            String::new(),
            "Chauffer Earnings Analysis:".to_string(),
            String::new(),
            "Company-wide Statistics:".to_string(),
            format!("Total Company Earnings: {}", currency(company_total)),
            format!(
                "Average Earnings per Chauffer: {}",
                currency(average_per_chauffer)
            ),
            String::new(),
            "Individual Chauffer Performance:".to_string(),
        ];

        for s in &stats {
            lines.push(String::new());
            lines.push(format!("Chauffer: {}", s.name));
            lines.push(format!("Total Bookings: {}", s.bookings));
            lines.push(format!(
                "Average Earning per Booking: {}",
                s.mean.map(currency).unwrap_or_else(|| "n/a".to_string())
            ));
            lines.push(format!("Total Earnings: {}", currency(s.total)));
        }

        let top = &stats[0];
        lines.push(String::new());
        lines.push("Performance Insights:".to_string());
        lines.push(format!(
            "Top earning chauffer: {} ({})",
            top.name,
            currency(top.total)
        ));

        let top_three: f64 = stats.iter().take(3).map(|s| s.total).sum();
        match share(top_three, company_total) {
            Some(pct) => lines.push(format!(
                "Top 3 chauffers account for {} of total earnings",
                percent(pct)
            )),
            None => lines.push(
                "Top 3 share unavailable: total company earnings are $0.00".to_string(),
            ),
        }

        Ok(lines)
    }
}

// =============================================================================
// CATEGORICAL DISTRIBUTIONS
// =============================================================================

/// Value counts for every text column.
pub struct CategoricalDistributions;

impl CategoricalDistributions {
    /// Distinct values of a column with their counts, most frequent first.
    /// Ties keep first-appearance order.
    pub fn value_counts(table: &DataTable, index: usize) -> Vec<(String, usize)> {
        let mut counts: IndexMap<String, usize> = IndexMap::new();
        for cell in table.column_cells(index).filter(|c| !c.is_missing()) {
            *counts.entry(cell.to_string()).or_insert(0) += 1;
        }
        let mut counts: Vec<(String, usize)> = counts.into_iter().collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts
    }
}

impl Analysis for CategoricalDistributions {
    fn name(&self) -> &'static str {
        "categorical_distributions"
    }

    fn analyze(&self, table: &DataTable) -> Result<Vec<String>, StepError> {
        require_rows(table, "Categorical Distributions")?;
        let rows = table.row_count() as f64;

        let mut lines = Vec::new();
        for (index, name) in table.headers().iter().enumerate() {
            if !table.is_text_column(index) {
                continue;
            }
            let counts = Self::value_counts(table, index);

            lines.push(String::new());
            lines.push(format!("Distribution for {}:", name));
            for (value, count) in counts.iter().take(TOP_CATEGORIES) {
                let pct = share(*count as f64, rows).unwrap_or(0.0);
                lines.push(format!("{}: {} ({})", value, count, percent(pct)));
            }
            if counts.len() > TOP_CATEGORIES {
                lines.push(format!(
                    "... and {} more unique values",
                    counts.len() - TOP_CATEGORIES
                ));
            }
        }
        Ok(lines)
    }
}

// =============================================================================
// NOTES DETAIL
// =============================================================================

/// Full detail for every ride that carries a note.
pub struct NotesDetail;

impl Analysis for NotesDetail {
    fn name(&self) -> &'static str {
        "notes_detail"
    }

    fn analyze(&self, table: &DataTable) -> Result<Vec<String>, StepError> {
        let notes_idx = require_columns(table, &["Notes"])?[0];
        require_rows(table, "Detailed Notes Analysis")?;

        let noted: Vec<(usize, &Vec<Cell>)> = table
            .rows()
            .iter()
            .enumerate()
            .filter(|(_, row)| has_note(&row[notes_idx]))
            .collect();

        let pct = share(noted.len() as f64, table.row_count() as f64).unwrap_or(0.0);
        let mut lines = vec![
            String::new(),
            "Detailed Notes Analysis:".to_string(),
            format!("Total rides with notes: {}", noted.len()),
            format!("Percentage of rides with notes: {}", percent(pct)),
        ];

        // Rides are numbered by their position in the original table.
        for (row_number, row) in noted {
            lines.push(String::new());
            lines.push(format!("Ride Details ({}):", row_number + 1));
            for (name, cell) in table.headers().iter().zip(row) {
                let value = cell.to_string();
                if !cell.is_missing() && !value.trim().is_empty() {
                    lines.push(format!("{}: {}", name, value));
                }
            }
            lines.push("-".repeat(RIDE_SEPARATOR_WIDTH));
        }
        Ok(lines)
    }
}

fn has_note(cell: &Cell) -> bool {
    match cell {
        Cell::Text(s) => !s.trim().is_empty(),
        Cell::Number(_) => true,
        Cell::Missing => false,
    }
}
