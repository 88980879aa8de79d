//! Data source abstraction and metadata.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SummaryError};

/// Metadata about the source data file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Detected format (csv, tsv, etc.).
    pub format: String,
    /// Number of data rows (excluding header).
    pub row_count: usize,
    /// Number of columns.
    pub column_count: usize,
    /// When the file was loaded.
    pub loaded_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Create metadata for a file that has been loaded.
    pub fn new(
        path: PathBuf,
        hash: String,
        size_bytes: u64,
        format: String,
        row_count: usize,
        column_count: usize,
    ) -> Self {
        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            file,
            path,
            hash,
            size_bytes,
            format,
            row_count,
            column_count,
            loaded_at: Utc::now(),
        }
    }
}

/// A single table cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Missing,
}

impl Cell {
    /// Classify a raw field the way it was read from the file.
    pub fn from_raw(raw: &str) -> Self {
        if is_null_value(raw) {
            return Cell::Missing;
        }
        let trimmed = raw.trim();
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => Cell::Number(n),
            _ => Cell::Text(raw.to_string()),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => write!(f, "{}", s),
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Missing => Ok(()),
        }
    }
}

/// Spellings read as missing. Matching is exact, so a surname like `Na`
/// stays a value.
pub const NULL_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-NaN", "-nan", "<NA>", "N/A", "NA", "NULL", "NaN", "None",
    "n/a", "nan", "null",
];

/// Check if a raw value represents a missing/null value.
pub fn is_null_value(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || NULL_TOKENS.contains(&trimmed)
}

/// Parsed tabular data.
///
/// Every row holds exactly one cell per header column. The header can be
/// replaced once, before any analysis runs.
#[derive(Debug, Clone)]
pub struct DataTable {
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
    header_rewritten: bool,
}

impl DataTable {
    /// Create a new data table, padding or truncating rows to the header width.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Cell::Missing);
                row
            })
            .collect();

        Self {
            headers,
            rows,
            header_rewritten: false,
        }
    }

    /// Build a table from raw string fields.
    pub fn from_raw<S: AsRef<str>>(headers: Vec<String>, rows: Vec<Vec<S>>) -> Self {
        let rows = rows
            .into_iter()
            .map(|row| row.iter().map(|v| Cell::from_raw(v.as_ref())).collect())
            .collect();
        Self::new(headers, rows)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Get the number of rows (excluding header).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Whether the header has already been rewritten.
    pub fn header_rewritten(&self) -> bool {
        self.header_rewritten
    }

    /// Replace the header. Allowed once, and only with the same width.
    pub fn rewrite_header(&mut self, headers: Vec<String>) -> Result<()> {
        if self.header_rewritten {
            return Err(SummaryError::HeaderRewrite(
                "header was already rewritten".to_string(),
            ));
        }
        if headers.len() != self.headers.len() {
            return Err(SummaryError::HeaderRewrite(format!(
                "expected {} names, got {}",
                self.headers.len(),
                headers.len()
            )));
        }
        self.headers = headers;
        self.header_rewritten = true;
        Ok(())
    }

    /// Get the index of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Get all cells for a column by index.
    pub fn column_cells(&self, index: usize) -> impl Iterator<Item = &Cell> {
        self.rows.iter().map(move |row| &row[index])
    }

    /// Get a specific cell.
    pub fn get(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// A column is textual when any of its present cells is text.
    pub fn is_text_column(&self, index: usize) -> bool {
        self.column_cells(index).any(|c| matches!(c, Cell::Text(_)))
    }
}
