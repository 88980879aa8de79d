//! CSV/TSV parser with delimiter detection.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use sha2::{Digest, Sha256};

use super::source::{DataTable, SourceMetadata};
use crate::error::{Result, SummaryError};

/// Rows sampled when guessing the delimiter.
const SAMPLE_ROWS: usize = 10;

/// Field separators seen in booking exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Tab,
    Comma,
    Semicolon,
    Pipe,
}

impl Delimiter {
    /// Detection candidates; earlier entries win ties.
    pub const ALL: [Delimiter; 4] = [
        Delimiter::Tab,
        Delimiter::Comma,
        Delimiter::Semicolon,
        Delimiter::Pipe,
    ];

    pub fn byte(self) -> u8 {
        match self {
            Delimiter::Tab => b'\t',
            Delimiter::Comma => b',',
            Delimiter::Semicolon => b';',
            Delimiter::Pipe => b'|',
        }
    }

    /// Format name recorded in [`SourceMetadata`].
    pub fn format(self) -> &'static str {
        match self {
            Delimiter::Tab => "tsv",
            Delimiter::Comma => "csv",
            Delimiter::Semicolon => "csv-semicolon",
            Delimiter::Pipe => "psv",
        }
    }

    fn from_byte(byte: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.byte() == byte)
    }
}

/// Parser configuration.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Maximum rows to read (None = all).
    pub max_rows: Option<usize>,
    /// Quote character.
    pub quote: u8,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            max_rows: None,
            quote: b'"',
        }
    }
}

/// Parses booking export files into a [`DataTable`].
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse a file and return the data table and metadata.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<(DataTable, SourceMetadata)> {
        let path = path.as_ref();
        let unavailable = |e: std::io::Error| SummaryError::SourceUnavailable {
            path: path.to_path_buf(),
            source: e,
        };

        let mut file = File::open(path).map_err(unavailable)?;
        let size_bytes = file.metadata().map_err(unavailable)?.len();

        let mut contents = Vec::new();
        file.read_to_end(&mut contents).map_err(unavailable)?;

        let mut hasher = Sha256::new();
        hasher.update(&contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => self.detect_delimiter(&contents)?.byte(),
        };

        let table = self.parse_bytes(&contents, delimiter)?;
        let format = Delimiter::from_byte(delimiter)
            .map(Delimiter::format)
            .unwrap_or("delimited")
            .to_string();

        tracing::info!(
            path = %path.display(),
            rows = table.row_count(),
            columns = table.column_count(),
            format = %format,
            "loaded booking table"
        );

        let metadata = SourceMetadata::new(
            path.to_path_buf(),
            hash,
            size_bytes,
            format,
            table.row_count(),
            table.column_count(),
        );

        Ok((table, metadata))
    }

    /// Parse bytes with a known delimiter. A header with no data rows is a
    /// valid, empty table.
    pub fn parse_bytes(&self, bytes: &[u8], delimiter: u8) -> Result<DataTable> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|s| s.trim().to_string())
            .collect();

        if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
            return Err(SummaryError::EmptyData("No columns found".to_string()));
        }

        let mut rows: Vec<Vec<String>> = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            if let Some(max) = self.config.max_rows {
                if row_idx >= max {
                    break;
                }
            }
            let record = result?;
            rows.push(record.iter().map(|s| s.to_string()).collect());
        }

        Ok(DataTable::from_raw(headers, rows))
    }

    /// Guess the delimiter from the header and the first data rows.
    ///
    /// A candidate must split the header into at least two columns. Among
    /// those, the one whose sampled rows most often match the header width
    /// wins, then the one giving the wider header. A single-column file is
    /// read as comma-separated.
    pub fn detect_delimiter(&self, bytes: &[u8]) -> Result<Delimiter> {
        if bytes.iter().all(|b| b.is_ascii_whitespace()) {
            return Err(SummaryError::EmptyData("No lines to analyze".to_string()));
        }

        let mut best: Option<((usize, usize), Delimiter)> = None;
        for delimiter in Delimiter::ALL {
            let Some(score) = self.header_fit(bytes, delimiter) else {
                continue;
            };
            if best.map_or(true, |(top, _)| score > top) {
                best = Some((score, delimiter));
            }
        }

        let delimiter = best.map_or(Delimiter::Comma, |(_, d)| d);
        tracing::debug!(format = delimiter.format(), "delimiter detected");
        Ok(delimiter)
    }

    /// Rows agreeing with the header width, and that width, when `delimiter`
    /// yields a multi-column header. Quoting follows the configured quote.
    fn header_fit(&self, bytes: &[u8], delimiter: Delimiter) -> Option<(usize, usize)> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter.byte())
            .quote(self.config.quote)
            .has_headers(false)
            .flexible(true)
            .from_reader(bytes);

        let widths: Vec<usize> = reader
            .records()
            .take(SAMPLE_ROWS)
            .filter_map(|r| r.ok())
            .map(|r| r.len())
            .collect();

        let header = *widths.first()?;
        if header < 2 {
            return None;
        }
        let agreeing = widths.iter().filter(|&&w| w == header).count();
        Some((agreeing, header))
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}
