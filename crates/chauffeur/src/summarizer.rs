//! End-to-end pipeline: load, normalize, report.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::input::{DataTable, Parser, ParserConfig, SourceMetadata};
use crate::normalize::{Normalization, Normalizer};
use crate::report::{ReportBuilder, SummaryReport};

/// Default file name for the written summary.
pub const DEFAULT_SUMMARY_FILE: &str = "data_summary.txt";

/// Result of summarizing one upload.
#[derive(Debug, Clone)]
pub struct SummaryOutcome {
    pub source: SourceMetadata,
    /// `None` when no normalizer was configured.
    pub normalization: Option<Normalization>,
    pub table: DataTable,
    pub report: SummaryReport,
}

/// Loads a booking file, standardizes its header and builds the report.
pub struct Summarizer {
    parser: Parser,
    normalizer: Option<Normalizer>,
    builder: ReportBuilder,
}

impl Summarizer {
    /// Summarizer without column standardization.
    pub fn new() -> Self {
        Self::with_parser_config(ParserConfig::default())
    }

    pub fn with_parser_config(config: ParserConfig) -> Self {
        Self {
            parser: Parser::with_config(config),
            normalizer: None,
            builder: ReportBuilder::new(),
        }
    }

    /// Standardize the header with `normalizer` before reporting.
    pub fn with_normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = Some(normalizer);
        self
    }

    pub fn with_builder(mut self, builder: ReportBuilder) -> Self {
        self.builder = builder;
        self
    }

    /// Load `path` and produce its summary report.
    ///
    /// Only an unreadable or structurally invalid file is an error; mapping
    /// and analysis problems show up inside the report.
    pub fn summarize(&self, path: impl AsRef<Path>) -> Result<SummaryOutcome> {
        let path = path.as_ref();
        let (mut table, source) = self.parser.parse_file(path)?;

        let mut preamble = vec![
            format!("Successfully loaded data from: {}", path.display()),
            format!(
                "Dataset contains {} total bookings/rides/calls.",
                table.row_count()
            ),
        ];

        let normalization = self.normalizer.as_ref().map(|n| n.apply(&mut table));
        match &normalization {
            Some(n) if n.applied() => {
                preamble.push(format!(
                    "Columns standardized and present: {}",
                    table.headers().join(", ")
                ));
            }
            Some(_) => {
                preamble.push(
                    "Column standardization failed - using original column names".to_string(),
                );
            }
            None => {
                preamble.push(format!("Columns present: {}", table.headers().join(", ")));
            }
        }
        preamble.push(String::new());

        let report = self.builder.build(&table, &preamble);
        tracing::info!(
            file = %source.file,
            rows = table.row_count(),
            lines = report.len(),
            "summary built"
        );

        Ok(SummaryOutcome {
            source,
            normalization,
            table,
            report,
        })
    }

    /// Summarize `path` and write the report to `output`.
    pub fn generate_summary(
        &self,
        path: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<(SummaryOutcome, PathBuf)> {
        let outcome = self.summarize(path)?;
        let output = output.as_ref().to_path_buf();
        outcome.report.write_to(&output)?;
        Ok((outcome, output))
    }
}

impl Default for Summarizer {
    fn default() -> Self {
        Self::new()
    }
}
