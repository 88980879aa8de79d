//! Assembles the summary report from the individual analyses.

use chrono::{Local, NaiveDateTime};

use crate::input::DataTable;

use super::analyses::{
    Analysis, CategoricalDistributions, ChaufferEarnings, MissingValues, NotesDetail,
    PriceStatistics,
};
use super::summary::SummaryReport;

/// Report title, always the first line.
pub const REPORT_TITLE: &str = "Data Analysis Summary";

/// Runs every analysis in a fixed order and collects their lines.
pub struct ReportBuilder {
    analyses: Vec<Box<dyn Analysis>>,
    generated_at: Option<NaiveDateTime>,
}

impl ReportBuilder {
    /// Builder with the standard analyses: missing values, price
    /// statistics, chauffeur earnings, categorical distributions, notes.
    pub fn new() -> Self {
        Self {
            analyses: vec![
                Box::new(MissingValues),
                Box::new(PriceStatistics),
                Box::new(ChaufferEarnings),
                Box::new(CategoricalDistributions),
                Box::new(NotesDetail),
            ],
            generated_at: None,
        }
    }

    /// Builder with a custom list of analyses.
    pub fn with_analyses(analyses: Vec<Box<dyn Analysis>>) -> Self {
        Self {
            analyses,
            generated_at: None,
        }
    }

    /// Pin the generation timestamp instead of using the local clock.
    pub fn generated_at(mut self, at: NaiveDateTime) -> Self {
        self.generated_at = Some(at);
        self
    }

    /// Build the report: title, timestamp, the caller's preamble lines, then
    /// each analysis in order. A failing analysis contributes one line and
    /// never stops the ones after it.
    pub fn build(&self, table: &DataTable, preamble: &[String]) -> SummaryReport {
        let at = self
            .generated_at
            .unwrap_or_else(|| Local::now().naive_local());

        let mut report = SummaryReport::new();
        report.push(REPORT_TITLE);
        report.push(format!("Generated on: {}", at.format("%Y-%m-%d %H:%M:%S")));
        report.push("");
        report.extend(preamble.iter().cloned());

        for analysis in &self.analyses {
            match analysis.analyze(table) {
                Ok(lines) => report.extend(lines),
                Err(e) => {
                    tracing::debug!(analysis = analysis.name(), error = %e, "analysis skipped");
                    report.push("");
                    report.push(e.to_string());
                }
            }
        }

        report
    }
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self::new()
    }
}
