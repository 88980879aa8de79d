//! Summary report generation.

mod analyses;
mod builder;
pub mod format;
mod summary;

pub use analyses::{
    Analysis, CategoricalDistributions, ChaufferEarnings, ChaufferStats, MissingValues,
    NotesDetail, PriceStatistics, PriceSummary, RIDE_SEPARATOR_WIDTH, StepError, TOP_CATEGORIES,
    coerce_amount,
};
pub use builder::{REPORT_TITLE, ReportBuilder};
pub use summary::SummaryReport;
