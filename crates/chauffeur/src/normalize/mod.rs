//! Header normalization onto the canonical booking vocabulary.
//!
//! A [`Normalizer`] wraps one [`ColumnMapper`] strategy and guarantees the
//! caller always gets a usable header: on any mapper failure the original
//! names are kept.

mod llm;
mod mapper;
mod response;
mod rules;

pub use llm::LlmColumnMapper;
pub use mapper::{ColumnMapper, Normalization, NormalizationOutcome, Normalizer};
pub use response::parse_label_list;
pub use rules::RuleBasedMapper;
