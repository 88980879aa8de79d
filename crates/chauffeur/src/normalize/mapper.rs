//! Column mapping strategy and the fallback policy around it.

use std::collections::HashSet;

use serde::Serialize;

use crate::error::{Result, SummaryError};
use crate::input::DataTable;
use crate::schema::{CanonicalColumn, header_names};

/// A strategy that proposes a canonical column for every header entry.
///
/// Implementations return exactly one column per input name, in input
/// order, or an error. They do not need to handle fallback themselves.
pub trait ColumnMapper: Send + Sync {
    fn map_columns(&self, header: &[String]) -> Result<Vec<CanonicalColumn>>;

    /// Short name for logs and reports.
    fn name(&self) -> &str;
}

/// How a normalization attempt ended.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NormalizationOutcome {
    Applied,
    FellBack { reason: String },
}

/// Result of normalizing one header.
#[derive(Debug, Clone, Serialize)]
pub struct Normalization {
    pub columns: Vec<CanonicalColumn>,
    pub mapper: String,
    pub outcome: NormalizationOutcome,
}

impl Normalization {
    fn unchanged(header: &[String], mapper: &str, reason: String) -> Self {
        Self {
            columns: header
                .iter()
                .map(|h| CanonicalColumn::Unchanged(h.clone()))
                .collect(),
            mapper: mapper.to_string(),
            outcome: NormalizationOutcome::FellBack { reason },
        }
    }

    pub fn applied(&self) -> bool {
        self.outcome == NormalizationOutcome::Applied
    }

    /// The header text after normalization.
    pub fn header(&self) -> Vec<String> {
        header_names(&self.columns)
    }
}

/// Runs a [`ColumnMapper`] and never lets its failures escape.
pub struct Normalizer {
    mapper: Box<dyn ColumnMapper>,
}

impl Normalizer {
    pub fn new(mapper: impl ColumnMapper + 'static) -> Self {
        Self {
            mapper: Box::new(mapper),
        }
    }

    /// Map a header onto the canonical vocabulary.
    ///
    /// Any mapper error, a result whose length differs from the header, or
    /// a canonical label that would share its name with another column
    /// yields the original header unchanged.
    pub fn normalize(&self, header: &[String]) -> Normalization {
        let name = self.mapper.name();
        let result = self.mapper.map_columns(header).and_then(|columns| {
            if columns.len() != header.len() {
                return Err(SummaryError::LengthMismatch {
                    expected: header.len(),
                    actual: columns.len(),
                });
            }
            match duplicated_label(&columns) {
                Some(label) => Err(SummaryError::DuplicateLabel(label)),
                None => Ok(columns),
            }
        });

        match result {
            Ok(columns) => {
                tracing::debug!(
                    mapper = name,
                    header = ?header_names(&columns),
                    "columns standardized"
                );
                Normalization {
                    columns,
                    mapper: name.to_string(),
                    outcome: NormalizationOutcome::Applied,
                }
            }
            Err(e) => {
                tracing::warn!(
                    mapper = name,
                    error = %e,
                    "column standardization failed, keeping original header"
                );
                Normalization::unchanged(header, name, e.to_string())
            }
        }
    }

    /// Normalize a table's header in place.
    pub fn apply(&self, table: &mut DataTable) -> Normalization {
        let original = table.headers().to_vec();
        let normalization = self.normalize(&original);
        if !normalization.applied() {
            return normalization;
        }

        match table.rewrite_header(normalization.header()) {
            Ok(()) => normalization,
            Err(e) => {
                tracing::warn!(error = %e, "normalized header not applied");
                Normalization::unchanged(&original, self.mapper.name(), e.to_string())
            }
        }
    }
}

/// First canonical label that names more than one column. Duplicates among
/// unchanged columns came with the file and are left alone.
fn duplicated_label(columns: &[CanonicalColumn]) -> Option<String> {
    let names = header_names(columns);
    let mut seen = HashSet::new();
    let repeated: HashSet<&str> = names
        .iter()
        .map(String::as_str)
        .filter(|n| !seen.insert(*n))
        .collect();

    columns
        .iter()
        .zip(&names)
        .find(|(column, name)| column.is_canonical() && repeated.contains(name.as_str()))
        .map(|(_, name)| name.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Result<Vec<CanonicalColumn>>);

    impl ColumnMapper for Fixed {
        fn map_columns(&self, _header: &[String]) -> Result<Vec<CanonicalColumn>> {
            match &self.0 {
                Ok(columns) => Ok(columns.clone()),
                Err(e) => Err(SummaryError::Completion(e.to_string())),
            }
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    fn header(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_length_mismatch_falls_back() {
        let normalizer = Normalizer::new(Fixed(Ok(vec![CanonicalColumn::Booking])));
        let result = normalizer.normalize(&header(&["conf", "driver"]));

        assert!(!result.applied());
        assert_eq!(result.header(), header(&["conf", "driver"]));
        match result.outcome {
            NormalizationOutcome::FellBack { reason } => assert!(reason.contains("expected 2")),
            NormalizationOutcome::Applied => panic!("should have fallen back"),
        }
    }

    #[test]
    fn test_repeated_label_falls_back() {
        let normalizer = Normalizer::new(Fixed(Ok(vec![
            CanonicalColumn::Chauffer,
            CanonicalColumn::Price,
            CanonicalColumn::Price,
        ])));
        let original = header(&["driver", "fare", "deposit"]);
        let result = normalizer.normalize(&original);

        assert!(!result.applied());
        assert_eq!(result.header(), original);
        assert_eq!(
            result.outcome,
            NormalizationOutcome::FellBack {
                reason: "Duplicate column name after standardization: Price".to_string()
            }
        );
    }

    #[test]
    fn test_label_colliding_with_kept_name_falls_back() {
        let normalizer = Normalizer::new(Fixed(Ok(vec![
            CanonicalColumn::Notes,
            CanonicalColumn::Unchanged("Notes".to_string()),
        ])));
        let original = header(&["remarks", "Notes"]);
        let mut table = DataTable::from_raw(original.clone(), vec![vec!["VIP", "late"]]);

        assert!(!normalizer.apply(&mut table).applied());
        assert_eq!(table.headers(), original.as_slice());
        assert!(!table.header_rewritten());
    }

    #[test]
    fn test_duplicates_from_the_file_are_kept() {
        let normalizer = Normalizer::new(Fixed(Ok(vec![
            CanonicalColumn::Price,
            CanonicalColumn::Unchanged("extra".to_string()),
            CanonicalColumn::Unchanged("extra".to_string()),
        ])));
        let result = normalizer.normalize(&header(&["fare", "extra", "extra"]));
        assert!(result.applied());
    }

    #[test]
    fn test_error_falls_back() {
        let normalizer = Normalizer::new(Fixed(Err(SummaryError::Completion("down".into()))));
        let result = normalizer.normalize(&header(&["a"]));
        assert_eq!(result.header(), header(&["a"]));
    }

    #[test]
    fn test_apply_rewrites_table_once() {
        let normalizer = Normalizer::new(Fixed(Ok(vec![
            CanonicalColumn::Chauffer,
            CanonicalColumn::Price,
        ])));
        let mut table = DataTable::from_raw(header(&["driver", "fare"]), vec![vec!["A", "10"]]);

        assert!(normalizer.apply(&mut table).applied());
        assert_eq!(table.headers(), &["Chauffer", "Price"]);

        let second = normalizer.apply(&mut table);
        assert!(!second.applied());
        assert_eq!(table.headers(), &["Chauffer", "Price"]);
    }
}
