//! Canonical column vocabulary for booking exports.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The fixed set of column roles the report understands.
///
/// Anything the normalizer cannot place keeps its original name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name")]
pub enum CanonicalColumn {
    /// Booking, reservation or confirmation number.
    Booking,
    /// Passenger, client or customer name.
    #[serde(rename = "PAX")]
    Pax,
    /// Driver or operator name.
    Chauffer,
    /// Pickup location.
    Pickup,
    /// Dropoff location.
    Dropoff,
    /// Trip price, fare or amount.
    Price,
    /// Date or time of the trip.
    Date,
    /// Free-text remarks and special instructions.
    Notes,
    /// Column kept under its original name.
    Unchanged(String),
}

impl CanonicalColumn {
    /// All canonical labels, in prompt order.
    pub const LABELS: [CanonicalColumn; 8] = [
        CanonicalColumn::Booking,
        CanonicalColumn::Pax,
        CanonicalColumn::Chauffer,
        CanonicalColumn::Pickup,
        CanonicalColumn::Dropoff,
        CanonicalColumn::Price,
        CanonicalColumn::Date,
        CanonicalColumn::Notes,
    ];

    /// The header text this column is written under.
    pub fn label(&self) -> &str {
        match self {
            CanonicalColumn::Booking => "Booking",
            CanonicalColumn::Pax => "PAX",
            CanonicalColumn::Chauffer => "Chauffer",
            CanonicalColumn::Pickup => "Pickup",
            CanonicalColumn::Dropoff => "Dropoff",
            CanonicalColumn::Price => "Price",
            CanonicalColumn::Date => "Date",
            CanonicalColumn::Notes => "Notes",
            CanonicalColumn::Unchanged(name) => name,
        }
    }

    /// Match a label against the canonical vocabulary, case-insensitively.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::LABELS
            .iter()
            .find(|c| c.label().eq_ignore_ascii_case(label))
            .cloned()
            .or_else(|| {
                label
                    .eq_ignore_ascii_case("chauffeur")
                    .then_some(CanonicalColumn::Chauffer)
            })
    }

    /// Resolve a label returned for `original`. Labels outside the vocabulary
    /// never rename a column.
    pub fn resolve(label: &str, original: &str) -> Self {
        Self::from_label(label).unwrap_or_else(|| CanonicalColumn::Unchanged(original.to_string()))
    }

    pub fn is_canonical(&self) -> bool {
        !matches!(self, CanonicalColumn::Unchanged(_))
    }
}

impl fmt::Display for CanonicalColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Header names for a canonical header.
pub fn header_names(columns: &[CanonicalColumn]) -> Vec<String> {
    columns.iter().map(|c| c.label().to_string()).collect()
}
