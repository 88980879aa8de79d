//! Offline column mapping by keyword matching.

use std::collections::HashSet;

use crate::error::Result;
use crate::schema::CanonicalColumn;

use super::mapper::ColumnMapper;

/// Keywords per canonical column. Matched against whole name tokens.
const KEYWORDS: &[(CanonicalColumn, &[&str])] = &[
    (
        CanonicalColumn::Booking,
        &["booking", "reservation", "confirmation", "conf", "ref", "reference", "job"],
    ),
    (
        CanonicalColumn::Pax,
        &["pax", "passenger", "passengers", "client", "customer", "guest", "rider"],
    ),
    (
        CanonicalColumn::Chauffer,
        &["chauffer", "chauffeur", "driver", "operator"],
    ),
    (CanonicalColumn::Pickup, &["pickup", "pick", "origin", "from", "start"]),
    (
        CanonicalColumn::Dropoff,
        &["dropoff", "drop", "destination", "dest", "end"],
    ),
    (
        CanonicalColumn::Price,
        &["price", "cost", "fare", "amount", "rate", "charge", "total"],
    ),
    (
        CanonicalColumn::Date,
        &["date", "time", "datetime", "timestamp", "schedule", "day"],
    ),
    (
        CanonicalColumn::Notes,
        &[
            "notes", "note", "comment", "comments", "remark", "remarks", "instructions",
            "requests", "request", "info",
        ],
    ),
];

/// Maps columns by looking for known keywords in their names.
///
/// Tokens are checked from the last to the first, so the head noun decides:
/// `pickup_time` is a date, `driver_name` is a chauffeur. Each canonical
/// column is handed out at most once; later candidates keep their name.
#[derive(Debug, Default, Clone)]
pub struct RuleBasedMapper;

impl RuleBasedMapper {
    pub fn new() -> Self {
        Self
    }

    fn classify(name: &str) -> Option<CanonicalColumn> {
        tokenize(name).iter().rev().find_map(|token| {
            KEYWORDS
                .iter()
                .find(|(_, words)| words.contains(&token.as_str()))
                .map(|(column, _)| column.clone())
        })
    }
}

impl ColumnMapper for RuleBasedMapper {
    fn map_columns(&self, header: &[String]) -> Result<Vec<CanonicalColumn>> {
        let mut taken = HashSet::new();
        let columns = header
            .iter()
            .map(|name| match Self::classify(name) {
                Some(column) if taken.insert(column.clone()) => column,
                _ => CanonicalColumn::Unchanged(name.clone()),
            })
            .collect();
        Ok(columns)
    }

    fn name(&self) -> &str {
        "rules"
    }
}

/// Split a column name into lowercase word tokens.
///
/// Separators are any non-alphanumeric characters and lower-to-upper case
/// transitions (`PickupTime` -> `pickup`, `time`).
fn tokenize(name: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for ch in name.chars() {
        if !ch.is_alphanumeric() {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if ch.is_uppercase() && prev_lower && !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
        prev_lower = ch.is_lowercase() || ch.is_numeric();
        current.extend(ch.to_lowercase());
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}
