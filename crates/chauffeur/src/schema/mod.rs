//! Canonical schema for booking tables.

mod canonical;

pub use canonical::{CanonicalColumn, header_names};
