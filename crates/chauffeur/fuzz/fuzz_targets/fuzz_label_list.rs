//! Fuzz target for completion responses.
//!
//! Whatever the model answers, normalization returns exactly one column per
//! header entry.

#![no_main]

use std::sync::Arc;

use chauffeur::normalize::parse_label_list;
use chauffeur::{LlmColumnMapper, MockProvider, Normalizer};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let response = String::from_utf8_lossy(data).into_owned();

    if let Ok(labels) = parse_label_list(&response) {
        assert!(!labels.is_empty());
    }

    let header: Vec<String> = ["conf_no", "client", "driver", "fare"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let normalizer = Normalizer::new(LlmColumnMapper::new(Arc::new(MockProvider::answering(
        response,
    ))));
    let normalization = normalizer.normalize(&header);
    assert_eq!(normalization.columns.len(), header.len());
});
