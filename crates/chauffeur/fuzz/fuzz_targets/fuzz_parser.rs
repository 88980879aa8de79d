//! Fuzz target for loading and summarizing an uploaded file.
//!
//! Any bytes that parse as a table must also produce a report without
//! panicking, whatever the column names and cell contents are.

#![no_main]

use chauffeur::{Parser, ReportBuilder};
use libfuzzer_sys::fuzz_target;
use std::io::Write;

fuzz_target!(|data: &[u8]| {
    // Only process reasonable-sized inputs to avoid OOM
    if data.len() > 100_000 {
        return;
    }

    if let Ok(mut temp_file) = tempfile::NamedTempFile::new() {
        if temp_file.write_all(data).is_ok() {
            if let Ok((table, _source)) = Parser::new().parse_file(temp_file.path()) {
                let report = ReportBuilder::new().build(&table, &[]);
                assert!(!report.is_empty());
            }
        }
    }
});
