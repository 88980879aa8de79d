//! The rendered summary artifact.

use std::fs;
use std::path::Path;

use crate::error::{Result, SummaryError};

/// Ordered, append-only report lines.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryReport {
    lines: Vec<String>,
}

impl SummaryReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn extend<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lines.extend(lines.into_iter().map(Into::into));
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Whether any line equals `line` exactly.
    pub fn contains_line(&self, line: &str) -> bool {
        self.lines.iter().any(|l| l == line)
    }

    /// Lines joined with `\n`, no trailing newline.
    pub fn to_text(&self) -> String {
        self.lines.join("\n")
    }

    /// Write the report as UTF-8 text, creating parent directories.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let io_err = |e| SummaryError::Io {
            path: path.to_path_buf(),
            source: e,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(path, self.to_text()).map_err(io_err)?;

        tracing::info!(path = %path.display(), lines = self.len(), "summary written");
        Ok(())
    }
}
