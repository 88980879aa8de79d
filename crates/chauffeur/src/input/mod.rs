//! Input parsing and data source handling.

mod parser;
mod source;

pub use parser::{Delimiter, Parser, ParserConfig};
pub use source::{Cell, DataTable, SourceMetadata, is_null_value};
