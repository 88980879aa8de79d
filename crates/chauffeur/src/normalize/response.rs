//! Strict parsing of the model's label list.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Result, SummaryError};

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Parse a completion of the form `["Booking", "PAX", ...]` into labels.
///
/// The whole (trimmed) answer must be the list: any prose before or after
/// the brackets is rejected.
pub fn parse_label_list(response: &str) -> Result<Vec<String>> {
    let collapsed = WHITESPACE_RUN.replace_all(response.trim(), " ");
    let cleaned = collapsed.as_ref();

    if !(cleaned.starts_with('[') && cleaned.ends_with(']')) || cleaned.len() < 2 {
        return Err(SummaryError::ResponseParse(
            "response is not in the expected list format".to_string(),
        ));
    }

    let content = &cleaned[1..cleaned.len() - 1];
    let labels: Vec<String> = content
        .split(',')
        .map(|fragment| strip_one_quote(fragment.trim()).trim().to_string())
        .filter(|label| !label.is_empty())
        .collect();

    if labels.is_empty() {
        return Err(SummaryError::ResponseParse(
            "no column names found in response".to_string(),
        ));
    }

    Ok(labels)
}

/// Remove one leading and one trailing quote character, single or double.
fn strip_one_quote(fragment: &str) -> &str {
    let is_quote = |c: char| c == '"' || c == '\'';
    let fragment = fragment.strip_prefix(is_quote).unwrap_or(fragment);
    fragment.strip_suffix(is_quote).unwrap_or(fragment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_double_quoted() {
        let labels = parse_label_list(r#"["Booking", "PAX", "Chauffer", "Price"]"#).unwrap();
        assert_eq!(labels, vec!["Booking", "PAX", "Chauffer", "Price"]);
    }

    #[test]
    fn test_parse_single_quoted_multiline() {
        let labels = parse_label_list("\n  ['Booking',\n   'car_type' ,\n 'Notes']  \n").unwrap();
        assert_eq!(labels, vec!["Booking", "car_type", "Notes"]);
    }

    #[test]
    fn test_parse_drops_empty_fragments() {
        let labels = parse_label_list(r#"["Date",, "Price", ]"#).unwrap();
        assert_eq!(labels, vec!["Date", "Price"]);
    }

    #[test]
    fn test_collapses_inner_whitespace() {
        let labels = parse_label_list("[\"pickup   \t time\"]").unwrap();
        assert_eq!(labels, vec!["pickup time"]);
    }

    #[test]
    fn test_rejects_leading_prose() {
        let err = parse_label_list(r#"Sure! ["Booking", "PAX"]"#).unwrap_err();
        assert!(matches!(err, SummaryError::ResponseParse(_)));
    }

    #[test]
    fn test_rejects_code_fence() {
        assert!(parse_label_list("```\n[\"Booking\"]\n```").is_err());
    }

    #[test]
    fn test_rejects_empty_list() {
        assert!(parse_label_list("[]").is_err());
        assert!(parse_label_list("[ , '' ]").is_err());
        assert!(parse_label_list("").is_err());
        assert!(parse_label_list("]").is_err());
    }
}
