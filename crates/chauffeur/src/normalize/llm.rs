//! Column mapping delegated to a completion model.

use std::sync::Arc;

use crate::error::Result;
use crate::llm::{CompletionProvider, prompts};
use crate::schema::CanonicalColumn;

use super::mapper::ColumnMapper;
use super::response::parse_label_list;

/// Asks a language model to label each column, then parses its answer
/// strictly.
pub struct LlmColumnMapper {
    provider: Arc<dyn CompletionProvider>,
}

impl LlmColumnMapper {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self { provider }
    }
}

impl ColumnMapper for LlmColumnMapper {
    fn map_columns(&self, header: &[String]) -> Result<Vec<CanonicalColumn>> {
        let prompt = prompts::column_standardization_prompt(header);
        let response = self.provider.complete(&prompt)?;
        tracing::debug!(
            provider = self.provider.name(),
            response = %response,
            "standardization response"
        );

        let labels = parse_label_list(&response)?;

        // Surplus labels are kept so the normalizer sees the real length.
        Ok(labels
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let original = header.get(i).map(String::as_str).unwrap_or(label.as_str());
                CanonicalColumn::resolve(label, original)
            })
            .collect())
    }

    fn name(&self) -> &str {
        "llm"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockProvider;
    use crate::normalize::Normalizer;

    fn header(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_maps_in_order() {
        let mock = Arc::new(
            MockProvider::new().then_reply(r#"["Booking", "PAX", "Chauffer", "Price"]"#),
        );
        let normalizer = Normalizer::new(LlmColumnMapper::new(mock.clone()));

        let result = normalizer.normalize(&header(&["conf_no", "client", "driver", "fare"]));

        assert!(result.applied());
        assert_eq!(
            result.columns,
            vec![
                CanonicalColumn::Booking,
                CanonicalColumn::Pax,
                CanonicalColumn::Chauffer,
                CanonicalColumn::Price,
            ]
        );
        assert_eq!(mock.call_count(), 1);
        assert!(mock.prompts()[0].contains("conf_no"));
    }

    #[test]
    fn test_invented_label_keeps_original() {
        let mock = Arc::new(MockProvider::new().then_reply(r#"["Vehicle", "Price"]"#));
        let normalizer = Normalizer::new(LlmColumnMapper::new(mock));

        let result = normalizer.normalize(&header(&["car", "fare"]));
        assert_eq!(result.header(), header(&["car", "Price"]));
    }

    #[test]
    fn test_prose_response_falls_back() {
        let mock = Arc::new(MockProvider::new().then_reply(r#"Sure! ["Booking", "PAX"]"#));
        let normalizer = Normalizer::new(LlmColumnMapper::new(mock));

        let original = header(&["conf_no", "client", "driver"]);
        let result = normalizer.normalize(&original);
        assert!(!result.applied());
        assert_eq!(result.header(), original);
    }

    #[test]
    fn test_short_list_falls_back() {
        let mock = Arc::new(MockProvider::new().then_reply(r#"["Booking", "PAX"]"#));
        let normalizer = Normalizer::new(LlmColumnMapper::new(mock));

        let original = header(&["conf_no", "client", "driver"]);
        assert_eq!(normalizer.normalize(&original).header(), original);
    }

    #[test]
    fn test_repeated_label_falls_back() {
        let mock =
            Arc::new(MockProvider::new().then_reply(r#"["Chauffer", "Price", "Price"]"#));
        let normalizer = Normalizer::new(LlmColumnMapper::new(mock));

        let original = header(&["driver", "fare", "deposit"]);
        let result = normalizer.normalize(&original);
        assert!(!result.applied());
        assert_eq!(result.header(), original);
    }

    #[test]
    fn test_provider_error_falls_back() {
        let mock = Arc::new(MockProvider::new().then_fail("503 Service Unavailable"));
        let normalizer = Normalizer::new(LlmColumnMapper::new(mock));

        let original = header(&["fare"]);
        assert_eq!(normalizer.normalize(&original).header(), original);
    }
}
