//! CLI command implementations.

pub mod ask;
pub mod normalize;
pub mod summarize;

use std::sync::Arc;

use chauffeur::{AppConfig, CompletionProvider, LlmColumnMapper, Normalizer, RuleBasedMapper};

use crate::cli::{LlmProviderChoice, MapperChoice};

/// Read configuration from the environment, with command-line overrides.
pub fn load_config(
    llm: Option<LlmProviderChoice>,
    model: Option<String>,
) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let mut config = AppConfig::from_lookup(|key| match (key, llm) {
        ("CHAUFFEUR_PROVIDER", Some(choice)) => Some(choice.to_string()),
        _ => std::env::var(key).ok(),
    })?;
    if let Some(model) = model {
        config.llm.model = model;
    }
    tracing::debug!(provider = %config.provider, model = %config.llm.model, "configuration loaded");
    Ok(config)
}

pub fn build_provider(
    llm: Option<LlmProviderChoice>,
    model: Option<String>,
) -> Result<Arc<dyn CompletionProvider>, Box<dyn std::error::Error>> {
    Ok(load_config(llm, model)?.build_provider()?)
}

/// The normalizer for a mapper choice, or `None` to keep headers as they are.
pub fn build_normalizer(
    mapper: MapperChoice,
    llm: Option<LlmProviderChoice>,
    model: Option<String>,
) -> Result<Option<Normalizer>, Box<dyn std::error::Error>> {
    let normalizer = match mapper {
        MapperChoice::Llm => {
            let provider = build_provider(llm, model)?;
            Some(Normalizer::new(LlmColumnMapper::new(provider)))
        }
        MapperChoice::Rules => Some(Normalizer::new(RuleBasedMapper::new())),
        MapperChoice::None => None,
    };
    Ok(normalizer)
}
