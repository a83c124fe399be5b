//! Model-backed extraction
//!
//! Wraps a [`ModelProvider`] with prompt construction, response parsing,
//! candidate validation, and a response cache. Provider calls run on a
//! blocking task under the configured timeout, so a wedged model server
//! costs one deadline, never the pipeline.
//!
//! Model failures degrade to an empty result: the caller still has the
//! pattern facts, which is the whole point of the hybrid design.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex};

use tokio::task::spawn_blocking;
use tokio::time::timeout;
use tracing::{debug, warn};

use loanlens_domain::traits::ModelProvider;
use loanlens_domain::{
    Confidence, ExtractedFact, ExtractionMethod, FactCategory, FactKey, MISSING_VALUE,
};
use loanlens_normalizer::{is_placeholder, normalize};

use crate::config::ExtractorConfig;
use crate::error::ExtractError;
use crate::parser::{parse_model_response, FactCandidate};
use crate::prompt::PromptBuilder;

/// Extracts facts by prompting an external model
pub struct ModelExtractor<P> {
    provider: Arc<P>,
    prompts: PromptBuilder,
    config: ExtractorConfig,
    cache: Mutex<HashMap<u64, Vec<ExtractedFact>>>,
}

impl<P> ModelExtractor<P>
where
    P: ModelProvider + Send + Sync + 'static,
{
    /// Create a model extractor over a provider
    pub fn new(provider: P, config: ExtractorConfig) -> Self {
        let prompts = PromptBuilder::new(config.prompt_window);
        Self {
            provider: Arc::new(provider),
            prompts,
            config,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Extract facts for the given categories from `text`
    ///
    /// Never fails: any model, parse, or timeout error is logged and yields
    /// an empty result. Successful responses are cached by document content
    /// and category set.
    pub async fn extract(&self, text: &str, categories: &[FactCategory]) -> Vec<ExtractedFact> {
        if categories.is_empty() {
            return Vec::new();
        }

        let cache_key = response_cache_key(text, categories);
        if self.config.cache_enabled {
            if let Some(cached) = self.cache.lock().unwrap().get(&cache_key) {
                debug!(categories = categories.len(), "model response served from cache");
                return cached.clone();
            }
        }

        match self.call_and_parse(text, categories).await {
            Ok(facts) => {
                if self.config.cache_enabled {
                    self.cache.lock().unwrap().insert(cache_key, facts.clone());
                }
                facts
            }
            Err(e) => {
                warn!(error = %e, "model extraction failed, continuing with pattern facts only");
                Vec::new()
            }
        }
    }

    async fn call_and_parse(
        &self,
        text: &str,
        categories: &[FactCategory],
    ) -> Result<Vec<ExtractedFact>, ExtractError> {
        let prompt = self.prompts.build(text, categories);
        let response = self.call_model(prompt).await?;
        let candidates = parse_model_response(&response)?;

        Ok(candidates
            .into_iter()
            .filter_map(|candidate| self.candidate_to_fact(candidate))
            .collect())
    }

    /// Run one provider call on a blocking task under the deadline
    async fn call_model(&self, prompt: String) -> Result<String, ExtractError> {
        let provider = Arc::clone(&self.provider);
        let call = spawn_blocking(move || {
            provider.generate(&prompt).map_err(|e| e.to_string())
        });

        match timeout(self.config.model_timeout(), call).await {
            Err(_) => Err(ExtractError::Timeout),
            Ok(Err(join_error)) => Err(ExtractError::Model(format!(
                "model task failed: {}",
                join_error
            ))),
            Ok(Ok(Err(provider_error))) => Err(ExtractError::Model(provider_error)),
            Ok(Ok(Ok(response))) => Ok(response),
        }
    }

    /// Validate and convert one parsed candidate into a fact
    fn candidate_to_fact(&self, candidate: FactCandidate) -> Option<ExtractedFact> {
        let section = candidate.section.replace('&', "and");
        let key = match FactKey::from_parts(&section, &candidate.field) {
            Ok(key) => key,
            Err(e) => {
                debug!(error = %e, "skipping candidate with unusable key");
                return None;
            }
        };

        let raw = candidate.value.trim();
        if is_placeholder(raw) {
            return None;
        }
        let normalized = normalize(&key, raw);
        if normalized == MISSING_VALUE {
            return None;
        }

        let confidence = match candidate.confidence {
            Some(value) => Confidence::new(value).ok()?,
            None => Confidence::clamped(self.config.default_model_confidence),
        };

        match ExtractedFact::new(
            key,
            raw,
            normalized,
            confidence,
            candidate.source_text,
            ExtractionMethod::Model,
        ) {
            Ok(fact) => Some(fact),
            Err(e) => {
                debug!(error = %e, "skipping invalid model fact");
                None
            }
        }
    }
}

fn response_cache_key(text: &str, categories: &[FactCategory]) -> u64 {
    let mut hasher = DefaultHasher::new();
    text.hash(&mut hasher);
    for category in categories {
        category.as_str().hash(&mut hasher);
    }
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use loanlens_llm::MockProvider;

    const FEES_RESPONSE: &str = r#"[{"section": "fees", "field": "processing_fee", "value": "0.5%", "source_text": "Processing fee is 0.5%", "confidence": 0.75}]"#;

    fn extractor(provider: MockProvider) -> ModelExtractor<MockProvider> {
        ModelExtractor::new(provider, ExtractorConfig::default())
    }

    #[tokio::test]
    async fn test_extracts_facts_from_response() {
        let provider = MockProvider::new(FEES_RESPONSE);
        let facts = extractor(provider)
            .extract("document text", &[FactCategory::Fees])
            .await;

        assert_eq!(facts.len(), 1);
        let fact = &facts[0];
        assert_eq!(fact.key.as_str(), "fees.processing_fee");
        assert_eq!(fact.normalized_value, "0.5");
        assert_eq!(fact.confidence.value(), 0.75);
        assert_eq!(fact.method, ExtractionMethod::Model);
        assert!(fact.source_reference.is_none());
    }

    #[tokio::test]
    async fn test_missing_confidence_gets_default() {
        let response = r#"[{"section": "fees", "field": "legal_charges", "value": "₹5,000"}]"#;
        let provider = MockProvider::new(response);
        let facts = extractor(provider)
            .extract("document text", &[FactCategory::Fees])
            .await;

        assert_eq!(facts[0].confidence.value(), 0.6);
    }

    #[tokio::test]
    async fn test_section_aliases_land_on_canonical_keys() {
        let response = r#"[{"section": "Fees & Charges", "field": "processing_fees", "value": "1%"}]"#;
        let provider = MockProvider::new(response);
        let facts = extractor(provider)
            .extract("document text", &[FactCategory::Fees])
            .await;

        assert_eq!(facts[0].key.as_str(), "fees.processing_fee");
    }

    #[tokio::test]
    async fn test_placeholder_values_are_dropped() {
        let response = r#"[{"section": "fees", "field": "processing_fee", "value": "Not specified"}]"#;
        let provider = MockProvider::new(response);
        let facts = extractor(provider)
            .extract("document text", &[FactCategory::Fees])
            .await;

        assert!(facts.is_empty());
    }

    #[tokio::test]
    async fn test_provider_failure_degrades_to_empty() {
        let mut provider = MockProvider::default();
        provider.add_error("fees", "simulated outage");
        let facts = extractor(provider)
            .extract("document text", &[FactCategory::Fees])
            .await;

        assert!(facts.is_empty());
    }

    #[tokio::test]
    async fn test_garbage_response_degrades_to_empty() {
        let provider = MockProvider::new("I found no terms worth reporting.");
        let facts = extractor(provider)
            .extract("document text", &[FactCategory::Fees])
            .await;

        assert!(facts.is_empty());
    }

    #[tokio::test]
    async fn test_no_categories_means_no_call() {
        let provider = MockProvider::new(FEES_RESPONSE);
        let extractor = extractor(provider.clone());
        let facts = extractor.extract("document text", &[]).await;

        assert!(facts.is_empty());
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_cache_avoids_repeat_calls() {
        let provider = MockProvider::new(FEES_RESPONSE);
        let extractor = extractor(provider.clone());

        let first = extractor.extract("same text", &[FactCategory::Fees]).await;
        let second = extractor.extract("same text", &[FactCategory::Fees]).await;

        assert_eq!(first, second);
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_cache_distinguishes_category_sets() {
        let provider = MockProvider::new("[]");
        let extractor = extractor(provider.clone());

        extractor.extract("same text", &[FactCategory::Fees]).await;
        extractor.extract("same text", &[FactCategory::Tenure]).await;

        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_cache_can_be_disabled() {
        let provider = MockProvider::new(FEES_RESPONSE);
        let config = ExtractorConfig {
            cache_enabled: false,
            ..ExtractorConfig::default()
        };
        let extractor = ModelExtractor::new(provider.clone(), config);

        extractor.extract("same text", &[FactCategory::Fees]).await;
        extractor.extract("same text", &[FactCategory::Fees]).await;

        assert_eq!(provider.call_count(), 2);
    }
}
