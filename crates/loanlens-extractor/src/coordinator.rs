//! Hybrid extraction coordination
//!
//! Runs the instantaneous pattern pass first, asks the model only about
//! high-value categories the patterns left empty, then merges the two fact
//! streams under a pattern-biased policy: patterns are deterministic and
//! auditable, so when the streams disagree the pattern value survives and
//! carries the disagreement as evidence.

use std::collections::BTreeSet;
use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use loanlens_domain::traits::ModelProvider;
use loanlens_domain::{
    BankName, BankRegistry, Confidence, DocumentFactSet, DocumentId, DocumentInput,
    ExtractedFact, ExtractionMethod, FactCategory, SecondaryEvidence,
};

use crate::catalog;
use crate::config::{ExtractorConfig, CONFLICT_CONFIDENCE_FLOOR};
use crate::error::ExtractError;
use crate::model::ModelExtractor;
use crate::rules::PatternExtractor;

/// Orchestrates pattern and model extraction for whole documents
pub struct HybridCoordinator<P> {
    patterns: PatternExtractor,
    model: Option<ModelExtractor<P>>,
    registry: BankRegistry,
    config: ExtractorConfig,
}

impl<P> HybridCoordinator<P>
where
    P: ModelProvider + Send + Sync + 'static,
{
    /// Create a coordinator with model-backed gap filling
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid.
    pub fn new(provider: P, config: ExtractorConfig) -> Result<Self, ExtractError> {
        config.validate().map_err(ExtractError::Config)?;
        Ok(Self {
            patterns: PatternExtractor::new(),
            model: Some(ModelExtractor::new(provider, config.clone())),
            registry: BankRegistry::new(),
            config,
        })
    }

    /// Create a coordinator that never calls a model
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid.
    pub fn pattern_only(config: ExtractorConfig) -> Result<Self, ExtractError> {
        config.validate().map_err(ExtractError::Config)?;
        Ok(Self {
            patterns: PatternExtractor::new(),
            model: None,
            registry: BankRegistry::new(),
            config,
        })
    }

    /// Extract all facts from one document
    ///
    /// Never fails: the pattern pass always runs, and model problems degrade
    /// to pattern-only results.
    pub async fn process(&self, input: DocumentInput) -> DocumentFactSet {
        let text = cap_text(&input.text, self.config.max_text_length);
        let bank = self
            .registry
            .resolve(input.declared_bank.as_deref(), input.id.as_str(), text);

        let pattern_facts = self.patterns.extract(text);
        debug!(
            document = %input.id,
            facts = pattern_facts.len(),
            "pattern pass complete"
        );

        let model_facts = match &self.model {
            Some(model) => {
                let gaps = gap_categories(&pattern_facts);
                if gaps.is_empty() {
                    debug!(document = %input.id, "no high-value gaps, skipping model");
                    Vec::new()
                } else {
                    info!(
                        document = %input.id,
                        categories = ?gaps.iter().map(|c| c.as_str()).collect::<Vec<_>>(),
                        "asking model about gap categories"
                    );
                    model.extract(text, &gaps).await
                }
            }
            None => Vec::new(),
        };

        self.merge(input.id, bank, pattern_facts, model_facts)
    }

    /// Extract several documents concurrently, preserving input order
    pub async fn process_batch(
        self: &Arc<Self>,
        inputs: Vec<DocumentInput>,
    ) -> Vec<DocumentFactSet> {
        let mut tasks = JoinSet::new();
        for (index, input) in inputs.into_iter().enumerate() {
            let coordinator = Arc::clone(self);
            tasks.spawn(async move { (index, coordinator.process(input).await) });
        }

        let mut results = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(indexed) => results.push(indexed),
                Err(e) => warn!(error = %e, "document task failed"),
            }
        }
        results.sort_by_key(|(index, _)| *index);
        results.into_iter().map(|(_, facts)| facts).collect()
    }

    /// Merge pattern and model facts for one document
    ///
    /// Pattern facts are the base. Model facts fill gaps; where both streams
    /// cover a key, agreement upgrades the fact to [`ExtractionMethod::Merged`]
    /// at the higher confidence, and disagreement keeps the pattern value with
    /// a confidence penalty and the model's value attached as secondary
    /// evidence.
    pub fn merge(
        &self,
        document_id: DocumentId,
        bank: BankName,
        pattern_facts: Vec<ExtractedFact>,
        model_facts: Vec<ExtractedFact>,
    ) -> DocumentFactSet {
        let mut set = DocumentFactSet::new(document_id, bank);
        for fact in pattern_facts {
            set.insert(fact);
        }

        for model_fact in model_facts {
            let Some(existing) = set.get(&model_fact.key).cloned() else {
                set.insert(model_fact);
                continue;
            };

            if existing.normalized_value == model_fact.normalized_value {
                let confidence = existing.confidence.max(model_fact.confidence);
                let mut corroborated = existing.with_confidence(confidence);
                corroborated.method = ExtractionMethod::Merged;
                set.insert(corroborated);
            } else {
                debug!(
                    key = %model_fact.key,
                    pattern = %existing.normalized_value,
                    model = %model_fact.normalized_value,
                    "extraction conflict, keeping pattern value"
                );
                let penalized = (existing.confidence.value() - self.config.conflict_penalty)
                    .max(CONFLICT_CONFIDENCE_FLOOR);
                let conflicted = existing
                    .with_confidence(Confidence::clamped(penalized))
                    .with_conflict()
                    .with_secondary(SecondaryEvidence {
                        value: model_fact.normalized_value,
                        source_text: model_fact.source_text,
                        method: ExtractionMethod::Model,
                    });
                set.insert(conflicted);
            }
        }

        set
    }
}

/// Categories containing a high-value field the pattern pass missed
///
/// Only these are worth a model call; template-prone sections (LTV tables,
/// eligibility boxes) stay pattern-only.
fn gap_categories(pattern_facts: &[ExtractedFact]) -> Vec<FactCategory> {
    let found: BTreeSet<&str> = pattern_facts.iter().map(|f| f.key.as_str()).collect();

    let mut gaps = Vec::new();
    for key in catalog::high_value_keys() {
        if found.contains(key.as_str()) {
            continue;
        }
        if let Some(category) = key.category() {
            if !gaps.contains(&category) {
                gaps.push(category);
            }
        }
    }
    gaps
}

/// Clamp document text to the configured length at a character boundary
fn cap_text(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => {
            warn!(
                length = text.len(),
                max = max_chars,
                "document exceeds text cap, truncating"
            );
            &text[..byte_index]
        }
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loanlens_domain::FactKey;
    use loanlens_llm::MockProvider;

    fn doc_id(s: &str) -> DocumentId {
        DocumentId::new(s).unwrap()
    }

    fn fact(key: &str, normalized: &str, confidence: f64, method: ExtractionMethod) -> ExtractedFact {
        ExtractedFact::new(
            FactKey::new(key).unwrap(),
            normalized,
            normalized,
            Confidence::new(confidence).unwrap(),
            "evidence",
            method,
        )
        .unwrap()
    }

    fn coordinator() -> HybridCoordinator<MockProvider> {
        HybridCoordinator::pattern_only(ExtractorConfig::default()).unwrap()
    }

    #[test]
    fn test_merge_fills_gaps_from_model() {
        let merged = coordinator().merge(
            doc_id("doc"),
            BankName::new("HDFC Bank"),
            vec![fact("fees.processing_fee", "0.5", 0.9, ExtractionMethod::Pattern)],
            vec![fact("grievance.contact", "care@bank.in", 0.6, ExtractionMethod::Model)],
        );

        assert_eq!(merged.len(), 2);
        let filled = merged.get(&FactKey::new("grievance.contact").unwrap()).unwrap();
        assert_eq!(filled.method, ExtractionMethod::Model);
    }

    #[test]
    fn test_merge_agreement_upgrades_to_merged() {
        let merged = coordinator().merge(
            doc_id("doc"),
            BankName::new("HDFC Bank"),
            vec![fact("fees.processing_fee", "0.5", 0.7, ExtractionMethod::Pattern)],
            vec![fact("fees.processing_fee", "0.5", 0.8, ExtractionMethod::Model)],
        );

        let fact = merged.get(&FactKey::new("fees.processing_fee").unwrap()).unwrap();
        assert_eq!(fact.method, ExtractionMethod::Merged);
        assert_eq!(fact.confidence.value(), 0.8);
        assert!(!fact.conflict);
    }

    #[test]
    fn test_merge_conflict_keeps_pattern_value_with_penalty() {
        let merged = coordinator().merge(
            doc_id("doc"),
            BankName::new("HDFC Bank"),
            vec![fact("fees.processing_fee", "0.5", 0.9, ExtractionMethod::Pattern)],
            vec![fact("fees.processing_fee", "1", 0.8, ExtractionMethod::Model)],
        );

        let fact = merged.get(&FactKey::new("fees.processing_fee").unwrap()).unwrap();
        assert_eq!(fact.normalized_value, "0.5");
        assert!(fact.conflict);
        assert!((fact.confidence.value() - 0.7).abs() < 1e-9);

        let secondary = fact.secondary.as_ref().unwrap();
        assert_eq!(secondary.value, "1");
        assert_eq!(secondary.method, ExtractionMethod::Model);
    }

    #[test]
    fn test_merge_penalty_is_floored() {
        let merged = coordinator().merge(
            doc_id("doc"),
            BankName::new("HDFC Bank"),
            vec![fact("fees.processing_fee", "0.5", 0.1, ExtractionMethod::Pattern)],
            vec![fact("fees.processing_fee", "1", 0.8, ExtractionMethod::Model)],
        );

        let fact = merged.get(&FactKey::new("fees.processing_fee").unwrap()).unwrap();
        assert_eq!(fact.confidence.value(), CONFLICT_CONFIDENCE_FLOOR);
    }

    #[test]
    fn test_gap_categories_only_high_value() {
        // An empty pattern pass leaves every high-value category open, but
        // never the template-prone ones.
        let gaps = gap_categories(&[]);
        assert!(gaps.contains(&FactCategory::Fees));
        assert!(gaps.contains(&FactCategory::Grievance));
        assert!(!gaps.contains(&FactCategory::Ltv));
        assert!(!gaps.contains(&FactCategory::Eligibility));
        assert!(!gaps.contains(&FactCategory::Tenure));
    }

    #[test]
    fn test_gap_categories_close_when_all_fields_found() {
        let facts: Vec<ExtractedFact> = ["interest_rate", "benchmark_rate", "benchmark_spread", "reset_frequency"]
            .iter()
            .map(|field| {
                fact(
                    &format!("interest_rates.{}", field),
                    "8.5",
                    0.9,
                    ExtractionMethod::Pattern,
                )
            })
            .collect();

        let gaps = gap_categories(&facts);
        assert!(!gaps.contains(&FactCategory::InterestRates));
        // Other high-value categories stay open.
        assert!(gaps.contains(&FactCategory::Fees));
    }

    #[test]
    fn test_cap_text_char_boundary() {
        let text = "₹₹₹₹₹";
        assert_eq!(cap_text(text, 3), "₹₹₹");
        assert_eq!(cap_text(text, 10), text);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = ExtractorConfig {
            prompt_window: 0,
            ..ExtractorConfig::default()
        };
        assert!(matches!(
            HybridCoordinator::<MockProvider>::pattern_only(config),
            Err(ExtractError::Config(_))
        ));
    }
}
