//! LoanLens Comparison Engine
//!
//! Classifies extracted fact sets from 2-4 documents into a side-by-side
//! matrix. Comparison works on the union of all fact keys, so a term one
//! bank discloses and another omits surfaces as Missing instead of silently
//! dropping out.
//!
//! Status precedence per key: Missing > Suspect > Different > Same. A key
//! absent anywhere is Missing regardless of how the present values relate;
//! a present-everywhere key with a merge conflict or a low-confidence
//! contribution is Suspect even when the values agree.

#![warn(missing_docs)]

use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;
use tracing::debug;

use loanlens_domain::{
    ComparisonCell, ComparisonId, ComparisonMatrix, ComparisonStatus, DocumentFactSet,
    ExtractedFact, FactKey,
};

/// Minimum number of documents a comparison needs
pub const MIN_DOCUMENTS: usize = 2;

/// Maximum number of documents a comparison accepts
pub const MAX_DOCUMENTS: usize = 4;

/// Facts below this confidence make their cell Suspect
pub const DEFAULT_LOW_CONFIDENCE_THRESHOLD: f64 = 0.4;

/// Errors from comparison setup
#[derive(Error, Debug)]
pub enum CompareError {
    /// Fewer than [`MIN_DOCUMENTS`] fact sets were supplied
    #[error("Comparison needs at least {MIN_DOCUMENTS} documents, got {got}")]
    InsufficientDocuments {
        /// How many fact sets were supplied
        got: usize,
    },

    /// More than [`MAX_DOCUMENTS`] fact sets were supplied
    #[error("Comparison accepts at most {MAX_DOCUMENTS} documents, got {got}")]
    TooManyDocuments {
        /// How many fact sets were supplied
        got: usize,
    },
}

/// Tunable comparison policy
#[derive(Debug, Clone)]
pub struct ComparatorConfig {
    /// Confidence below which a contributing fact taints its cell
    pub low_confidence_threshold: f64,
}

impl Default for ComparatorConfig {
    fn default() -> Self {
        Self {
            low_confidence_threshold: DEFAULT_LOW_CONFIDENCE_THRESHOLD,
        }
    }
}

/// Compares fact sets into a [`ComparisonMatrix`]
#[derive(Debug, Clone, Default)]
pub struct Comparator {
    config: ComparatorConfig,
}

impl Comparator {
    /// Create a comparator with the default policy
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a comparator with an explicit policy
    pub fn with_config(config: ComparatorConfig) -> Self {
        Self { config }
    }

    /// Compare 2-4 fact sets
    ///
    /// Documents keep the caller's order in the matrix; cells come out in
    /// lexicographic key order. The same inputs always produce the same
    /// matrix apart from its id.
    ///
    /// # Errors
    /// Returns an error if fewer than 2 or more than 4 fact sets are given.
    pub fn compare(&self, fact_sets: &[DocumentFactSet]) -> Result<ComparisonMatrix, CompareError> {
        if fact_sets.len() < MIN_DOCUMENTS {
            return Err(CompareError::InsufficientDocuments {
                got: fact_sets.len(),
            });
        }
        if fact_sets.len() > MAX_DOCUMENTS {
            return Err(CompareError::TooManyDocuments {
                got: fact_sets.len(),
            });
        }

        let all_keys: BTreeSet<&FactKey> =
            fact_sets.iter().flat_map(|set| set.keys()).collect();
        debug!(
            documents = fact_sets.len(),
            keys = all_keys.len(),
            "comparing fact sets"
        );

        let cells = all_keys
            .into_iter()
            .map(|key| self.classify(key, fact_sets))
            .collect();

        Ok(ComparisonMatrix {
            id: ComparisonId::new(),
            document_ids: fact_sets.iter().map(|s| s.document_id.clone()).collect(),
            bank_names: fact_sets.iter().map(|s| s.bank_name.clone()).collect(),
            cells,
        })
    }

    /// Classify one key across all documents
    fn classify(&self, key: &FactKey, fact_sets: &[DocumentFactSet]) -> ComparisonCell {
        let facts: Vec<Option<&ExtractedFact>> =
            fact_sets.iter().map(|set| set.get(key)).collect();

        let (status, explanation) = self.status_for(&facts, fact_sets);

        ComparisonCell {
            key: key.clone(),
            status,
            values_by_document: fact_sets
                .iter()
                .zip(&facts)
                .map(|(set, fact)| {
                    (
                        set.document_id.clone(),
                        fact.map(|f| f.normalized_value.clone()),
                    )
                })
                .collect(),
            explanation,
            evidence_by_document: fact_sets
                .iter()
                .zip(&facts)
                .map(|(set, fact)| (set.document_id.clone(), fact.cloned()))
                .collect(),
        }
    }

    /// Apply the status precedence and build the matching rationale
    fn status_for(
        &self,
        facts: &[Option<&ExtractedFact>],
        fact_sets: &[DocumentFactSet],
    ) -> (ComparisonStatus, String) {
        let bank = |i: usize| fact_sets[i].bank_name.as_str();

        let absent: Vec<&str> = facts
            .iter()
            .enumerate()
            .filter(|(_, f)| f.is_none())
            .map(|(i, _)| bank(i))
            .collect();
        if !absent.is_empty() {
            return (
                ComparisonStatus::Missing,
                format!("Not disclosed by {}", absent.join(", ")),
            );
        }

        let conflicted: Vec<&str> = facts
            .iter()
            .enumerate()
            .filter(|(_, f)| f.is_some_and(|f| f.conflict))
            .map(|(i, _)| bank(i))
            .collect();
        if !conflicted.is_empty() {
            return (
                ComparisonStatus::Suspect,
                format!(
                    "Extraction sources disagreed for {}",
                    conflicted.join(", ")
                ),
            );
        }

        let threshold = self.config.low_confidence_threshold;
        let shaky: Vec<&str> = facts
            .iter()
            .enumerate()
            .filter(|(_, f)| f.is_some_and(|f| f.confidence.is_below(threshold)))
            .map(|(i, _)| bank(i))
            .collect();
        if !shaky.is_empty() {
            return (
                ComparisonStatus::Suspect,
                format!(
                    "Low extraction confidence for {}",
                    shaky.join(", ")
                ),
            );
        }

        // Group banks by value; insertion into a BTreeMap keeps the
        // explanation deterministic regardless of document order.
        let mut by_value: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for (i, fact) in facts.iter().enumerate() {
            if let Some(fact) = fact {
                by_value
                    .entry(fact.normalized_value.as_str())
                    .or_default()
                    .push(bank(i));
            }
        }

        if by_value.len() == 1 {
            let value = by_value
                .keys()
                .next()
                .map(|v| (*v).to_string())
                .unwrap_or_default();
            (
                ComparisonStatus::Same,
                format!("All {} banks report {}", facts.len(), value),
            )
        } else {
            let detail = by_value
                .iter()
                .map(|(value, banks)| format!("{}: {}", banks.join(", "), value))
                .collect::<Vec<_>>()
                .join("; ");
            (ComparisonStatus::Different, detail)
        }
    }
}
