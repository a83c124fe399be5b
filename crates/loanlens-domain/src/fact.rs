//! Extracted facts - the fundamental unit of a disclosure comparison

use std::fmt;

use crate::confidence::Confidence;
use crate::key::FactKey;

/// Sentinel for values that are present as a field but carry no content.
/// Never an empty string, so absence can't silently compare equal to it.
pub const MISSING_VALUE: &str = "(missing)";

/// Which extraction path produced a fact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtractionMethod {
    /// Matched by the rule-based pattern catalog
    Pattern,
    /// Returned by the external language model
    Model,
    /// Corroborated by both paths during the hybrid merge
    Merged,
}

impl ExtractionMethod {
    /// Method name as a string
    pub fn as_str(&self) -> &str {
        match self {
            ExtractionMethod::Pattern => "pattern",
            ExtractionMethod::Model => "model",
            ExtractionMethod::Merged => "merged",
        }
    }
}

impl fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A disagreeing value retained alongside the primary one after a merge
/// conflict, so reports can show both signals.
#[derive(Debug, Clone, PartialEq)]
pub struct SecondaryEvidence {
    /// The value that lost the conflict resolution
    pub value: String,
    /// Evidence span the losing value came from
    pub source_text: String,
    /// Which path produced the losing value
    pub method: ExtractionMethod,
}

/// One disclosed term extracted from a document
///
/// Facts are immutable once created; the hybrid coordinator builds merged
/// facts as new values rather than mutating inputs. The normalized value is
/// derived deterministically from the raw value, so two facts with the same
/// raw value always compare equal regardless of which extractor found them.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedFact {
    /// Canonical `section.field` key
    pub key: FactKey,

    /// Original matched/returned text
    pub raw_value: String,

    /// Canonical comparable form of the value
    pub normalized_value: String,

    /// Extraction confidence, validated to [0, 1]
    pub confidence: Confidence,

    /// Exact evidence span copied from the document
    pub source_text: String,

    /// Best-effort locator into the source document (character offsets,
    /// `~start-end` form); absent when the source gave none
    pub source_reference: Option<String>,

    /// Which extraction path produced this fact
    pub method: ExtractionMethod,

    /// Set when the extractors disagreed on this field during the merge
    pub conflict: bool,

    /// The disagreeing value and its source, kept for display
    pub secondary: Option<SecondaryEvidence>,
}

impl ExtractedFact {
    /// Create a new fact
    ///
    /// # Errors
    /// Returns an error if the raw or normalized value is empty after
    /// trimming. Evidence may legitimately be empty (some model responses
    /// omit it); callers substitute the raw value in that case.
    pub fn new(
        key: FactKey,
        raw_value: impl Into<String>,
        normalized_value: impl Into<String>,
        confidence: Confidence,
        source_text: impl Into<String>,
        method: ExtractionMethod,
    ) -> Result<Self, String> {
        let raw_value = raw_value.into();
        let normalized_value = normalized_value.into();
        let source_text = source_text.into();
        if raw_value.trim().is_empty() {
            return Err(format!("Fact {} has an empty raw value", key));
        }
        if normalized_value.trim().is_empty() {
            return Err(format!("Fact {} has an empty normalized value", key));
        }
        let source_text = if source_text.trim().is_empty() {
            raw_value.clone()
        } else {
            source_text
        };
        Ok(Self {
            key,
            raw_value,
            normalized_value,
            confidence,
            source_text,
            source_reference: None,
            method,
            conflict: false,
            secondary: None,
        })
    }

    /// Attach a source locator
    pub fn with_source_reference(mut self, reference: impl Into<String>) -> Self {
        self.source_reference = Some(reference.into());
        self
    }

    /// Mark this fact as conflicted
    pub fn with_conflict(mut self) -> Self {
        self.conflict = true;
        self
    }

    /// Attach the disagreeing value from the losing extraction path
    pub fn with_secondary(mut self, secondary: SecondaryEvidence) -> Self {
        self.secondary = Some(secondary);
        self
    }

    /// Replace the confidence score, keeping everything else
    pub fn with_confidence(mut self, confidence: Confidence) -> Self {
        self.confidence = confidence;
        self
    }

    /// Whether the value is the explicit missing sentinel
    pub fn is_missing_value(&self) -> bool {
        self.normalized_value == MISSING_VALUE
    }
}
