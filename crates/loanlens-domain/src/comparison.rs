//! Comparison results: cells, matrices, status classification

use std::fmt;

use crate::document::{BankName, DocumentId};
use crate::fact::ExtractedFact;
use crate::key::FactKey;

/// Unique identifier for a comparison run, based on UUIDv7
///
/// UUIDv7 keeps ids chronologically sortable, so a collaborator that logs or
/// lists comparisons gets creation order for free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ComparisonId(u128);

impl ComparisonId {
    /// Generate a new UUIDv7-based id
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Parse an id from its UUID string form
    ///
    /// # Errors
    /// Returns an error if the string is not a valid UUID.
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(|u| Self(u.as_u128()))
            .map_err(|e| format!("Invalid comparison id: {}", e))
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }

    /// Milliseconds since the Unix epoch, from the UUIDv7 timestamp bits
    pub fn timestamp(&self) -> u64 {
        (self.0 >> 80) as u64
    }
}

impl Default for ComparisonId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ComparisonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

/// Classification of one fact key across the compared documents
///
/// Precedence when several conditions hold: Missing > Suspect > Different >
/// Same. The comparator evaluates them in that order and takes the first
/// match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonStatus {
    /// All documents report the same normalized value
    Same,
    /// All documents report a value, but the values differ
    Different,
    /// At least one document lacks the fact while another has it
    Missing,
    /// A contributing fact carried a merge conflict or low confidence
    Suspect,
}

impl ComparisonStatus {
    /// Lowercase wire form
    pub fn as_str(&self) -> &str {
        match self {
            ComparisonStatus::Same => "same",
            ComparisonStatus::Different => "different",
            ComparisonStatus::Missing => "missing",
            ComparisonStatus::Suspect => "suspect",
        }
    }

    /// Capitalized label for display
    pub fn label(&self) -> &str {
        match self {
            ComparisonStatus::Same => "Same",
            ComparisonStatus::Different => "Different",
            ComparisonStatus::Missing => "Missing",
            ComparisonStatus::Suspect => "Suspect",
        }
    }
}

impl fmt::Display for ComparisonStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One row of the comparison: a fact key classified across all documents
///
/// Per-document entries are kept in matrix document order; `None` is the
/// explicit missing marker, never an empty string.
#[derive(Debug, Clone)]
pub struct ComparisonCell {
    /// The fact key being compared
    pub key: FactKey,
    /// Status classification for this key
    pub status: ComparisonStatus,
    /// Normalized value per document, `None` where the fact is absent
    pub values_by_document: Vec<(DocumentId, Option<String>)>,
    /// Deterministic human-readable rationale for the status
    pub explanation: String,
    /// Originating fact per document, `None` where the fact is absent
    pub evidence_by_document: Vec<(DocumentId, Option<ExtractedFact>)>,
}

impl ComparisonCell {
    /// Normalized value for one document, if present
    pub fn value_for(&self, id: &DocumentId) -> Option<&str> {
        self.values_by_document
            .iter()
            .find(|(doc, _)| doc == id)
            .and_then(|(_, value)| value.as_deref())
    }

    /// Originating fact for one document, if present
    pub fn evidence_for(&self, id: &DocumentId) -> Option<&ExtractedFact> {
        self.evidence_by_document
            .iter()
            .find(|(doc, _)| doc == id)
            .and_then(|(_, fact)| fact.as_ref())
    }
}

/// The full side-by-side comparison of 2-4 documents
///
/// Cells are ordered lexicographically by key; documents keep the caller's
/// order. Immutable once the comparator returns it.
#[derive(Debug, Clone)]
pub struct ComparisonMatrix {
    /// Identifier for this comparison run
    pub id: ComparisonId,
    /// Participating documents, in caller order
    pub document_ids: Vec<DocumentId>,
    /// Bank labels parallel to `document_ids`
    pub bank_names: Vec<BankName>,
    /// One cell per fact key in the union of all inputs
    pub cells: Vec<ComparisonCell>,
}

impl ComparisonMatrix {
    /// Number of participating documents
    pub fn document_count(&self) -> usize {
        self.document_ids.len()
    }

    /// Look up the cell for a key
    pub fn cell(&self, key: &FactKey) -> Option<&ComparisonCell> {
        self.cells.iter().find(|c| &c.key == key)
    }

    /// Count cells with the given status
    pub fn count_status(&self, status: ComparisonStatus) -> usize {
        self.cells.iter().filter(|c| c.status == status).count()
    }

    /// Bank label for a document id, if it participated
    pub fn bank_for(&self, id: &DocumentId) -> Option<&BankName> {
        self.document_ids
            .iter()
            .position(|d| d == id)
            .and_then(|i| self.bank_names.get(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comparison_id_roundtrip() {
        let id = ComparisonId::new();
        let parsed = ComparisonId::from_string(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_comparison_id_is_chronological() {
        let a = ComparisonId::new();
        let b = ComparisonId::new();
        assert!(a.timestamp() <= b.timestamp());
    }

    #[test]
    fn test_invalid_id_string() {
        assert!(ComparisonId::from_string("not-a-uuid").is_err());
    }

    #[test]
    fn test_status_strings() {
        assert_eq!(ComparisonStatus::Same.as_str(), "same");
        assert_eq!(ComparisonStatus::Suspect.label(), "Suspect");
    }

    #[test]
    fn test_cell_lookups() {
        let doc_a = DocumentId::new("a").unwrap();
        let doc_b = DocumentId::new("b").unwrap();
        let cell = ComparisonCell {
            key: FactKey::new("fees.processing_fee").unwrap(),
            status: ComparisonStatus::Missing,
            values_by_document: vec![
                (doc_a.clone(), Some("1".to_string())),
                (doc_b.clone(), None),
            ],
            explanation: "Missing from b".to_string(),
            evidence_by_document: vec![(doc_a.clone(), None), (doc_b.clone(), None)],
        };
        assert_eq!(cell.value_for(&doc_a), Some("1"));
        assert_eq!(cell.value_for(&doc_b), None);
    }
}
