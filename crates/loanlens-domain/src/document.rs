//! Documents and per-document fact sets

use std::collections::BTreeMap;
use std::fmt;

use crate::fact::ExtractedFact;
use crate::key::FactKey;

/// Identifier for a source document, assigned by the caller
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(String);

impl DocumentId {
    /// Create a document id
    ///
    /// # Errors
    /// Returns an error if the id is empty after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, String> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err("Document id cannot be empty".to_string());
        }
        Ok(Self(value))
    }

    /// Get the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Display label for the lender a document belongs to
///
/// Either a registry bank name or the cleaned filename stem when no known
/// bank was detected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BankName(String);

impl BankName {
    /// Create a bank label; blank input becomes `"Unknown"`
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            Self("Unknown".to_string())
        } else {
            Self(trimmed.to_string())
        }
    }

    /// Get the label as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BankName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Raw input handed to the extraction pipeline by the collaborator that
/// decoded the document (PDF/TXT/DOCX handling stays outside the core)
#[derive(Debug, Clone)]
pub struct DocumentInput {
    /// Caller-assigned identifier, typically the filename
    pub id: DocumentId,
    /// Bank label declared by the caller, if any
    pub declared_bank: Option<String>,
    /// Decoded document text
    pub text: String,
}

impl DocumentInput {
    /// Create a new input
    pub fn new(id: DocumentId, text: impl Into<String>) -> Self {
        Self {
            id,
            declared_bank: None,
            text: text.into(),
        }
    }

    /// Declare the bank label explicitly, bypassing detection
    pub fn with_declared_bank(mut self, bank: impl Into<String>) -> Self {
        self.declared_bank = Some(bank.into());
        self
    }
}

/// A document as held by a [`DocumentStore`](crate::traits::DocumentStore)
#[derive(Debug, Clone)]
pub struct StoredDocument {
    /// Document identifier
    pub id: DocumentId,
    /// Resolved bank label
    pub bank_name: BankName,
    /// Decoded document text
    pub text: String,
}

/// All facts extracted from one document, unique per key
///
/// Created empty at ingestion, populated by the hybrid coordinator, and
/// treated as immutable once handed to the comparator (which only ever
/// borrows it).
#[derive(Debug, Clone)]
pub struct DocumentFactSet {
    /// Source document identifier
    pub document_id: DocumentId,
    /// Detected or assigned bank label
    pub bank_name: BankName,
    /// Facts keyed by canonical fact key; iteration order is deterministic
    pub facts: BTreeMap<FactKey, ExtractedFact>,
}

impl DocumentFactSet {
    /// Create an empty fact set for a document
    pub fn new(document_id: DocumentId, bank_name: BankName) -> Self {
        Self {
            document_id,
            bank_name,
            facts: BTreeMap::new(),
        }
    }

    /// Insert a fact, replacing any previous fact under the same key
    ///
    /// Returns the replaced fact, if any.
    pub fn insert(&mut self, fact: ExtractedFact) -> Option<ExtractedFact> {
        self.facts.insert(fact.key.clone(), fact)
    }

    /// Look up a fact by key
    pub fn get(&self, key: &FactKey) -> Option<&ExtractedFact> {
        self.facts.get(key)
    }

    /// Whether a key is present
    pub fn contains_key(&self, key: &FactKey) -> bool {
        self.facts.contains_key(key)
    }

    /// Iterate keys in deterministic (lexicographic) order
    pub fn keys(&self) -> impl Iterator<Item = &FactKey> {
        self.facts.keys()
    }

    /// Iterate facts in deterministic key order
    pub fn iter(&self) -> impl Iterator<Item = &ExtractedFact> {
        self.facts.values()
    }

    /// Number of facts
    pub fn len(&self) -> usize {
        self.facts.len()
    }

    /// Whether the set holds no facts
    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}
