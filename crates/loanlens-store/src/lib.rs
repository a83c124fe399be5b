//! LoanLens Document Store
//!
//! Process-lifetime storage behind the [`DocumentStore`] trait. A comparison
//! run ingests a handful of documents, extracts, compares, reports, and
//! exits, so the only implementation is in-memory; anything durable would
//! outlive its usefulness.

#![warn(missing_docs)]

use std::collections::HashMap;

use thiserror::Error;
use tracing::debug;

use loanlens_domain::traits::DocumentStore;
use loanlens_domain::{DocumentFactSet, DocumentId, StoredDocument};

/// Errors from store operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// A document with this id is already stored
    #[error("Document already stored: {0}")]
    DuplicateDocument(String),

    /// No document with this id is stored
    #[error("Document not found: {0}")]
    NotFound(String),
}

/// In-memory [`DocumentStore`] implementation
///
/// Listing preserves insertion order, so reports come out in the order the
/// caller supplied the documents.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: HashMap<DocumentId, StoredDocument>,
    fact_sets: HashMap<DocumentId, DocumentFactSet>,
    insertion_order: Vec<DocumentId>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl DocumentStore for MemoryStore {
    type Error = StoreError;

    fn insert_document(&mut self, document: StoredDocument) -> Result<(), Self::Error> {
        if self.documents.contains_key(&document.id) {
            return Err(StoreError::DuplicateDocument(
                document.id.as_str().to_string(),
            ));
        }
        debug!(document = %document.id, bank = %document.bank_name, "storing document");
        self.insertion_order.push(document.id.clone());
        self.documents.insert(document.id.clone(), document);
        Ok(())
    }

    fn get_document(&self, id: &DocumentId) -> Result<Option<StoredDocument>, Self::Error> {
        Ok(self.documents.get(id).cloned())
    }

    fn insert_fact_set(&mut self, facts: DocumentFactSet) -> Result<(), Self::Error> {
        if !self.documents.contains_key(&facts.document_id) {
            return Err(StoreError::NotFound(
                facts.document_id.as_str().to_string(),
            ));
        }
        self.fact_sets.insert(facts.document_id.clone(), facts);
        Ok(())
    }

    fn get_fact_set(&self, id: &DocumentId) -> Result<Option<DocumentFactSet>, Self::Error> {
        Ok(self.fact_sets.get(id).cloned())
    }

    fn list_documents(&self) -> Result<Vec<DocumentId>, Self::Error> {
        Ok(self.insertion_order.clone())
    }

    fn clear(&mut self) -> Result<(), Self::Error> {
        self.documents.clear();
        self.fact_sets.clear();
        self.insertion_order.clear();
        Ok(())
    }
}
