//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and
//! infrastructure. Implementations live in other crates.

use std::fmt;

use crate::document::{DocumentFactSet, DocumentId, StoredDocument};

/// Trait for the external language-model capability
///
/// Implemented by the infrastructure layer (loanlens-llm). The signature is
/// synchronous; async providers adapt internally and the extractor isolates
/// calls on a blocking task under a timeout, so a slow provider can never
/// wedge the pipeline.
pub trait ModelProvider {
    /// Error type for provider operations
    type Error: fmt::Display;

    /// Generate a completion for a prompt
    fn generate(&self, prompt: &str) -> Result<String, Self::Error>;
}

/// Trait for process-lifetime document/result storage
///
/// Owned by the collaborator layer; the extraction and comparison core never
/// touches a store. Implemented by loanlens-store.
pub trait DocumentStore {
    /// Error type for store operations
    type Error;

    /// Insert a document; fails on duplicate id
    fn insert_document(&mut self, document: StoredDocument) -> Result<(), Self::Error>;

    /// Fetch a document by id
    fn get_document(&self, id: &DocumentId) -> Result<Option<StoredDocument>, Self::Error>;

    /// Insert (or replace) the extraction result for a document
    fn insert_fact_set(&mut self, facts: DocumentFactSet) -> Result<(), Self::Error>;

    /// Fetch the extraction result for a document
    fn get_fact_set(&self, id: &DocumentId) -> Result<Option<DocumentFactSet>, Self::Error>;

    /// List stored document ids in insertion order
    fn list_documents(&self) -> Result<Vec<DocumentId>, Self::Error>;

    /// Drop all stored documents and results
    fn clear(&mut self) -> Result<(), Self::Error>;
}
