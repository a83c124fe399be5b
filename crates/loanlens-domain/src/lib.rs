//! LoanLens Domain Layer
//!
//! This crate contains the core business logic and domain model for LoanLens.
//! It has no dependencies beyond `uuid` and defines the fundamental concepts,
//! value objects, and trait interfaces that all other layers depend upon.
//!
//! ## Key Concepts
//!
//! - **ExtractedFact**: One disclosed term pulled from a document, with
//!   confidence and evidence
//! - **FactKey**: Dotted `section.field` identifier, canonicalized across
//!   extraction sources
//! - **DocumentFactSet**: All facts for one document, unique per key
//! - **ComparisonMatrix**: Side-by-side classification of 2-4 fact sets
//! - **BankRegistry**: Known lender labels detected from filenames and text
//!
//! ## Architecture
//!
//! - Pure business logic only
//! - Validation happens at construction; downstream code trusts the types
//! - Infrastructure implementations (model providers, stores) live in other
//!   crates behind the traits defined here

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bank;
pub mod comparison;
pub mod confidence;
pub mod document;
pub mod fact;
pub mod key;
pub mod traits;

// Re-exports for convenience
pub use bank::BankRegistry;
pub use comparison::{ComparisonCell, ComparisonId, ComparisonMatrix, ComparisonStatus};
pub use confidence::{Confidence, ConfidenceBand};
pub use document::{BankName, DocumentFactSet, DocumentId, DocumentInput, StoredDocument};
pub use fact::{ExtractedFact, ExtractionMethod, SecondaryEvidence, MISSING_VALUE};
pub use key::{FactCategory, FactKey};
