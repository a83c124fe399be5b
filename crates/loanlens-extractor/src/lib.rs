//! LoanLens Extraction Pipeline
//!
//! Converts decoded MITC (Most Important Terms and Conditions) document text
//! into structured, normalized facts.
//!
//! # Architecture
//!
//! ```text
//! DocumentInput → PatternExtractor ─┐
//!                                   ├─ merge → DocumentFactSet
//!          gaps → ModelExtractor ───┘
//! ```
//!
//! The pattern pass is deterministic and free, so it always runs first. The
//! model is consulted only about high-value categories the patterns left
//! empty, and the merge is pattern-biased: a disagreement keeps the pattern
//! value and attaches the model's as secondary evidence. Model failures of
//! any kind degrade to pattern-only results.
//!
//! # Example Usage
//!
//! ```
//! use loanlens_domain::{DocumentId, DocumentInput};
//! use loanlens_extractor::{ExtractorConfig, HybridCoordinator};
//! use loanlens_llm::MockProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = MockProvider::new("[]");
//! let coordinator = HybridCoordinator::new(provider, ExtractorConfig::default())?;
//!
//! let input = DocumentInput::new(
//!     DocumentId::new("hdfc_mitc.txt")?,
//!     "Processing Fee: 0.50% of the loan amount.",
//! );
//! let facts = coordinator.process(input).await;
//!
//! println!("extracted {} facts for {}", facts.len(), facts.bank_name);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod catalog;
mod config;
mod coordinator;
mod error;
mod model;
mod parser;
mod prompt;
mod rules;


pub use config::{
    ExtractorConfig, CONFLICT_CONFIDENCE_FLOOR, DEFAULT_CONFLICT_PENALTY,
    DEFAULT_MAX_TEXT_LENGTH, DEFAULT_MODEL_CONFIDENCE, DEFAULT_MODEL_TIMEOUT_SECS,
    DEFAULT_PROMPT_WINDOW,
};
pub use coordinator::HybridCoordinator;
pub use error::ExtractError;
pub use model::ModelExtractor;
pub use rules::PatternExtractor;
