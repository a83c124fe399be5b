//! LoanLens Report Assembly
//!
//! Flattens a [`ComparisonMatrix`] into serializable report shapes. The
//! domain types stay presentation-free; this crate decides what a consumer
//! of the comparison (JSON export, terminal table) actually sees: values,
//! confidence, extraction method, trimmed evidence, and per-status counts.

#![warn(missing_docs)]

use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use loanlens_domain::{ComparisonMatrix, ComparisonStatus, ExtractedFact, MISSING_VALUE};

/// Evidence snippets are trimmed to this many characters in reports
pub const SNIPPET_MAX_CHARS: usize = 100;

/// A complete, serializable comparison report
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    /// Comparison run identifier (UUID string form)
    pub comparison_id: String,
    /// Seconds since the Unix epoch at assembly time
    pub generated_at: u64,
    /// Participating documents, in comparison order
    pub documents: Vec<DocumentLabel>,
    /// Per-status counts and the agreement ratio
    pub summary: Summary,
    /// One row per compared fact key, in key order
    pub rows: Vec<ReportRow>,
}

/// A participating document and its bank label
#[derive(Debug, Clone, Serialize)]
pub struct DocumentLabel {
    /// Document identifier
    pub id: String,
    /// Resolved bank label
    pub bank: String,
}

/// Aggregate view of a comparison
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    /// Number of compared fact keys
    pub total_terms: usize,
    /// Keys where all documents agree
    pub same: usize,
    /// Keys where all documents disclose but values diverge
    pub different: usize,
    /// Keys absent from at least one document
    pub missing: usize,
    /// Keys tainted by conflicts or low confidence
    pub suspect: usize,
    /// `same / total_terms`, 0 for an empty comparison
    pub agreement_ratio: f64,
}

/// One compared fact key across all documents
#[derive(Debug, Clone, Serialize)]
pub struct ReportRow {
    /// Full `section.field` key
    pub key: String,
    /// Section component of the key
    pub section: String,
    /// Field component of the key
    pub field: String,
    /// Status in lowercase wire form
    pub status: String,
    /// Deterministic rationale for the status
    pub explanation: String,
    /// Per-document entries, in comparison order
    pub entries: Vec<ReportEntry>,
}

/// One document's contribution to a report row
#[derive(Debug, Clone, Serialize)]
pub struct ReportEntry {
    /// Document identifier
    pub document_id: String,
    /// Bank label
    pub bank: String,
    /// Normalized value, absent when the document lacks the fact
    pub value: Option<String>,
    /// Extraction confidence
    pub confidence: Option<f64>,
    /// Extraction method in lowercase wire form
    pub method: Option<String>,
    /// Trimmed evidence span
    pub snippet: Option<String>,
    /// Source locator (`~start-end` character offsets), when known
    pub reference: Option<String>,
    /// Whether the extraction sources disagreed on this value
    pub conflict: bool,
    /// The disagreeing value, when a conflict was recorded
    pub secondary_value: Option<String>,
}

/// Build a report from a comparison matrix
pub fn assemble(matrix: &ComparisonMatrix) -> ComparisonReport {
    let same = matrix.count_status(ComparisonStatus::Same);
    let total = matrix.cells.len();

    let documents: Vec<DocumentLabel> = matrix
        .document_ids
        .iter()
        .zip(&matrix.bank_names)
        .map(|(id, bank)| DocumentLabel {
            id: id.as_str().to_string(),
            bank: bank.as_str().to_string(),
        })
        .collect();

    let rows = matrix
        .cells
        .iter()
        .map(|cell| ReportRow {
            key: cell.key.as_str().to_string(),
            section: cell.key.section().to_string(),
            field: cell.key.field().to_string(),
            status: cell.status.as_str().to_string(),
            explanation: cell.explanation.clone(),
            entries: cell
                .evidence_by_document
                .iter()
                .map(|(id, fact)| {
                    let bank = matrix
                        .bank_for(id)
                        .map(|b| b.as_str().to_string())
                        .unwrap_or_default();
                    entry(id.as_str(), bank, fact.as_ref())
                })
                .collect(),
        })
        .collect();

    ComparisonReport {
        comparison_id: matrix.id.to_string(),
        generated_at: unix_now(),
        documents,
        summary: Summary {
            total_terms: total,
            same,
            different: matrix.count_status(ComparisonStatus::Different),
            missing: matrix.count_status(ComparisonStatus::Missing),
            suspect: matrix.count_status(ComparisonStatus::Suspect),
            agreement_ratio: if total == 0 {
                0.0
            } else {
                same as f64 / total as f64
            },
        },
        rows,
    }
}

impl ComparisonReport {
    /// Flatten to display records: a header row, then one row per key with
    /// the status, each document's value, and the explanation
    pub fn to_records(&self) -> Vec<Vec<String>> {
        let mut header = vec!["Term".to_string(), "Status".to_string()];
        header.extend(self.documents.iter().map(|d| d.bank.clone()));
        header.push("Notes".to_string());

        let mut records = vec![header];
        for row in &self.rows {
            let mut record = vec![row.key.clone(), capitalize(&row.status)];
            record.extend(row.entries.iter().map(|entry| {
                entry.value.clone().unwrap_or_else(|| MISSING_VALUE.to_string())
            }));
            record.push(row.explanation.clone());
            records.push(record);
        }
        records
    }
}

fn entry(document_id: &str, bank: String, fact: Option<&ExtractedFact>) -> ReportEntry {
    match fact {
        Some(fact) => ReportEntry {
            document_id: document_id.to_string(),
            bank,
            value: Some(fact.normalized_value.clone()),
            confidence: Some(fact.confidence.value()),
            method: Some(fact.method.as_str().to_string()),
            snippet: Some(trim_snippet(&fact.source_text)),
            reference: fact.source_reference.clone(),
            conflict: fact.conflict,
            secondary_value: fact.secondary.as_ref().map(|s| s.value.clone()),
        },
        None => ReportEntry {
            document_id: document_id.to_string(),
            bank,
            value: None,
            confidence: None,
            method: None,
            snippet: None,
            reference: None,
            conflict: false,
            secondary_value: None,
        },
    }
}

fn trim_snippet(text: &str) -> String {
    if text.chars().count() <= SNIPPET_MAX_CHARS {
        text.to_string()
    } else {
        let mut trimmed: String = text.chars().take(SNIPPET_MAX_CHARS).collect();
        trimmed.push('…');
        trimmed
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
