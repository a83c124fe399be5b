//! The compare command: 2-4 documents in, a comparison report out.

use loanlens_comparator::Comparator;
use loanlens_domain::traits::DocumentStore;
use loanlens_domain::{DocumentFactSet, StoredDocument};
use loanlens_store::MemoryStore;
use tracing::info;

use crate::cli::{Cli, CompareArgs};
use crate::commands::{build_coordinator, read_documents};
use crate::error::Result;
use crate::output::Formatter;

/// Execute the compare command, returning the rendered output.
pub async fn execute_compare(args: CompareArgs, cli: &Cli, formatter: &Formatter) -> Result<String> {
    let inputs = read_documents(&args.files, &cli.banks)?;
    let coordinator = build_coordinator(cli)?;

    let results = coordinator.process_batch(inputs.clone()).await;

    let mut store = MemoryStore::new();
    for (input, facts) in inputs.iter().zip(&results) {
        store.insert_document(StoredDocument {
            id: input.id.clone(),
            bank_name: facts.bank_name.clone(),
            text: input.text.clone(),
        })?;
        store.insert_fact_set(facts.clone())?;
    }

    let fact_sets: Vec<DocumentFactSet> = store
        .list_documents()?
        .iter()
        .filter_map(|id| store.get_fact_set(id).ok().flatten())
        .collect();

    let matrix = Comparator::new().compare(&fact_sets)?;
    info!(
        comparison = %matrix.id,
        documents = matrix.document_count(),
        terms = matrix.cells.len(),
        "comparison complete"
    );

    let report = loanlens_report::assemble(&matrix);
    formatter.format_report(&report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::CliFormat;
    use crate::error::CliError;
    use clap::Parser;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_doc(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    fn plain_cli() -> Cli {
        Cli::parse_from(["loanlens", "compare", "a.txt", "b.txt"])
    }

    #[tokio::test]
    async fn test_compare_two_documents_json() {
        let a = temp_doc("HDFC Bank\nProcessing Fee: 0.50% of loan amount.\nTenure: up to 30 years.");
        let b = temp_doc("ICICI Bank\nProcessing Fee: 1.00% of loan amount.");

        let args = CompareArgs {
            files: vec![a.path().to_path_buf(), b.path().to_path_buf()],
        };
        let formatter = Formatter::new(CliFormat::Json, false);

        let output = execute_compare(args, &plain_cli(), &formatter).await.unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(json["documents"][0]["bank"], "HDFC Bank");
        assert_eq!(json["documents"][1]["bank"], "ICICI Bank");

        let rows = json["rows"].as_array().unwrap();
        let fee_row = rows
            .iter()
            .find(|r| r["key"] == "fees.processing_fee")
            .unwrap();
        assert_eq!(fee_row["status"], "different");

        let tenure_row = rows
            .iter()
            .find(|r| r["key"] == "tenure.maximum_tenure")
            .unwrap();
        assert_eq!(tenure_row["status"], "missing");
    }

    #[tokio::test]
    async fn test_compare_table_contains_summary() {
        let a = temp_doc("HDFC Bank\nProcessing Fee: 0.50% of loan amount.");
        let b = temp_doc("ICICI Bank\nProcessing Fee: 0.50% of loan amount.");

        let args = CompareArgs {
            files: vec![a.path().to_path_buf(), b.path().to_path_buf()],
        };
        let formatter = Formatter::new(CliFormat::Table, false);

        let output = execute_compare(args, &plain_cli(), &formatter).await.unwrap();
        assert!(output.contains("fees.processing_fee"));
        assert!(output.contains("1 same"));
    }

    #[tokio::test]
    async fn test_compare_single_document_is_rejected() {
        let a = temp_doc("HDFC Bank\nProcessing Fee: 0.50%");

        let args = CompareArgs {
            files: vec![a.path().to_path_buf()],
        };
        let formatter = Formatter::new(CliFormat::Table, false);

        let result = execute_compare(args, &plain_cli(), &formatter).await;
        assert!(matches!(result, Err(CliError::Compare(_))));
    }

    #[tokio::test]
    async fn test_compare_quiet_prints_comparison_id() {
        let a = temp_doc("Processing Fee: 0.50% of loan amount.");
        let b = temp_doc("Processing Fee: 0.75% of loan amount.");

        let args = CompareArgs {
            files: vec![a.path().to_path_buf(), b.path().to_path_buf()],
        };
        let formatter = Formatter::new(CliFormat::Quiet, false);

        let output = execute_compare(args, &plain_cli(), &formatter).await.unwrap();
        // UUID string form
        assert_eq!(output.split('-').count(), 5);
    }
}
