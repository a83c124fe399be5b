//! The extract command: one document in, its fact set out.

use loanlens_domain::traits::DocumentStore;
use loanlens_domain::StoredDocument;
use loanlens_store::MemoryStore;
use tracing::info;

use crate::cli::{Cli, ExtractArgs};
use crate::commands::{build_coordinator, read_documents};
use crate::error::{CliError, Result};
use crate::output::Formatter;

/// Execute the extract command, returning the rendered output.
pub async fn execute_extract(args: ExtractArgs, cli: &Cli, formatter: &Formatter) -> Result<String> {
    let inputs = read_documents(&[&args.file], &cli.banks)?;
    let coordinator = build_coordinator(cli)?;

    let mut results = coordinator.process_batch(inputs.clone()).await;
    let facts = results
        .pop()
        .ok_or_else(|| CliError::InvalidInput("extraction produced no result".to_string()))?;
    info!(document = %facts.document_id, facts = facts.len(), "extraction complete");

    let mut store = MemoryStore::new();
    let input = &inputs[0];
    store.insert_document(StoredDocument {
        id: input.id.clone(),
        bank_name: facts.bank_name.clone(),
        text: input.text.clone(),
    })?;
    store.insert_fact_set(facts.clone())?;

    formatter.format_fact_set(&facts)
}
