//! Command execution.

mod compare;
mod extract;

pub use compare::execute_compare;
pub use extract::execute_extract;

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use loanlens_domain::{DocumentId, DocumentInput};
use loanlens_extractor::{ExtractorConfig, HybridCoordinator};
use loanlens_llm::OllamaProvider;

use crate::cli::Cli;
use crate::error::{CliError, Result};

/// Read input files into extraction inputs, pairing `--bank` labels with
/// files in order.
pub(crate) fn read_documents(files: &[impl AsRef<Path>], banks: &[String]) -> Result<Vec<DocumentInput>> {
    let mut seen = HashSet::new();
    let mut inputs = Vec::with_capacity(files.len());

    for (index, file) in files.iter().enumerate() {
        let path = file.as_ref();
        let name = path.to_string_lossy().to_string();
        if !seen.insert(name.clone()) {
            return Err(CliError::InvalidInput(format!(
                "duplicate document: {}",
                name
            )));
        }

        let text = fs::read_to_string(path)?;
        let id = DocumentId::new(name).map_err(CliError::InvalidInput)?;

        let mut input = DocumentInput::new(id, text);
        if let Some(bank) = banks.get(index) {
            input = input.with_declared_bank(bank);
        }
        inputs.push(input);
    }

    Ok(inputs)
}

/// Build the extraction coordinator from CLI flags: model-backed when an
/// endpoint is given, pattern-only otherwise.
pub(crate) fn build_coordinator(cli: &Cli) -> Result<Arc<HybridCoordinator<OllamaProvider>>> {
    let mut config = match &cli.config {
        Some(path) => {
            let toml_str = fs::read_to_string(path)?;
            ExtractorConfig::from_toml(&toml_str).map_err(CliError::InvalidInput)?
        }
        None => ExtractorConfig::default(),
    };
    if let Some(secs) = cli.timeout_secs {
        config.model_timeout_secs = secs;
    }

    let coordinator = match &cli.model_endpoint {
        Some(endpoint) => {
            let provider = OllamaProvider::new(endpoint.clone(), cli.model.clone())
                .with_timeout_secs(config.model_timeout_secs);
            HybridCoordinator::new(provider, config)?
        }
        None => HybridCoordinator::pattern_only(config)?,
    };
    Ok(Arc::new(coordinator))
}
