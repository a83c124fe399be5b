//! CLI command definitions and argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// LoanLens CLI - Compare loan disclosure documents side by side.
#[derive(Debug, Parser)]
#[command(name = "loanlens")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true, default_value = "table")]
    pub format: CliFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Extraction settings file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Model server endpoint (e.g. http://localhost:11434); omit to run
    /// pattern-only
    #[arg(long, global = true, env = "LOANLENS_MODEL_ENDPOINT")]
    pub model_endpoint: Option<String>,

    /// Model to use at the endpoint
    #[arg(long, global = true, default_value = "llama3")]
    pub model: String,

    /// Per-model-call timeout in seconds
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    /// Bank label for a document; repeat to label several, pairing with
    /// files in order. Unlabeled documents get detected labels.
    #[arg(long = "bank", global = true)]
    pub banks: Vec<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (minimal machine-friendly lines)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract structured facts from one document
    Extract(ExtractArgs),

    /// Compare 2-4 documents term by term
    Compare(CompareArgs),
}

/// Arguments for the extract command.
#[derive(Debug, Clone, Parser)]
pub struct ExtractArgs {
    /// Document to extract (plain text)
    pub file: PathBuf,
}

/// Arguments for the compare command.
#[derive(Debug, Clone, Parser)]
pub struct CompareArgs {
    /// Documents to compare (plain text), 2 to 4 of them
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_command() {
        let cli = Cli::parse_from(["loanlens", "extract", "hdfc_mitc.txt"]);
        match cli.command {
            Command::Extract(args) => assert_eq!(args.file, PathBuf::from("hdfc_mitc.txt")),
            _ => panic!("expected extract command"),
        }
        assert_eq!(cli.format, CliFormat::Table);
        assert!(cli.model_endpoint.is_none());
    }

    #[test]
    fn test_compare_command_with_banks() {
        let cli = Cli::parse_from([
            "loanlens",
            "compare",
            "a.txt",
            "b.txt",
            "--bank",
            "HDFC Bank",
            "--bank",
            "ICICI Bank",
            "--format",
            "json",
        ]);
        match cli.command {
            Command::Compare(args) => assert_eq!(args.files.len(), 2),
            _ => panic!("expected compare command"),
        }
        assert_eq!(cli.banks, vec!["HDFC Bank", "ICICI Bank"]);
        assert_eq!(cli.format, CliFormat::Json);
    }

    #[test]
    fn test_compare_requires_files() {
        assert!(Cli::try_parse_from(["loanlens", "compare"]).is_err());
    }

    #[test]
    fn test_command_args_clone_for_dispatch() {
        let cli = Cli::parse_from(["loanlens", "compare", "a.txt", "b.txt"]);
        let args = match &cli.command {
            Command::Compare(args) => args.clone(),
            _ => panic!("expected compare command"),
        };
        assert_eq!(args.files, vec![PathBuf::from("a.txt"), PathBuf::from("b.txt")]);
    }

    #[test]
    fn test_model_flags() {
        let cli = Cli::parse_from([
            "loanlens",
            "extract",
            "a.txt",
            "--model-endpoint",
            "http://localhost:11434",
            "--model",
            "mistral",
            "--timeout-secs",
            "60",
        ]);
        assert_eq!(cli.model_endpoint.as_deref(), Some("http://localhost:11434"));
        assert_eq!(cli.model, "mistral");
        assert_eq!(cli.timeout_secs, Some(60));
    }
}
