//! LoanLens CLI library.
//!
//! Wires the extraction pipeline, comparator, and report assembly behind two
//! commands (`extract`, `compare`) with table, JSON, and quiet output.

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;

pub use cli::{Cli, CliFormat, Command};
pub use error::{CliError, Result};
pub use output::Formatter;
