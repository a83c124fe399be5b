//! LoanLens CLI - Compare loan disclosure documents side by side.

use clap::Parser;
use loanlens_cli::commands;
use loanlens_cli::{Cli, Command, Formatter};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> loanlens_cli::Result<()> {
    let cli = Cli::parse();
    let formatter = Formatter::new(cli.format, !cli.no_color);

    let output = match &cli.command {
        Command::Extract(args) => {
            commands::execute_extract(args.clone(), &cli, &formatter).await?
        }
        Command::Compare(args) => {
            commands::execute_compare(args.clone(), &cli, &formatter).await?
        }
    };

    println!("{}", output);
    Ok(())
}
