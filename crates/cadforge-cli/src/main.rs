//! Cadforge CLI
//!
//! Command-line driver for a cadforge modeling session

use clap::{Parser, Subcommand};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "cadforge")]
#[command(about = "Cadforge - agent-driven CAD command execution", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the operation catalog
    Catalog(commands::catalog::CatalogArgs),
    /// Execute a command script against a fresh document
    Run(commands::run::RunArgs),
}

fn main() {
    cadforge_core::logging::init(cadforge_core::logging::Profile::Development);

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Catalog(args) => commands::catalog::execute(args),
        Commands::Run(args) => commands::run::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
