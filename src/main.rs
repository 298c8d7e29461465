//! Command-line interface for relgen
//!
//! # Usage Examples
//!
//! ```bash
//! # Generate every table of the schema plan into ./out
//! relgen populate --schema schema.yaml --output-dir out
//!
//! # Explicit row counts, smaller chunks, deterministic output
//! relgen populate --schema schema.yaml \
//!   --rows empresas=100000 --rows funcionarios=1000000 \
//!   --chunk-size 5000 --seed 42
//!
//! # Regenerate one table whose dependency output already exists
//! relgen populate --schema schema.yaml --tables funcionarios --row-count 1000
//!
//! # Validate schema and plan only
//! relgen populate --schema schema.yaml --dry-run
//! ```

use clap::{Parser, Subcommand};
use relgen::run_populate;
use relgen_populate_csv::PopulateArgs;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "relgen")]
#[command(about = "Generate relational test data as CSV files")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate CSV files for the tables of a schema
    Populate {
        #[command(flatten)]
        args: PopulateArgs,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Populate { args } => {
            run_populate(args).await?;
        }
    }

    Ok(())
}
