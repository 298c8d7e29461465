//! CLI argument definitions for table population.

use crate::sink::OutputMode;
use clap::Args;
use std::path::PathBuf;

/// Row count requested for one table on the command line (`TABLE=N`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowOverride {
    pub table: String,
    pub rows: u64,
}

/// Parse a `TABLE=N` row override.
pub fn parse_row_override(value: &str) -> Result<RowOverride, String> {
    let (table, rows) = value
        .split_once('=')
        .ok_or_else(|| format!("expected TABLE=ROWS, got '{value}'"))?;

    let table = table.trim();
    if table.is_empty() {
        return Err(format!("missing table name in '{value}'"));
    }

    let rows = rows
        .trim()
        .parse::<u64>()
        .map_err(|e| format!("invalid row count in '{value}': {e}"))?;

    Ok(RowOverride {
        table: table.to_string(),
        rows,
    })
}

/// Arguments of the populate command.
#[derive(Args, Clone, Debug)]
pub struct PopulateArgs {
    /// Path to schema YAML file
    #[arg(long, short = 's')]
    pub schema: PathBuf,

    /// Output directory for CSV files (one file per table)
    #[arg(long, short = 'o', default_value = ".")]
    pub output_dir: PathBuf,

    /// Rows for a specific table, as TABLE=N (repeatable, overrides the schema plan)
    #[arg(long = "rows", value_name = "TABLE=N", value_parser = parse_row_override)]
    pub rows: Vec<RowOverride>,

    /// Number of rows for tables without an explicit count
    #[arg(long)]
    pub row_count: Option<u64>,

    /// Rows generated and flushed per chunk
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Random seed for deterministic generation (overrides the schema seed)
    #[arg(long, env = "RELGEN_SEED")]
    pub seed: Option<u64>,

    /// Specific tables to populate (comma-separated, empty = whole plan)
    #[arg(long, value_delimiter = ',')]
    pub tables: Vec<String>,

    /// Maximum number of tables generating at once (0 = unbounded)
    #[arg(long, default_value = "0")]
    pub max_parallel: usize,

    /// Append to existing output files instead of replacing them
    #[arg(long)]
    pub append: bool,

    /// Dry-run mode: validate schema and plan without writing files
    #[arg(long)]
    pub dry_run: bool,
}

impl PopulateArgs {
    pub fn output_mode(&self) -> OutputMode {
        if self.append {
            OutputMode::Append
        } else {
            OutputMode::Replace
        }
    }
}
