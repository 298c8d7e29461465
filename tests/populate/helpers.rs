//! Shared helpers for populate tests.

use relgen_populate_csv::PopulateArgs;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub const FIXTURE_SCHEMA: &str = "tests/fixtures/relgen_schema.yaml";

pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter("relgen=debug,relgen_populate_csv=debug")
        .try_init()
        .ok();
}

pub fn populate_args(output_dir: &Path) -> PopulateArgs {
    PopulateArgs {
        schema: PathBuf::from(FIXTURE_SCHEMA),
        output_dir: output_dir.to_path_buf(),
        rows: Vec::new(),
        row_count: None,
        chunk_size: None,
        seed: None,
        tables: Vec::new(),
        max_parallel: 0,
        append: false,
        dry_run: false,
    }
}

/// Header and rows of a generated file.
pub fn read_csv(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .from_path(path)
        .unwrap_or_else(|e| panic!("Failed to open {}: {e}", path.display()));
    let header = reader.headers().unwrap().iter().map(String::from).collect();
    let rows = reader
        .records()
        .map(|record| record.unwrap().iter().map(String::from).collect())
        .collect();
    (header, rows)
}

/// Distinct values of one column.
pub fn column_values(rows: &[Vec<String>], column: usize) -> HashSet<String> {
    rows.iter().map(|row| row[column].clone()).collect()
}
