//! Error types for table generation jobs.

use relgen_core::SchemaError;
use relgen_generator::GeneratorError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while generating a table.
#[derive(Error, Debug)]
pub enum PopulateError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Schema-related error.
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Generator error.
    #[error("Generator error: {0}")]
    Generator(#[from] GeneratorError),

    /// Chunk size must be at least one row.
    #[error("Chunk size must be greater than zero")]
    InvalidChunkSize,

    /// Table declares no index, foreign or data fields.
    #[error("Table '{0}' has no columns")]
    NoColumns(String),

    /// Referenced table's output file does not exist.
    #[error("Foreign key file for table '{table}' not found: {}", path.display())]
    ForeignFileMissing { table: String, path: PathBuf },

    /// Referenced table's output file lacks a foreign column.
    #[error("Column '{column}' not found in header of {}", path.display())]
    ForeignColumnMissing { path: PathBuf, column: String },

    /// Rows remain to be written but there is nothing to reference.
    #[error("Table '{table}' needs foreign keys but '{foreign_table}' has no rows")]
    EmptyForeignPool { table: String, foreign_table: String },
}
