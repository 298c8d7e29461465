//! Per-table CSV generation for relgen.
//!
//! A [`GenerationJob`] produces one table's `<table>.csv` file: it builds a
//! unique primary key index up front, acquires a foreign key pool from the
//! referenced table's output (or from its own keys for self-referential
//! tables), then generates and flushes data in chunks.
//!
//! # Example
//!
//! ```ignore
//! use relgen_core::GeneratorSchema;
//! use relgen_populate_csv::{GenerationJob, JobOptions};
//!
//! let schema = GeneratorSchema::from_file("schema.yaml")?;
//! let options = JobOptions { seed: Some(42), ..Default::default() };
//!
//! let report = GenerationJob::new(&schema, "empresas", 1000, options)?.run()?;
//! println!("{} rows written", report.rows_written);
//! ```

pub mod args;
mod chunk;
mod error;
mod foreign;
mod job;
mod keys;
mod sink;

pub use args::{parse_row_override, PopulateArgs, RowOverride};
pub use chunk::{generate_data_columns, shuffle_columns, RowChunk};
pub use error::PopulateError;
pub use foreign::{ForeignKeyPool, CSV_DELIMITER, TREE_ROOT_PROPORTION};
pub use job::{
    table_seed, GenerationJob, JobOptions, JobPhase, JobReport, KeyedJob, StreamingJob,
    DEFAULT_CHUNK_SIZE,
};
pub use keys::{build_key_index, KeyBuild, KeyIndex, KeyRow, MAX_INDEX_RETRIES};
pub use sink::{prepare_output, table_output_path, CsvSink, OutputMode, DEFAULT_BUFFER_SIZE};
