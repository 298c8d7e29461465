//! relgen library
//!
//! Generates relational test data as `;`-delimited CSV files: unique primary
//! keys per table, foreign keys that reference another table's keys (or the
//! table's own keys, forming a root/child hierarchy), and independently
//! generated data columns.
//!
//! # Crates
//!
//! - `relgen_core` - schema model and table specifications
//! - `relgen_generator` - field value generators (used through `relgen_populate_csv`)
//! - `relgen_populate_csv` - per-table generation jobs
//!
//! # CLI Usage
//!
//! ```bash
//! # Generate every table of the schema plan
//! relgen populate --schema schema.yaml --output-dir out/
//!
//! # Override row counts and fix the seed
//! relgen populate --schema schema.yaml --rows empresas=1000 --rows funcionarios=50000 --seed 42
//! ```

pub mod populate;

pub use populate::{execute_plan, run_populate, PopulatePlan, RunSettings};
