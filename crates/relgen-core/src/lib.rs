//! Core types for the relgen table generator.
//!
//! This crate provides the foundational types shared by the generator and
//! the populators:
//!
//! - [`GeneratorSchema`] - Table and field definitions loaded from YAML
//! - [`TableSpec`] - A single table's resolved key/foreign/data layout
//! - [`GeneratedValue`] - Raw values produced by field generators
//!
//! # Architecture
//!
//! ```text
//! relgen-core (this crate)
//!    │
//!    ├─── relgen-generator      (field generators, keyed by field name)
//!    │
//!    └─── relgen-populate-csv   (generation job and CSV output)
//! ```
//!
//! # Example
//!
//! ```rust
//! use relgen_core::{GeneratorSchema, TableSpec};
//!
//! let schema = GeneratorSchema::from_yaml(r#"
//! fields:
//!   - name: id
//!     generator:
//!       type: sequential
//!       start: 1
//! tables:
//!   - name: users
//!     index_fields: [id]
//! "#).unwrap();
//!
//! let spec = TableSpec::resolve(&schema, "users").unwrap();
//! assert_eq!(spec.column_names(), vec!["id"]);
//! ```

pub mod schema;
pub mod spec;
pub mod values;

// Re-exports for convenience
pub use schema::{
    FieldDefinition, GeneratorConfig, GeneratorSchema, PlanEntry, SchemaError, TableDefinition,
};
pub use spec::{ForeignKeySource, TableSpec};
pub use values::GeneratedValue;
