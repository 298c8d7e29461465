//! Schema definitions for relgen.
//!
//! A schema file describes three things:
//!
//! - `fields` - every field name used by any table, with its generator config
//! - `tables` - each table's index (primary key) fields, optional foreign
//!   table and data fields
//! - `plan` - optional default run plan (table, row count, chunk size)
//!
//! Field definitions are shared between tables: a table lists field names
//! and the generator is looked up by name.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

// ============================================================================
// Error Types
// ============================================================================

/// Error type for schema operations.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Error reading schema file
    #[error("Failed to read schema file: {0}")]
    IoError(#[from] std::io::Error),

    /// Error parsing YAML
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Table not found in schema
    #[error("Table not found: {0}")]
    TableNotFound(String),

    /// Foreign table referenced by a table is not defined
    #[error("Table '{table}' references undefined foreign table '{foreign_table}'")]
    ForeignTableNotFound {
        table: String,
        foreign_table: String,
    },

    /// Foreign table exists but declares no index fields to reference
    #[error("Table '{table}' references '{foreign_table}', which has no primary key fields")]
    ForeignTableWithoutPrimaryKey {
        table: String,
        foreign_table: String,
    },

    /// Table defined more than once
    #[error("Table '{0}' is defined more than once")]
    DuplicateTable(String),

    /// Field defined more than once
    #[error("Field '{0}' is defined more than once")]
    DuplicateField(String),
}

// ============================================================================
// Generator Configuration
// ============================================================================

/// Generator configuration for a field.
///
/// This enum defines the different types of value generators available
/// for producing field values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GeneratorConfig {
    /// Generate UUIDs (v4)
    UuidV4,

    /// Generate sequential integers
    Sequential {
        /// Starting value
        #[serde(default)]
        start: i64,
    },

    /// Generate values using a pattern with placeholders
    Pattern {
        /// Pattern string (supports {index}, {uuid}, {rand:N})
        pattern: String,
    },

    /// Generate random integers in a range
    IntRange {
        /// Minimum value (inclusive)
        min: i64,
        /// Maximum value (inclusive)
        max: i64,
    },

    /// Generate random floats in a range
    FloatRange {
        /// Minimum value (inclusive)
        min: f64,
        /// Maximum value (inclusive)
        max: f64,
    },

    /// Generate random decimals in a range
    DecimalRange {
        /// Minimum value (inclusive)
        min: f64,
        /// Maximum value (inclusive)
        max: f64,
        /// Digits after the decimal point
        #[serde(default = "default_decimal_scale")]
        scale: u8,
    },

    /// Generate timestamps in a range
    TimestampRange {
        /// Start timestamp (RFC 3339 or YYYY-MM-DD)
        start: String,
        /// End timestamp (RFC 3339 or YYYY-MM-DD)
        end: String,
    },

    /// Generate calendar dates in a range
    DateRange {
        /// Start date (YYYY-MM-DD)
        start: String,
        /// End date (YYYY-MM-DD)
        end: String,
    },

    /// Generate current timestamp at generation time
    ///
    /// Not deterministic: each value is the wall-clock time it was produced.
    TimestampNow,

    /// Generate weighted boolean values
    WeightedBool {
        /// Weight for true value (0.0 to 1.0)
        true_weight: f64,
    },

    /// Generate random selection from a pool of values
    OneOf {
        /// Pool of values to select from
        values: Vec<serde_yaml::Value>,
    },

    /// Generate a static value
    Static {
        /// The static value to use
        value: serde_yaml::Value,
    },

    /// Generate null values
    Null,
}

fn default_decimal_scale() -> u8 {
    2
}

// ============================================================================
// Schema Types
// ============================================================================

/// Field with generator config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Field name, referenced from table definitions
    pub name: String,

    /// Generator configuration for this field
    pub generator: GeneratorConfig,
}

/// Table layout: index fields, optional foreign table, data fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableDefinition {
    /// Table name (also the output file stem)
    pub name: String,

    /// Primary key fields; may be empty
    #[serde(default)]
    pub index_fields: Vec<String>,

    /// Referenced table, or this table's own name for a hierarchy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign_table: Option<String>,

    /// Non-key fields
    #[serde(default)]
    pub data_fields: Vec<String>,
}

/// One entry of the default run plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanEntry {
    /// Table to generate
    pub table: String,

    /// Requested row count
    pub rows: u64,

    /// Rows generated and flushed per chunk
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_size: Option<usize>,
}

fn default_version() -> u32 {
    1
}

/// Full generator schema.
///
/// Loaded from a YAML file; JSON documents are accepted as well since YAML
/// is a superset of JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorSchema {
    /// Schema version
    #[serde(default = "default_version")]
    pub version: u32,

    /// Seed for deterministic generation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Field definitions with generators
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,

    /// Table definitions
    pub tables: Vec<TableDefinition>,

    /// Default run plan
    #[serde(default)]
    pub plan: Vec<PlanEntry>,

    /// Cached table lookup (not serialized)
    #[serde(skip)]
    table_map: HashMap<String, usize>,

    /// Cached field lookup (not serialized)
    #[serde(skip)]
    field_map: HashMap<String, usize>,
}

impl GeneratorSchema {
    /// Load schema from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SchemaError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse schema from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, SchemaError> {
        let mut schema: GeneratorSchema = serde_yaml::from_str(yaml)?;
        schema.build_lookup_maps()?;
        Ok(schema)
    }

    /// Build the internal table and field lookup maps.
    fn build_lookup_maps(&mut self) -> Result<(), SchemaError> {
        self.table_map.clear();
        for (idx, table) in self.tables.iter().enumerate() {
            if self.table_map.insert(table.name.clone(), idx).is_some() {
                return Err(SchemaError::DuplicateTable(table.name.clone()));
            }
        }

        self.field_map.clear();
        for (idx, field) in self.fields.iter().enumerate() {
            if self.field_map.insert(field.name.clone(), idx).is_some() {
                return Err(SchemaError::DuplicateField(field.name.clone()));
            }
        }

        Ok(())
    }

    /// Get a table definition by name.
    pub fn get_table(&self, name: &str) -> Option<&TableDefinition> {
        self.table_map
            .get(name)
            .and_then(|&idx| self.tables.get(idx))
    }

    /// Get a field definition by name.
    pub fn get_field(&self, name: &str) -> Option<&FieldDefinition> {
        self.field_map
            .get(name)
            .and_then(|&idx| self.fields.get(idx))
    }

    /// Get all table names in the schema.
    pub fn table_names(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.name.as_str()).collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
