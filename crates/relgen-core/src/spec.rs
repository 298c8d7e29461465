//! Resolved table specification.
//!
//! [`TableSpec`] is the per-table view a generation job works from: which
//! fields form the primary key, where foreign keys come from, and which
//! fields carry plain data. Output columns are always laid out as index
//! fields, then foreign fields, then data fields.

use crate::schema::{GeneratorSchema, SchemaError};

/// Where a table's foreign-key values come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForeignKeySource {
    /// No foreign relationship; no foreign columns in the output.
    None,

    /// Keys are loaded from another table's completed output file.
    Table {
        /// Referenced table name
        table: String,
        /// Referenced table's index fields
        fields: Vec<String>,
    },

    /// The table references itself, forming a root/child hierarchy.
    SelfReference {
        /// This table's own index fields
        fields: Vec<String>,
    },
}

/// Static description of one table, validated against its schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSpec {
    /// Table name
    pub name: String,

    /// Primary key fields; may be empty
    pub index_fields: Vec<String>,

    /// Foreign key relationship
    pub foreign: ForeignKeySource,

    /// Non-key fields
    pub data_fields: Vec<String>,
}

impl TableSpec {
    /// Resolve a table's specification from the schema.
    ///
    /// Fails if the table is undefined, if its foreign table is undefined,
    /// or if the foreign table declares no index fields.
    pub fn resolve(schema: &GeneratorSchema, table: &str) -> Result<Self, SchemaError> {
        let definition = schema
            .get_table(table)
            .ok_or_else(|| SchemaError::TableNotFound(table.to_string()))?;

        let foreign = match definition.foreign_table.as_deref() {
            None => ForeignKeySource::None,
            Some(foreign_table) => {
                let referenced = schema.get_table(foreign_table).ok_or_else(|| {
                    SchemaError::ForeignTableNotFound {
                        table: table.to_string(),
                        foreign_table: foreign_table.to_string(),
                    }
                })?;

                if referenced.index_fields.is_empty() {
                    return Err(SchemaError::ForeignTableWithoutPrimaryKey {
                        table: table.to_string(),
                        foreign_table: foreign_table.to_string(),
                    });
                }

                if foreign_table == table {
                    ForeignKeySource::SelfReference {
                        fields: referenced.index_fields.clone(),
                    }
                } else {
                    ForeignKeySource::Table {
                        table: foreign_table.to_string(),
                        fields: referenced.index_fields.clone(),
                    }
                }
            }
        };

        Ok(Self {
            name: definition.name.clone(),
            index_fields: definition.index_fields.clone(),
            foreign,
            data_fields: definition.data_fields.clone(),
        })
    }

    /// Foreign field names; empty when there is no foreign relationship.
    pub fn foreign_fields(&self) -> &[String] {
        match &self.foreign {
            ForeignKeySource::None => &[],
            ForeignKeySource::Table { fields, .. } | ForeignKeySource::SelfReference { fields } => {
                fields
            }
        }
    }

    /// The other table this one depends on, if any.
    ///
    /// Self-referential tables have no external dependency.
    pub fn dependency(&self) -> Option<&str> {
        match &self.foreign {
            ForeignKeySource::Table { table, .. } => Some(table),
            _ => None,
        }
    }

    /// Whether this table references its own keys.
    pub fn is_self_referential(&self) -> bool {
        matches!(self.foreign, ForeignKeySource::SelfReference { .. })
    }

    /// Output column names: index fields, foreign fields, data fields.
    pub fn column_names(&self) -> Vec<&str> {
        self.index_fields
            .iter()
            .chain(self.foreign_fields())
            .chain(&self.data_fields)
            .map(String::as_str)
            .collect()
    }

    /// Fields whose values are produced by field generators.
    ///
    /// Foreign fields are never generated; they are copied from keys.
    pub fn generated_fields(&self) -> impl Iterator<Item = &str> {
        self.index_fields
            .iter()
            .chain(&self.data_fields)
            .map(String::as_str)
    }
}
