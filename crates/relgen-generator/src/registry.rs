//! Field generator registry.
//!
//! Maps field names to stateful generators. Each [`FieldGenerator`] counts
//! the values it has produced, so `sequential` and `{index}` keep advancing
//! across every call made for that field during a job, including retried
//! key batches.

use crate::generators::{generate_value, GeneratorKind, ValueGenerator};
use rand::Rng;
use relgen_core::{FieldDefinition, GeneratedValue, GeneratorSchema, TableSpec};
use std::collections::HashMap;

/// Error type for generator operations.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// No generator defined for the field
    #[error("No generator defined for field '{0}'")]
    UnknownField(String),

    /// Generator configuration is invalid
    #[error("Invalid generator for field '{field}': {reason}")]
    InvalidConfig { field: String, reason: String },
}

/// Generator for a single field, with fixed construction-time parameters.
#[derive(Debug, Clone)]
pub struct FieldGenerator {
    kind: GeneratorKind,
    produced: u64,
}

impl FieldGenerator {
    /// Compile a field definition into a generator.
    pub fn new(definition: &FieldDefinition) -> Result<Self, GeneratorError> {
        let kind = GeneratorKind::compile(&definition.generator).map_err(|reason| {
            GeneratorError::InvalidConfig {
                field: definition.name.clone(),
                reason,
            }
        })?;

        Ok(Self {
            kind,
            produced: 0,
        })
    }

    /// Number of values produced so far.
    pub fn produced(&self) -> u64 {
        self.produced
    }

    /// Produce `count` values rendered as CSV fields.
    pub fn render_column<R: Rng>(&mut self, rng: &mut R, count: usize) -> Vec<String> {
        (0..count)
            .map(|_| self.next_value(rng).to_csv_field())
            .collect()
    }
}

impl ValueGenerator for FieldGenerator {
    fn next_value<R: Rng>(&mut self, rng: &mut R) -> GeneratedValue {
        let value = generate_value(&self.kind, rng, self.produced);
        self.produced += 1;
        value
    }
}

/// Registry of field generators keyed by field name.
#[derive(Debug, Clone, Default)]
pub struct FieldRegistry {
    generators: HashMap<String, FieldGenerator>,
}

impl FieldRegistry {
    /// Build generators for the given fields from the schema's definitions.
    ///
    /// Fails if any field has no definition or an invalid configuration.
    pub fn from_schema<'a, I>(schema: &GeneratorSchema, fields: I) -> Result<Self, GeneratorError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut generators = HashMap::new();

        for field in fields {
            if generators.contains_key(field) {
                continue;
            }
            let definition = schema
                .get_field(field)
                .ok_or_else(|| GeneratorError::UnknownField(field.to_string()))?;
            generators.insert(field.to_string(), FieldGenerator::new(definition)?);
        }

        Ok(Self { generators })
    }

    /// Build generators for every field a table generates (index and data).
    pub fn for_table(schema: &GeneratorSchema, spec: &TableSpec) -> Result<Self, GeneratorError> {
        Self::from_schema(schema, spec.generated_fields())
    }

    /// Get the generator for a field.
    pub fn get_mut(&mut self, field: &str) -> Result<&mut FieldGenerator, GeneratorError> {
        self.generators
            .get_mut(field)
            .ok_or_else(|| GeneratorError::UnknownField(field.to_string()))
    }

    /// Produce one value for a field.
    pub fn generate<R: Rng>(
        &mut self,
        field: &str,
        rng: &mut R,
    ) -> Result<GeneratedValue, GeneratorError> {
        Ok(self.get_mut(field)?.next_value(rng))
    }

    /// Produce `count` rendered values for a field.
    pub fn render_column<R: Rng>(
        &mut self,
        field: &str,
        rng: &mut R,
        count: usize,
    ) -> Result<Vec<String>, GeneratorError> {
        Ok(self.get_mut(field)?.render_column(rng, count))
    }

    /// Whether a generator exists for the field.
    pub fn contains(&self, field: &str) -> bool {
        self.generators.contains_key(field)
    }

    /// Number of registered fields.
    pub fn len(&self) -> usize {
        self.generators.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }
}
