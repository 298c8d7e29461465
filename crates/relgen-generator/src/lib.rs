//! Field value generators for relgen.
//!
//! This crate turns the `fields` section of a [`relgen_core::GeneratorSchema`]
//! into a [`FieldRegistry`]: a map from field name to a stateful
//! [`FieldGenerator`] that yields one value per call.
//!
//! # Example
//!
//! ```rust
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use relgen_core::GeneratorSchema;
//! use relgen_generator::FieldRegistry;
//!
//! let schema = GeneratorSchema::from_yaml(r#"
//! fields:
//!   - name: email
//!     generator:
//!       type: pattern
//!       pattern: "user_{index}@example.com"
//! tables: []
//! "#).unwrap();
//!
//! let mut registry = FieldRegistry::from_schema(&schema, ["email"]).unwrap();
//! let mut rng = StdRng::seed_from_u64(42);
//! let value = registry.generate("email", &mut rng).unwrap();
//! assert_eq!(value.to_csv_field(), "user_0@example.com");
//! ```
//!
//! # Generators
//!
//! - `uuid_v4` - Random UUID v4
//! - `sequential` - Sequential integers
//! - `pattern` - Pattern strings with placeholders (`{index}`, `{uuid}`, `{rand:N}`)
//! - `int_range` - Random integers in a range
//! - `float_range` - Random floats in a range
//! - `decimal_range` - Random decimals in a range
//! - `timestamp_range` - Random timestamps in a date range
//! - `date_range` - Random calendar dates in a range
//! - `timestamp_now` - Wall-clock time of generation
//! - `weighted_bool` - Boolean with configurable true probability
//! - `one_of` - Random selection from a list
//! - `static` - Static value
//! - `null` - Null value

pub mod generators;
pub mod registry;

// Re-exports for convenience
pub use generators::{GeneratorKind, ValueGenerator};
pub use registry::{FieldGenerator, FieldRegistry, GeneratorError};
