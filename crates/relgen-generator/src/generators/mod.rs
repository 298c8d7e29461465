//! Individual value generators for different data types.
//!
//! A [`GeneratorConfig`] from the schema is compiled once into a
//! [`GeneratorKind`] (bounds parsed, pools converted) so producing a value
//! in the hot loop never re-parses configuration.

pub mod numeric;
pub mod pattern;
pub mod static_value;
pub mod timestamp;
pub mod uuid;

use chrono::NaiveDate;
use rand::Rng;
use relgen_core::{GeneratedValue, GeneratorConfig};

/// Trait for generating values.
pub trait ValueGenerator {
    /// Produce the next value using the given RNG.
    fn next_value<R: Rng>(&mut self, rng: &mut R) -> GeneratedValue;
}

/// Compiled generator: a validated [`GeneratorConfig`].
#[derive(Debug, Clone, PartialEq)]
pub enum GeneratorKind {
    UuidV4,
    Sequential { start: i64 },
    Pattern(String),
    IntRange { min: i64, max: i64 },
    FloatRange { min: f64, max: f64 },
    DecimalRange { min: f64, max: f64, scale: u8 },
    /// Bounds in Unix seconds
    TimestampRange { start: i64, end: i64 },
    DateRange { start: NaiveDate, end: NaiveDate },
    TimestampNow,
    WeightedBool { true_weight: f64 },
    OneOf(Vec<GeneratedValue>),
    Static(GeneratedValue),
    Null,
}

impl GeneratorKind {
    /// Validate a generator configuration and compile it.
    ///
    /// Returns a human-readable reason on failure.
    pub fn compile(config: &GeneratorConfig) -> Result<Self, String> {
        let kind = match config {
            GeneratorConfig::UuidV4 => Self::UuidV4,

            GeneratorConfig::Sequential { start } => Self::Sequential { start: *start },

            GeneratorConfig::Pattern { pattern } => Self::Pattern(pattern.clone()),

            GeneratorConfig::IntRange { min, max } => {
                if min > max {
                    return Err(format!("int_range min {min} is greater than max {max}"));
                }
                Self::IntRange {
                    min: *min,
                    max: *max,
                }
            }

            GeneratorConfig::FloatRange { min, max } => {
                check_float_bounds("float_range", *min, *max)?;
                Self::FloatRange {
                    min: *min,
                    max: *max,
                }
            }

            GeneratorConfig::DecimalRange { min, max, scale } => {
                check_float_bounds("decimal_range", *min, *max)?;
                Self::DecimalRange {
                    min: *min,
                    max: *max,
                    scale: *scale,
                }
            }

            GeneratorConfig::TimestampRange { start, end } => {
                let start_ts = timestamp::parse_timestamp(start)
                    .ok_or_else(|| format!("invalid timestamp_range start '{start}'"))?
                    .timestamp();
                let end_ts = timestamp::parse_timestamp(end)
                    .ok_or_else(|| format!("invalid timestamp_range end '{end}'"))?
                    .timestamp();
                if start_ts > end_ts {
                    return Err(format!("timestamp_range start '{start}' is after end '{end}'"));
                }
                Self::TimestampRange {
                    start: start_ts,
                    end: end_ts,
                }
            }

            GeneratorConfig::DateRange { start, end } => {
                let start_date = timestamp::parse_date(start)
                    .ok_or_else(|| format!("invalid date_range start '{start}'"))?;
                let end_date = timestamp::parse_date(end)
                    .ok_or_else(|| format!("invalid date_range end '{end}'"))?;
                if start_date > end_date {
                    return Err(format!("date_range start '{start}' is after end '{end}'"));
                }
                Self::DateRange {
                    start: start_date,
                    end: end_date,
                }
            }

            GeneratorConfig::TimestampNow => Self::TimestampNow,

            GeneratorConfig::WeightedBool { true_weight } => {
                if !(0.0..=1.0).contains(true_weight) {
                    return Err(format!(
                        "weighted_bool true_weight {true_weight} is outside 0.0..=1.0"
                    ));
                }
                Self::WeightedBool {
                    true_weight: *true_weight,
                }
            }

            GeneratorConfig::OneOf { values } => Self::OneOf(
                values
                    .iter()
                    .map(static_value::yaml_to_generated_value)
                    .collect::<Result<_, _>>()?,
            ),

            GeneratorConfig::Static { value } => {
                Self::Static(static_value::yaml_to_generated_value(value)?)
            }

            GeneratorConfig::Null => Self::Null,
        };

        Ok(kind)
    }
}

fn check_float_bounds(name: &str, min: f64, max: f64) -> Result<(), String> {
    if !min.is_finite() || !max.is_finite() {
        return Err(format!("{name} bounds must be finite"));
    }
    if min > max {
        return Err(format!("{name} min {min} is greater than max {max}"));
    }
    Ok(())
}

/// Generate a value from a compiled generator.
///
/// `index` is the number of values this generator has produced before,
/// used by `sequential` and the `{index}` pattern placeholder.
pub fn generate_value<R: Rng>(kind: &GeneratorKind, rng: &mut R, index: u64) -> GeneratedValue {
    match kind {
        GeneratorKind::UuidV4 => uuid::generate_uuid_v4(rng),

        GeneratorKind::Sequential { start } => {
            GeneratedValue::Int64(start.wrapping_add(index as i64))
        }

        GeneratorKind::Pattern(pattern) => pattern::generate_pattern(pattern, rng, index),

        GeneratorKind::IntRange { min, max } => numeric::generate_int_range(rng, *min, *max),

        GeneratorKind::FloatRange { min, max } => numeric::generate_float_range(rng, *min, *max),

        GeneratorKind::DecimalRange { min, max, scale } => {
            numeric::generate_decimal_range(rng, *min, *max, *scale)
        }

        GeneratorKind::TimestampRange { start, end } => {
            timestamp::generate_timestamp_range(rng, *start, *end)
        }

        GeneratorKind::DateRange { start, end } => {
            timestamp::generate_date_range(rng, *start, *end)
        }

        GeneratorKind::TimestampNow => timestamp::generate_timestamp_now(),

        GeneratorKind::WeightedBool { true_weight } => {
            GeneratedValue::Bool(rng.random_bool(*true_weight))
        }

        GeneratorKind::OneOf(values) => {
            if values.is_empty() {
                GeneratedValue::Null
            } else {
                let idx = rng.random_range(0..values.len());
                values[idx].clone()
            }
        }

        GeneratorKind::Static(value) => value.clone(),

        GeneratorKind::Null => GeneratedValue::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_compile_rejects_inverted_int_range() {
        let config = GeneratorConfig::IntRange { min: 10, max: 1 };
        assert!(GeneratorKind::compile(&config).is_err());
    }

    #[test]
    fn test_compile_rejects_bad_weight() {
        let config = GeneratorConfig::WeightedBool { true_weight: 1.5 };
        assert!(GeneratorKind::compile(&config).is_err());
    }

    #[test]
    fn test_compile_rejects_unparseable_timestamp() {
        let config = GeneratorConfig::TimestampRange {
            start: "yesterday".to_string(),
            end: "2024-01-01".to_string(),
        };
        let err = GeneratorKind::compile(&config).unwrap_err();
        assert!(err.contains("yesterday"));
    }

    #[test]
    fn test_sequential_uses_index() {
        let kind = GeneratorKind::compile(&GeneratorConfig::Sequential { start: 100 }).unwrap();
        let mut rng = StdRng::seed_from_u64(42);

        assert_eq!(generate_value(&kind, &mut rng, 0), GeneratedValue::Int64(100));
        assert_eq!(generate_value(&kind, &mut rng, 5), GeneratedValue::Int64(105));
    }

    #[test]
    fn test_one_of_picks_from_pool() {
        let values: Vec<serde_yaml::Value> = serde_yaml::from_str("[a, b, c]").unwrap();
        let kind = GeneratorKind::compile(&GeneratorConfig::OneOf { values }).unwrap();
        let mut rng = StdRng::seed_from_u64(42);

        for i in 0..50 {
            let value = generate_value(&kind, &mut rng, i);
            let text = value.as_str().unwrap();
            assert!(["a", "b", "c"].contains(&text));
        }
    }

    #[test]
    fn test_empty_one_of_is_null() {
        let kind = GeneratorKind::compile(&GeneratorConfig::OneOf { values: vec![] }).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        assert!(generate_value(&kind, &mut rng, 0).is_null());
    }

    #[test]
    fn test_weighted_bool_extremes() {
        let mut rng = StdRng::seed_from_u64(42);
        let always = GeneratorKind::WeightedBool { true_weight: 1.0 };
        let never = GeneratorKind::WeightedBool { true_weight: 0.0 };

        for i in 0..20 {
            assert_eq!(generate_value(&always, &mut rng, i), GeneratedValue::Bool(true));
            assert_eq!(generate_value(&never, &mut rng, i), GeneratedValue::Bool(false));
        }
    }
}
