//! Numeric value generators.

use rand::Rng;
use relgen_core::GeneratedValue;

/// Generate a random integer in the given range (inclusive).
pub fn generate_int_range<R: Rng>(rng: &mut R, min: i64, max: i64) -> GeneratedValue {
    GeneratedValue::Int64(rng.random_range(min..=max))
}

/// Generate a random float in the given range (inclusive).
pub fn generate_float_range<R: Rng>(rng: &mut R, min: f64, max: f64) -> GeneratedValue {
    GeneratedValue::Float64(rng.random_range(min..=max))
}

/// Generate a random decimal in the given range, rendered with `scale` digits.
pub fn generate_decimal_range<R: Rng>(
    rng: &mut R,
    min: f64,
    max: f64,
    scale: u8,
) -> GeneratedValue {
    let value = rng.random_range(min..=max);
    GeneratedValue::Decimal {
        value: format!("{value:.prec$}", prec = scale as usize),
        scale,
    }
}
