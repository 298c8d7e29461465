//! Pattern-based string generator.
//!
//! Supports placeholders:
//! - `{index}` - number of values the field has produced so far
//! - `{uuid}` - random UUID
//! - `{rand:N}` - random N-digit number

use super::uuid::generate_uuid_v4;
use rand::Rng;
use relgen_core::GeneratedValue;

/// Generate a string based on a pattern with placeholders.
pub fn generate_pattern<R: Rng>(pattern: &str, rng: &mut R, index: u64) -> GeneratedValue {
    let mut result = pattern.replace("{index}", &index.to_string());

    // Replace {uuid}, drawing from the seeded RNG
    while result.contains("{uuid}") {
        let uuid = generate_uuid_v4(rng).to_csv_field();
        result = result.replacen("{uuid}", &uuid, 1);
    }

    // Replace {rand:N} patterns
    let mut search_from = 0;
    while let Some(offset) = result[search_from..].find("{rand:") {
        let start = search_from + offset;
        let Some(end) = result[start..].find('}').map(|end| start + end) else {
            break;
        };

        match result[start + 6..end].parse::<usize>() {
            Ok(digits) => {
                let random_num = generate_random_digits(rng, digits);
                result.replace_range(start..=end, &random_num);
                search_from = start + random_num.len();
            }
            // Leave malformed placeholders as literal text
            Err(_) => search_from = end + 1,
        }
    }

    GeneratedValue::Text(result)
}

/// Generate a random number with exactly N digits.
fn generate_random_digits<R: Rng>(rng: &mut R, digits: usize) -> String {
    if digits == 0 {
        return String::new();
    }

    let mut result = String::with_capacity(digits);

    // First digit is 1-9 to avoid leading zeros
    result.push(char::from(b'0' + rng.random_range(1..10u8)));

    for _ in 1..digits {
        result.push(char::from(b'0' + rng.random_range(0..10u8)));
    }

    result
}
