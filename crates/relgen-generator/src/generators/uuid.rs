//! UUID value generator.

use rand::Rng;
use relgen_core::GeneratedValue;
use uuid::{Builder, Variant, Version};

/// Random v4 UUID drawn from the table's RNG, so seeded runs repeat.
pub fn generate_uuid_v4<R: Rng>(rng: &mut R) -> GeneratedValue {
    let bytes: [u8; 16] = rng.random();
    GeneratedValue::Uuid(Builder::from_random_bytes(bytes).into_uuid())
}
