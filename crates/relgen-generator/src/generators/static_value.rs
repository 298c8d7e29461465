//! Static value generator and YAML to GeneratedValue conversion.

use relgen_core::GeneratedValue;
use serde_yaml::Value as YamlValue;

/// Convert a scalar YAML value to a GeneratedValue.
///
/// Sequences and mappings have no single CSV field form and are rejected.
pub fn yaml_to_generated_value(yaml: &YamlValue) -> Result<GeneratedValue, String> {
    match yaml {
        YamlValue::Null => Ok(GeneratedValue::Null),
        YamlValue::Bool(b) => Ok(GeneratedValue::Bool(*b)),
        YamlValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(GeneratedValue::Int64(i))
            } else if let Some(f) = n.as_f64() {
                Ok(GeneratedValue::Float64(f))
            } else {
                Ok(GeneratedValue::Text(n.to_string()))
            }
        }
        YamlValue::String(s) => Ok(GeneratedValue::Text(s.clone())),
        YamlValue::Sequence(_) | YamlValue::Mapping(_) => {
            Err("static and one_of values must be scalars".to_string())
        }
        YamlValue::Tagged(tagged) => yaml_to_generated_value(&tagged.value),
    }
}
