//! Value representation for generated data.
//!
//! Field generators produce [`GeneratedValue`]s. Jobs keep values in their
//! rendered CSV text form, so key uniqueness and foreign-key equality are
//! decided on exactly the text that ends up in the output file.

use chrono::{DateTime, NaiveDate, Utc};
use std::fmt;
use uuid::Uuid;

/// Raw generated value.
#[derive(Debug, Clone, PartialEq)]
pub enum GeneratedValue {
    /// Boolean value
    Bool(bool),

    /// 64-bit signed integer
    Int64(i64),

    /// 64-bit floating point
    Float64(f64),

    /// Decimal value stored as string with its scale
    Decimal {
        /// String representation of the decimal value
        value: String,
        /// Number of digits after decimal point
        scale: u8,
    },

    /// String value
    Text(String),

    /// UUID value
    Uuid(Uuid),

    /// Date/time with timezone
    DateTime(DateTime<Utc>),

    /// Calendar date
    Date(NaiveDate),

    /// Null value
    Null,
}

impl GeneratedValue {
    /// Create a new text value.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Try to get this value as an i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int64(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get this value as a string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Render the value as a CSV field.
    ///
    /// Null renders as the empty string.
    pub fn to_csv_field(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for GeneratedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int64(i) => write!(f, "{i}"),
            Self::Float64(v) => write!(f, "{v}"),
            Self::Decimal { value, .. } => f.write_str(value),
            Self::Text(s) => f.write_str(s),
            Self::Uuid(u) => write!(f, "{u}"),
            Self::DateTime(dt) => f.write_str(&dt.to_rfc3339()),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}
