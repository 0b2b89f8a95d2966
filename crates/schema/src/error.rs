//! Schema-level errors.

use std::fmt;

/// Errors raised while turning schema JSON into the typed model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// The schema JSON does not match the expected shape.
    Deserialize { message: String },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::Deserialize { message } => {
                write!(f, "schema deserialization error: {}", message)
            }
        }
    }
}

impl std::error::Error for SchemaError {}
