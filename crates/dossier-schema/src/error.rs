//! Schema validation error types.

use thiserror::Error;

/// Errors from the schema registry.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Requested schema name was not found in the registry.
    #[error("Schema not found: {0}")]
    NotFound(String),

    /// JSON value did not pass schema validation.
    #[error("Validation failed: {errors:?}")]
    ValidationFailed {
        /// Individual error messages from the validator.
        errors: Vec<String>,
    },

    /// Value passed validation but could not be decoded into its Rust type.
    #[error("Decode failed: {0}")]
    Decode(String),

    /// Schema generation or compilation error.
    #[error("Schema generation error: {0}")]
    Generation(String),
}

impl SchemaError {
    /// Individual messages, suitable for surfacing as a validation failure.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::ValidationFailed { errors } => errors.clone(),
            other => vec![other.to_string()],
        }
    }
}
