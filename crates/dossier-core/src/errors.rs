//! Cross-cutting error types for Dossier.
//!
//! Domain-specific errors (e.g., `DatabaseError`, `PipelineError`) are defined
//! in their respective crates. The CLI converges everything into `anyhow`.

use thiserror::Error;

/// Errors that can be raised by any Dossier crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Record lookup returned no result.
    #[error("Record not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// A criterion code did not match any of the ten categories.
    #[error("Unknown criterion: {0}")]
    UnknownCriterion(String),

    /// Data failed validation (format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
