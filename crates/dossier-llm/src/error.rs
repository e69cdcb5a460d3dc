//! Completion error types.

use dossier_config::ConfigError;
use thiserror::Error;

/// Errors from completion calls and prompt lookup.
#[derive(Debug, Error)]
pub enum LlmError {
    /// HTTP request failed (network, TLS, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint returned a non-success status.
    #[error("Completion API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The endpoint returned 429 Too Many Requests.
    #[error("Rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// The response body or message content was not the expected JSON.
    #[error("Failed to parse completion response: {0}")]
    Parse(String),

    /// The model declined to answer.
    #[error("Completion refused: {0}")]
    Refused(String),

    /// The completion output did not conform to its schema.
    #[error("Output for schema {schema} failed validation: {errors:?}")]
    SchemaValidation { schema: String, errors: Vec<String> },

    /// No schema is registered under this name.
    #[error("Unknown schema: {0}")]
    UnknownSchema(String),

    /// Prompt lookup or rendering failed.
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// The completion endpoint is not configured.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
