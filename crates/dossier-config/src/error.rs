//! Errors from loading and checking `DossierConfig`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A layer (user TOML, `.dossier/config.toml`, or `DOSSIER_*` env) failed
    /// to parse or merge.
    #[error("Configuration error: {0}")]
    Figment(#[from] figment::Error),

    /// A section such as `[completion]` lacks the fields a command needs.
    #[error(
        "[{section}] is not configured: set it in .dossier/config.toml or via DOSSIER_{}__* variables",
        .section.to_uppercase()
    )]
    NotConfigured { section: String },

    /// A dotted field such as `pipeline.max_concurrent_units` is out of range.
    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}
