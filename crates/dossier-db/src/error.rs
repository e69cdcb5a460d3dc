//! Errors raised by the libSQL-backed dossier store.

use dossier_core::enums::Criterion;
use thiserror::Error;

/// Failures from store reads, appends, and migrations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A row could not be decoded into a dossier record.
    #[error("Query failed: {0}")]
    Query(String),

    /// Applying `migrations/*.sql` failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// An insert with `RETURNING` or an id query produced no row.
    #[error("No result returned")]
    NoResult,

    /// A stored value or a caller-supplied record violates a store rule,
    /// such as a stage output that fails its schema or a non-object profile
    /// patch.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Another writer appended an analysis version after `expected` was read.
    #[error("Version conflict for case {case_id}: expected latest version {expected}")]
    VersionConflict { case_id: String, expected: u32 },

    /// Another writer stored the same verification version for this
    /// document and criterion first.
    #[error("Verification conflict for document {document_id}, criterion {criterion}")]
    VerificationConflict {
        document_id: String,
        criterion: Criterion,
    },

    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// JSON encoding of a record column failed.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
