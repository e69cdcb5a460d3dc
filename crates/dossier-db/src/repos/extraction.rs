//! Extraction repository.
//!
//! Extraction runs are not versioned: each run is a new row and the latest
//! one supersedes the rest.

use chrono::Utc;

use dossier_core::entities::{ExtractionDocument, ExtractionRecord};
use dossier_core::enums::Criterion;
use dossier_core::ids::PREFIX_EXTRACTION;

use crate::error::DatabaseError;
use crate::helpers::{parse_datetime, parse_json, to_json};
use crate::service::DossierStore;

fn row_to_extraction(row: &libsql::Row) -> Result<ExtractionRecord, DatabaseError> {
    Ok(ExtractionRecord {
        id: row.get::<String>(0)?,
        case_id: row.get::<String>(1)?,
        document: parse_json(&row.get::<String>(2)?)?,
        failed_criteria: parse_json(&row.get::<String>(3)?)?,
        created_at: parse_datetime(&row.get::<String>(4)?)?,
    })
}

impl DossierStore {
    /// Persist the outcome of one extraction run.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if serialization or the insert fails.
    pub async fn put_extraction(
        &self,
        case_id: &str,
        document: &ExtractionDocument,
        failed_criteria: &[Criterion],
    ) -> Result<ExtractionRecord, DatabaseError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_EXTRACTION).await?;

        self.db()
            .conn()
            .execute(
                "INSERT INTO extractions (id, case_id, document, failed_criteria, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                libsql::params![
                    id.as_str(),
                    case_id,
                    to_json(document)?,
                    to_json(failed_criteria)?,
                    now.to_rfc3339()
                ],
            )
            .await?;

        tracing::info!(case_id, extraction_id = %id, items = document.evidence.len(), "extraction stored");

        Ok(ExtractionRecord {
            id,
            case_id: case_id.to_string(),
            document: document.clone(),
            failed_criteria: failed_criteria.to_vec(),
            created_at: now,
        })
    }

    /// Most recent extraction for a case, if any.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or the stored row is malformed.
    pub async fn latest_extraction(
        &self,
        case_id: &str,
    ) -> Result<Option<ExtractionRecord>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT id, case_id, document, failed_criteria, created_at
                 FROM extractions WHERE case_id = ?1
                 ORDER BY rowid DESC LIMIT 1",
                [case_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_extraction(&row)?)),
            None => Ok(None),
        }
    }

    /// Whether any extraction exists for a case.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn has_extraction(&self, case_id: &str) -> Result<bool, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT EXISTS(SELECT 1 FROM extractions WHERE case_id = ?1)",
                [case_id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<i64>(0)? != 0)
    }
}
