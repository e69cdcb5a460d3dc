//! Verification record repository.
//!
//! Records are versioned per `(document_id, criterion)` and kept apart from
//! analysis versions.

use chrono::Utc;

use dossier_core::entities::{DocumentVerification, VerificationRecord};
use dossier_core::enums::Criterion;
use dossier_core::ids::PREFIX_VERIFICATION;

use crate::error::DatabaseError;
use crate::helpers::{
    get_u32, is_unique_violation, parse_datetime, parse_enum, parse_json, to_json,
};
use crate::service::DossierStore;

fn row_to_verification(row: &libsql::Row) -> Result<VerificationRecord, DatabaseError> {
    Ok(VerificationRecord {
        id: row.get::<String>(0)?,
        case_id: row.get::<String>(1)?,
        document_id: row.get::<String>(2)?,
        criterion: parse_enum(&row.get::<String>(3)?)?,
        version: get_u32(row, 4)?,
        strength: parse_enum(&row.get::<String>(5)?)?,
        reason: row.get::<String>(6)?,
        evidence: parse_json(&row.get::<String>(7)?)?,
        created_at: parse_datetime(&row.get::<String>(8)?)?,
    })
}

impl DossierStore {
    /// Append the next verification version for `(document_id, criterion)`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::VerificationConflict` if a concurrent writer
    /// took the same version number, or `DatabaseError` if the insert fails.
    pub async fn append_verification(
        &self,
        case_id: &str,
        document_id: &str,
        criterion: Criterion,
        outcome: &DocumentVerification,
    ) -> Result<VerificationRecord, DatabaseError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_VERIFICATION).await?;

        let result = self
            .db()
            .conn()
            .query(
                "INSERT INTO verifications
                     (id, case_id, document_id, criterion, version, strength, reason, evidence, created_at)
                 SELECT ?1, ?2, ?3, ?4, COALESCE(MAX(version), 0) + 1, ?5, ?6, ?7, ?8
                 FROM verifications WHERE document_id = ?3 AND criterion = ?4
                 RETURNING version",
                libsql::params![
                    id.as_str(),
                    case_id,
                    document_id,
                    criterion.code(),
                    outcome.strength.as_str(),
                    outcome.reason.as_str(),
                    to_json(&outcome.evidence)?,
                    now.to_rfc3339()
                ],
            )
            .await;

        let conflict = || DatabaseError::VerificationConflict {
            document_id: document_id.to_string(),
            criterion,
        };

        let mut rows = match result {
            Ok(rows) => rows,
            Err(e) if is_unique_violation(&e) => return Err(conflict()),
            Err(e) => return Err(e.into()),
        };
        let row = match rows.next().await {
            Ok(Some(row)) => row,
            Ok(None) => return Err(DatabaseError::NoResult),
            Err(e) if is_unique_violation(&e) => return Err(conflict()),
            Err(e) => return Err(e.into()),
        };
        let version = get_u32(&row, 0)?;

        tracing::info!(case_id, document_id, %criterion, version, "verification stored");

        Ok(VerificationRecord {
            id,
            case_id: case_id.to_string(),
            document_id: document_id.to_string(),
            criterion,
            version,
            strength: outcome.strength,
            reason: outcome.reason.clone(),
            evidence: outcome.evidence.clone(),
            created_at: now,
        })
    }

    /// All verification records for a document, by criterion then version.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or a stored row is malformed.
    pub async fn list_verifications(
        &self,
        document_id: &str,
    ) -> Result<Vec<VerificationRecord>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT id, case_id, document_id, criterion, version, strength, reason, evidence, created_at
                 FROM verifications WHERE document_id = ?1",
                [document_id],
            )
            .await?;
        let mut records = Vec::new();
        while let Some(row) = rows.next().await? {
            records.push(row_to_verification(&row)?);
        }
        records.sort_by_key(|r| (r.criterion, r.version));
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use dossier_core::enums::Strength;

    use super::*;
    use crate::DossierDb;

    async fn test_store() -> DossierStore {
        DossierStore::from_db(DossierDb::open_local(":memory:").await.unwrap())
    }

    fn outcome(strength: Strength) -> DocumentVerification {
        DocumentVerification {
            strength,
            reason: format!("{strength} support"),
            evidence: vec!["p. 3".into()],
        }
    }

    #[tokio::test]
    async fn versions_are_per_document_and_criterion() {
        let store = test_store().await;
        let a1 = store
            .append_verification("case-1", "doc-1", Criterion::Awards, &outcome(Strength::Weak))
            .await
            .unwrap();
        let a2 = store
            .append_verification("case-1", "doc-1", Criterion::Awards, &outcome(Strength::Strong))
            .await
            .unwrap();
        let j1 = store
            .append_verification("case-1", "doc-1", Criterion::Judging, &outcome(Strength::None))
            .await
            .unwrap();
        let other = store
            .append_verification("case-1", "doc-2", Criterion::Awards, &outcome(Strength::Weak))
            .await
            .unwrap();

        assert_eq!((a1.version, a2.version, j1.version, other.version), (1, 2, 1, 1));

        let records = store.list_verifications("doc-1").await.unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].criterion, Criterion::Awards);
        assert_eq!(records[1].strength, Strength::Strong);
        assert_eq!(records[2].criterion, Criterion::Judging);
    }
}
