//! Case documents, recommenders, and the evidence inventory.

use chrono::Utc;

use dossier_core::entities::{CaseDocument, EvidenceInventory, Recommender};
use dossier_core::ids::{PREFIX_DOCUMENT, PREFIX_RECOMMENDER};

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, get_u32, parse_datetime};
use crate::service::DossierStore;

fn row_to_document(row: &libsql::Row) -> Result<CaseDocument, DatabaseError> {
    Ok(CaseDocument {
        id: row.get::<String>(0)?,
        case_id: row.get::<String>(1)?,
        name: row.get::<String>(2)?,
        created_at: parse_datetime(&row.get::<String>(3)?)?,
    })
}

fn row_to_recommender(row: &libsql::Row) -> Result<Recommender, DatabaseError> {
    Ok(Recommender {
        id: row.get::<String>(0)?,
        case_id: row.get::<String>(1)?,
        name: row.get::<String>(2)?,
        relationship: get_opt_string(row, 3)?,
        created_at: parse_datetime(&row.get::<String>(4)?)?,
    })
}

impl DossierStore {
    /// Register a document on a case. `content` is optional text kept with
    /// drafted documents.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the insert fails.
    pub async fn register_document(
        &self,
        case_id: &str,
        name: &str,
        content: Option<&str>,
    ) -> Result<CaseDocument, DatabaseError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_DOCUMENT).await?;
        self.db()
            .conn()
            .execute(
                "INSERT INTO documents (id, case_id, name, content, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
                libsql::params![id.as_str(), case_id, name, content, now.to_rfc3339()],
            )
            .await?;
        tracing::info!(case_id, document_id = %id, name, "document registered");
        Ok(CaseDocument {
            id,
            case_id: case_id.to_string(),
            name: name.to_string(),
            created_at: now,
        })
    }

    /// Documents on a case, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_documents(&self, case_id: &str) -> Result<Vec<CaseDocument>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT id, case_id, name, created_at FROM documents WHERE case_id = ?1 ORDER BY rowid",
                [case_id],
            )
            .await?;
        let mut documents = Vec::new();
        while let Some(row) = rows.next().await? {
            documents.push(row_to_document(&row)?);
        }
        Ok(documents)
    }

    /// Add a recommendation letter author to a case.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the insert fails.
    pub async fn add_recommender(
        &self,
        case_id: &str,
        name: &str,
        relationship: Option<&str>,
    ) -> Result<Recommender, DatabaseError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_RECOMMENDER).await?;
        self.db()
            .conn()
            .execute(
                "INSERT INTO recommenders (id, case_id, name, relationship, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
                libsql::params![id.as_str(), case_id, name, relationship, now.to_rfc3339()],
            )
            .await?;
        Ok(Recommender {
            id,
            case_id: case_id.to_string(),
            name: name.to_string(),
            relationship: relationship.map(String::from),
            created_at: now,
        })
    }

    /// Recommenders on a case, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_recommenders(&self, case_id: &str) -> Result<Vec<Recommender>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT id, case_id, name, relationship, created_at FROM recommenders
                 WHERE case_id = ?1 ORDER BY rowid",
                [case_id],
            )
            .await?;
        let mut recommenders = Vec::new();
        while let Some(row) = rows.next().await? {
            recommenders.push(row_to_recommender(&row)?);
        }
        Ok(recommenders)
    }

    /// Read-only inventory summary for risk assessment.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn evidence_inventory(&self, case_id: &str) -> Result<EvidenceInventory, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT
                    (SELECT COUNT(*) FROM documents WHERE case_id = ?1),
                    (SELECT COUNT(*) FROM recommenders WHERE case_id = ?1),
                    EXISTS(SELECT 1 FROM profiles WHERE case_id = ?1),
                    EXISTS(SELECT 1 FROM extractions WHERE case_id = ?1)",
                [case_id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(EvidenceInventory {
            document_count: get_u32(&row, 0)?,
            recommender_count: get_u32(&row, 1)?,
            has_profile: row.get::<i64>(2)? != 0,
            has_extraction: row.get::<i64>(3)? != 0,
        })
    }
}
