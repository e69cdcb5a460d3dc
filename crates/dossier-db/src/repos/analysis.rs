//! Analysis version repository.
//!
//! Versions are append-only. An append names the version it was computed
//! from; the insert only succeeds if that is still the latest version for the
//! case, so two writers that read the same base cannot both land.

use chrono::Utc;

use dossier_core::entities::{AnalysisVersion, CriterionAssessment};
use dossier_core::enums::VersionSource;
use dossier_core::ids::PREFIX_ANALYSIS_VERSION;
use dossier_core::version_merge::strength_counts;

use crate::error::DatabaseError;
use crate::helpers::{get_u32, is_unique_violation, parse_datetime, parse_enum, parse_json, to_json};
use crate::service::DossierStore;

const VERSION_COLUMNS: &str =
    "id, case_id, version, criteria, strong_count, weak_count, source, created_at";

fn row_to_version(row: &libsql::Row) -> Result<AnalysisVersion, DatabaseError> {
    Ok(AnalysisVersion {
        id: row.get::<String>(0)?,
        case_id: row.get::<String>(1)?,
        version: get_u32(row, 2)?,
        criteria: parse_json(&row.get::<String>(3)?)?,
        strong_count: get_u32(row, 4)?,
        weak_count: get_u32(row, 5)?,
        source: parse_enum(&row.get::<String>(6)?)?,
        created_at: parse_datetime(&row.get::<String>(7)?)?,
    })
}

impl DossierStore {
    /// Latest analysis version for a case, if any.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or the stored row is malformed.
    pub async fn latest_version(
        &self,
        case_id: &str,
    ) -> Result<Option<AnalysisVersion>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {VERSION_COLUMNS} FROM analysis_versions
                     WHERE case_id = ?1 ORDER BY version DESC LIMIT 1"
                ),
                [case_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_version(&row)?)),
            None => Ok(None),
        }
    }

    /// A specific version number for a case.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or the stored row is malformed.
    pub async fn get_version(
        &self,
        case_id: &str,
        version: u32,
    ) -> Result<Option<AnalysisVersion>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {VERSION_COLUMNS} FROM analysis_versions
                     WHERE case_id = ?1 AND version = ?2"
                ),
                libsql::params![case_id, i64::from(version)],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_version(&row)?)),
            None => Ok(None),
        }
    }

    /// Versions for a case, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or a stored row is malformed.
    pub async fn list_versions(
        &self,
        case_id: &str,
        limit: u32,
    ) -> Result<Vec<AnalysisVersion>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {VERSION_COLUMNS} FROM analysis_versions
                     WHERE case_id = ?1 ORDER BY version DESC LIMIT ?2"
                ),
                libsql::params![case_id, i64::from(limit)],
            )
            .await?;
        let mut versions = Vec::new();
        while let Some(row) = rows.next().await? {
            versions.push(row_to_version(&row)?);
        }
        Ok(versions)
    }

    /// Append a version computed from `base_version` (0 when the case had none).
    ///
    /// The new version number is `base_version + 1`, assigned inside the
    /// insert. Strong/weak counts are recomputed from `criteria`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::VersionConflict` if another version was
    /// appended since `base_version` was read, or `DatabaseError` if the
    /// insert fails.
    pub async fn append_version(
        &self,
        case_id: &str,
        base_version: u32,
        criteria: Vec<CriterionAssessment>,
        source: VersionSource,
    ) -> Result<AnalysisVersion, DatabaseError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_ANALYSIS_VERSION).await?;
        let (strong_count, weak_count) = strength_counts(&criteria);

        let result = self
            .db()
            .conn()
            .query(
                "INSERT INTO analysis_versions
                     (id, case_id, version, criteria, strong_count, weak_count, source, created_at)
                 SELECT ?1, ?2, cur + 1, ?3, ?4, ?5, ?6, ?7
                 FROM (SELECT COALESCE(MAX(version), 0) AS cur
                       FROM analysis_versions WHERE case_id = ?2)
                 WHERE cur = ?8
                 RETURNING version",
                libsql::params![
                    id.as_str(),
                    case_id,
                    to_json(&criteria)?,
                    i64::from(strong_count),
                    i64::from(weak_count),
                    source.as_str(),
                    now.to_rfc3339(),
                    i64::from(base_version)
                ],
            )
            .await;

        let conflict = || DatabaseError::VersionConflict {
            case_id: case_id.to_string(),
            expected: base_version,
        };

        let mut rows = match result {
            Ok(rows) => rows,
            Err(e) if is_unique_violation(&e) => return Err(conflict()),
            Err(e) => return Err(e.into()),
        };
        let row = match rows.next().await {
            Ok(Some(row)) => row,
            Ok(None) => return Err(conflict()),
            Err(e) if is_unique_violation(&e) => return Err(conflict()),
            Err(e) => return Err(e.into()),
        };
        let version = get_u32(&row, 0)?;

        tracing::info!(case_id, version, %source, strong_count, weak_count, "analysis version appended");

        Ok(AnalysisVersion {
            id,
            case_id: case_id.to_string(),
            version,
            criteria,
            strong_count,
            weak_count,
            source,
            created_at: now,
        })
    }
}
