//! Stage output repository.
//!
//! Each stage writes only its own rows. Runs accumulate; readers take the
//! most recent one.

use chrono::Utc;
use serde_json::Value;

use dossier_core::entities::StageOutputRecord;
use dossier_core::enums::PipelineStage;
use dossier_core::ids::PREFIX_STAGE_OUTPUT;

use crate::error::DatabaseError;
use crate::helpers::{parse_datetime, parse_enum, parse_json, to_json};
use crate::service::DossierStore;

fn row_to_stage_output(row: &libsql::Row) -> Result<StageOutputRecord, DatabaseError> {
    Ok(StageOutputRecord {
        id: row.get::<String>(0)?,
        case_id: row.get::<String>(1)?,
        stage: parse_enum(&row.get::<String>(2)?)?,
        output: parse_json(&row.get::<String>(3)?)?,
        created_at: parse_datetime(&row.get::<String>(4)?)?,
    })
}

impl DossierStore {
    /// Persist one stage run. The output must match the stage's schema.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidState` if `output` does not validate
    /// against the stage schema, or `DatabaseError` if the insert fails.
    pub async fn append_stage_output(
        &self,
        case_id: &str,
        stage: PipelineStage,
        output: &Value,
    ) -> Result<StageOutputRecord, DatabaseError> {
        self.schema()
            .validate(stage.schema_name(), output)
            .map_err(|e| DatabaseError::InvalidState(format!("{stage} output rejected: {e}")))?;

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_STAGE_OUTPUT).await?;

        self.db()
            .conn()
            .execute(
                "INSERT INTO stage_outputs (id, case_id, stage, output, seq, created_at)
                 SELECT ?1, ?2, ?3, ?4, COALESCE(MAX(seq), 0) + 1, ?5
                 FROM stage_outputs WHERE case_id = ?2 AND stage = ?3",
                libsql::params![
                    id.as_str(),
                    case_id,
                    stage.as_str(),
                    to_json(output)?,
                    now.to_rfc3339()
                ],
            )
            .await?;

        tracing::info!(case_id, %stage, output_id = %id, "stage output stored");

        Ok(StageOutputRecord {
            id,
            case_id: case_id.to_string(),
            stage,
            output: output.clone(),
            created_at: now,
        })
    }

    /// Most recent output of `stage` for a case, if the stage has ever run.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or the stored row is malformed.
    pub async fn latest_stage_output(
        &self,
        case_id: &str,
        stage: PipelineStage,
    ) -> Result<Option<StageOutputRecord>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT id, case_id, stage, output, created_at FROM stage_outputs
                 WHERE case_id = ?1 AND stage = ?2 ORDER BY seq DESC LIMIT 1",
                [case_id, stage.as_str()],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_stage_output(&row)?)),
            None => Ok(None),
        }
    }

    /// Every stored run of `stage` for a case, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or a stored row is malformed.
    pub async fn list_stage_outputs(
        &self,
        case_id: &str,
        stage: PipelineStage,
    ) -> Result<Vec<StageOutputRecord>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT id, case_id, stage, output, created_at FROM stage_outputs
                 WHERE case_id = ?1 AND stage = ?2 ORDER BY seq DESC",
                [case_id, stage.as_str()],
            )
            .await?;
        let mut outputs = Vec::new();
        while let Some(row) = rows.next().await? {
            outputs.push(row_to_stage_output(&row)?);
        }
        Ok(outputs)
    }
}
