//! Case profile repository.
//!
//! A profile is one JSON document per case. Partial updates go through
//! [`deep_merge`], so nested objects merge key-by-key and arrays are replaced.

use chrono::Utc;
use serde_json::Value;

use dossier_core::merge::deep_merge;

use crate::error::DatabaseError;
use crate::helpers::{parse_json, to_json};
use crate::service::DossierStore;

impl DossierStore {
    /// The stored profile for a case, if one exists.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or the stored JSON is invalid.
    pub async fn get_profile(&self, case_id: &str) -> Result<Option<Value>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query("SELECT data FROM profiles WHERE case_id = ?1", [case_id])
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(parse_json(&row.get::<String>(0)?)?)),
            None => Ok(None),
        }
    }

    /// Deep-merge `patch` into the case profile and persist the result.
    /// A missing profile is treated as an empty object.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidState` if `patch` is not a JSON object,
    /// or `DatabaseError` if the read or write fails.
    pub async fn update_profile(&self, case_id: &str, patch: Value) -> Result<Value, DatabaseError> {
        if !patch.is_object() {
            return Err(DatabaseError::InvalidState(
                "profile patch must be a JSON object".into(),
            ));
        }

        let mut profile = self
            .get_profile(case_id)
            .await?
            .unwrap_or_else(|| Value::Object(serde_json::Map::new()));
        deep_merge(&mut profile, patch);

        self.db()
            .conn()
            .execute(
                "INSERT INTO profiles (case_id, data, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(case_id) DO UPDATE SET data = excluded.data, updated_at = excluded.updated_at",
                libsql::params![case_id, to_json(&profile)?, Utc::now().to_rfc3339()],
            )
            .await?;

        tracing::info!(case_id, "profile updated");
        Ok(profile)
    }
}
