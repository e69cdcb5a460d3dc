//! Incremental analysis updates and version history.

use dossier_core::entities::{AnalysisSummary, AnalysisVersion, CriterionUpdate};
use dossier_core::enums::VersionSource;
use dossier_core::version_merge::{apply_updates, seed_assessments};

use crate::{Pipeline, PipelineError};

impl Pipeline {
    /// Merge externally proposed updates onto the latest version and append
    /// the result. Strength is never downgraded on this path.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Database` if reading or appending fails.
    pub async fn apply_updates(
        &self,
        case_id: &str,
        updates: &[CriterionUpdate],
    ) -> Result<AnalysisVersion, PipelineError> {
        self.append_merged(case_id, updates, VersionSource::Incremental)
            .await
    }

    /// Read-latest-then-append under the case lock. With no previous
    /// version, all ten criteria are seeded at `None` and the result is
    /// version 1.
    pub(crate) async fn append_merged(
        &self,
        case_id: &str,
        updates: &[CriterionUpdate],
        source: VersionSource,
    ) -> Result<AnalysisVersion, PipelineError> {
        let _guard = self.locks.acquire(case_id).await;
        let (base, previous) = match self.store.latest_version(case_id).await? {
            Some(latest) => (latest.version, latest.criteria),
            None => (0, seed_assessments()),
        };
        let merged = apply_updates(&previous, updates);
        let version = self
            .store
            .append_version(case_id, base, merged, source)
            .await?;
        tracing::debug!(case_id, version = version.version, updates = updates.len(), %source, "analysis merged");
        Ok(version)
    }

    /// Stored versions, newest first.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Database` if the query fails.
    pub async fn history(
        &self,
        case_id: &str,
        limit: u32,
    ) -> Result<Vec<AnalysisVersion>, PipelineError> {
        Ok(self.store.list_versions(case_id, limit).await?)
    }

    /// Summary of the latest version, if any.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Database` if the query fails.
    pub async fn current_summary(
        &self,
        case_id: &str,
    ) -> Result<Option<AnalysisSummary>, PipelineError> {
        Ok(self
            .store
            .latest_version(case_id)
            .await?
            .map(|v| v.summary()))
    }
}
