//! Reanalysis after a new document: relevance hint, then targeted
//! re-evaluation merged with the upgrade-only rule.

use std::collections::BTreeSet;

use dossier_core::entities::{AnalysisVersion, CriterionUpdate, RelevanceHint};
use dossier_core::enums::{Criterion, VersionSource};
use dossier_core::version_merge::{normalize, seed_assessments};
use dossier_llm::prompts::slugs;
use dossier_schema::names;
use serde::Serialize;

use crate::assemble::{ExtractionUnit, UnitFailure};
use crate::{Pipeline, PipelineError};

#[derive(Debug, Clone, Serialize)]
pub struct ReanalysisOutcome {
    pub hint: RelevanceHint,
    /// Updates that were merged, one per successfully re-evaluated criterion.
    pub updates: Vec<CriterionUpdate>,
    /// `None` when nothing was re-evaluated.
    pub version: Option<AnalysisVersion>,
    pub failed: Vec<UnitFailure>,
}

impl Pipeline {
    /// Re-evaluate only the criteria a new document might affect.
    ///
    /// The relevance pass is a hint: criteria it omits are not re-evaluated.
    /// An empty hint set produces no completion beyond the hint and no new
    /// version. A failed re-evaluation is reported and skipped.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::InvalidInput` for an empty document, any
    /// error from the relevance pass, or `PipelineError::Database` if the
    /// merge cannot be persisted.
    pub async fn reanalyze(
        &self,
        case_id: &str,
        document_text: &str,
    ) -> Result<ReanalysisOutcome, PipelineError> {
        if document_text.trim().is_empty() {
            return Err(PipelineError::InvalidInput("document text is empty".into()));
        }

        let current = self
            .store
            .latest_version(case_id)
            .await?
            .map_or_else(seed_assessments, |v| normalize(&v.criteria));
        let analysis = serde_json::to_string_pretty(&current)?;

        let hint: RelevanceHint = self
            .completer
            .complete(
                slugs::RELEVANCE_HINT,
                names::RELEVANCE_HINT,
                &[("analysis", analysis.as_str()), ("document_text", document_text)],
            )
            .await?;
        let hinted: BTreeSet<Criterion> = hint.criteria.iter().copied().collect();
        tracing::debug!(case_id, hinted = hinted.len(), "relevance hint");

        let mut updates = Vec::new();
        let mut failed = Vec::new();
        for criterion in hinted {
            let assessment = serde_json::to_string_pretty(&current[criterion.ordinal()])?;
            let result = self
                .completer
                .complete::<CriterionUpdate>(
                    slugs::CRITERION_REEVALUATION,
                    names::CRITERION_REEVALUATION,
                    &[
                        ("criterion_code", criterion.code()),
                        ("criterion_label", criterion.label()),
                        ("current", assessment.as_str()),
                        ("document_text", document_text),
                    ],
                )
                .await;
            match result {
                Ok(mut update) => {
                    update.criterion = criterion;
                    updates.push(update);
                }
                Err(e) => {
                    tracing::warn!(case_id, criterion = criterion.code(), %e, "re-evaluation failed");
                    failed.push(UnitFailure {
                        unit: ExtractionUnit::Criterion(criterion),
                        error: e.to_string(),
                    });
                }
            }
        }

        let version = if updates.is_empty() {
            None
        } else {
            Some(
                self.append_merged(case_id, &updates, VersionSource::Reanalysis)
                    .await?,
            )
        };

        Ok(ReanalysisOutcome {
            hint,
            updates,
            version,
            failed,
        })
    }
}
