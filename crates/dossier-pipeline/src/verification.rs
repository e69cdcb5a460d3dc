//! Per-document verification against individual criteria.

use dossier_core::entities::{CaseDocument, DocumentVerification, VerificationRecord};
use dossier_core::enums::Criterion;
use dossier_llm::prompts::slugs;
use dossier_schema::names;
use serde::Serialize;

use crate::assemble::{ExtractionUnit, UnitFailure};
use crate::{Pipeline, PipelineError};

#[derive(Debug, Clone, Serialize)]
pub struct VerificationReport {
    pub records: Vec<VerificationRecord>,
    pub failed: Vec<UnitFailure>,
}

impl Pipeline {
    /// Check one document against each requested criterion and append one
    /// verification record per criterion that completed. Records are never
    /// merged into analysis versions. Appends hold the case lock, so
    /// concurrent checks of the same document get distinct versions.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::InvalidInput` when no criteria are requested,
    /// or `PipelineError::Database` if a record cannot be stored. Completion
    /// failures are reported per criterion.
    pub async fn verify_document(
        &self,
        document: &CaseDocument,
        text: &str,
        criteria: &[Criterion],
    ) -> Result<VerificationReport, PipelineError> {
        if criteria.is_empty() {
            return Err(PipelineError::InvalidInput("no criteria requested".into()));
        }
        let mut requested = criteria.to_vec();
        requested.sort_unstable();
        requested.dedup();

        let mut records = Vec::new();
        let mut failed = Vec::new();
        for criterion in requested {
            let result = self
                .completer
                .complete::<DocumentVerification>(
                    slugs::DOCUMENT_VERIFICATION,
                    names::DOCUMENT_VERIFICATION,
                    &[
                        ("criterion_code", criterion.code()),
                        ("criterion_label", criterion.label()),
                        ("document_name", document.name.as_str()),
                        ("document_text", text),
                    ],
                )
                .await;
            match result {
                Ok(outcome) => {
                    let record = {
                        let _guard = self.locks.acquire(&document.case_id).await;
                        self.store
                            .append_verification(
                                &document.case_id,
                                &document.id,
                                criterion,
                                &outcome,
                            )
                            .await?
                    };
                    records.push(record);
                }
                Err(e) => {
                    tracing::warn!(document_id = %document.id, criterion = criterion.code(), %e, "verification failed");
                    failed.push(UnitFailure {
                        unit: ExtractionUnit::Criterion(criterion),
                        error: e.to_string(),
                    });
                }
            }
        }

        Ok(VerificationReport { records, failed })
    }
}
