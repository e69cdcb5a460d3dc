//! Extraction fan-out: one isolated completion per unit, bounded concurrency.

use std::collections::BTreeSet;
use std::sync::Arc;

use dossier_core::entities::{
    AnalysisVersion, Background, CriterionUnitOutput, ExtractionDocument, ExtractionRecord,
};
use dossier_core::enums::{Criterion, VersionSource};
use dossier_core::version_merge::snapshot_from_summaries;
use dossier_llm::prompts::slugs;
use dossier_llm::{LlmError, StructuredCompleter};
use dossier_schema::names;
use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::assemble::{ExtractionUnit, ProgressiveAssembler, UnitFailure, UnitOutcome, UnitOutput, failures};
use crate::{Pipeline, PipelineError};

/// Receives `(completed, total, snapshot)` after every unit settles.
pub trait ProgressObserver: Send + Sync {
    fn on_progress(&self, completed: usize, total: usize, snapshot: &ExtractionDocument);
}

impl<F> ProgressObserver for F
where
    F: Fn(usize, usize, &ExtractionDocument) + Send + Sync,
{
    fn on_progress(&self, completed: usize, total: usize, snapshot: &ExtractionDocument) {
        self(completed, total, snapshot);
    }
}

/// Result of one extraction run.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionReport {
    pub record: ExtractionRecord,
    /// Snapshot version seeded from the extraction's summaries.
    pub version: AnalysisVersion,
    /// Units excluded from assembly. Not an error.
    pub failed_units: Vec<UnitFailure>,
}

struct UnitInput {
    completer: StructuredCompleter,
    case_text: Arc<str>,
    survey: Arc<str>,
}

async fn run_unit(unit: ExtractionUnit, input: &UnitInput) -> Result<UnitOutput, LlmError> {
    match unit {
        ExtractionUnit::Criterion(criterion) => {
            let output: CriterionUnitOutput = input
                .completer
                .complete(
                    slugs::EXTRACTION,
                    names::extraction(criterion),
                    &[
                        ("criterion_code", criterion.code()),
                        ("criterion_label", criterion.label()),
                        ("case_text", &*input.case_text),
                        ("survey", &*input.survey),
                    ],
                )
                .await?;
            Ok(UnitOutput::Criterion(output))
        }
        ExtractionUnit::Background => {
            let background: Background = input
                .completer
                .complete(
                    slugs::BACKGROUND,
                    names::BACKGROUND,
                    &[("case_text", &*input.case_text)],
                )
                .await?;
            Ok(UnitOutput::Background(background))
        }
    }
}

impl Pipeline {
    /// Run all eleven units against `case_text` and assemble what succeeds.
    ///
    /// Units run concurrently up to `max_concurrent_units`; a failing unit is
    /// logged and reported, never cancelling its siblings. The assembled
    /// document is persisted and seeds a new analysis version with
    /// `source = extraction`.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::InvalidInput` for empty case text and
    /// `PipelineError::Database` if persisting fails. Unit failures are not
    /// errors.
    pub async fn extract_case(
        &self,
        case_id: &str,
        case_text: &str,
        survey: Option<&str>,
        observer: Option<&dyn ProgressObserver>,
    ) -> Result<ExtractionReport, PipelineError> {
        if case_text.trim().is_empty() {
            return Err(PipelineError::InvalidInput("case text is empty".into()));
        }

        let units = ExtractionUnit::all();
        let total = units.len();
        let input = Arc::new(UnitInput {
            completer: self.completer.clone(),
            case_text: Arc::from(case_text),
            survey: Arc::from(survey.unwrap_or("(no survey answers)")),
        });
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent_units.max(1)));

        tracing::debug!(case_id, units = total, "extraction fan-out");
        let mut set = JoinSet::new();
        for unit in units.iter().copied() {
            let input = Arc::clone(&input);
            let semaphore = Arc::clone(&semaphore);
            set.spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return UnitOutcome::Failed {
                        unit,
                        error: "unit scheduler closed".into(),
                    };
                };
                match run_unit(unit, &input).await {
                    Ok(output) => UnitOutcome::Succeeded(output),
                    Err(e) => UnitOutcome::Failed {
                        unit,
                        error: e.to_string(),
                    },
                }
            });
        }

        let mut progressive = ProgressiveAssembler::new(total, self.config.max_evidence_excerpts);
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok(outcome) => {
                    if let UnitOutcome::Failed { unit, error } = &outcome {
                        tracing::warn!(case_id, %unit, error = %error, "extraction unit failed");
                    }
                    let snapshot = progressive.push(outcome);
                    if let Some(observer) = observer {
                        observer.on_progress(progressive.completed(), total, &snapshot);
                    }
                }
                Err(e) => tracing::warn!(case_id, %e, "extraction unit task failed"),
            }
        }

        // A task that panicked never reported its unit.
        let settled: BTreeSet<ExtractionUnit> =
            progressive.outcomes().iter().map(UnitOutcome::unit).collect();
        for unit in units {
            if !settled.contains(&unit) {
                let snapshot = progressive.push(UnitOutcome::Failed {
                    unit,
                    error: "unit task aborted".into(),
                });
                if let Some(observer) = observer {
                    observer.on_progress(progressive.completed(), total, &snapshot);
                }
            }
        }

        let document = progressive.snapshot();
        let failed_units = failures(progressive.outcomes());
        let failed_criteria: Vec<Criterion> = failed_units
            .iter()
            .filter_map(|f| match f.unit {
                ExtractionUnit::Criterion(criterion) => Some(criterion),
                ExtractionUnit::Background => None,
            })
            .collect();

        let record = self
            .store
            .put_extraction(case_id, &document, &failed_criteria)
            .await?;
        let version = self.seed_from_extraction(case_id, &record.document).await?;

        Ok(ExtractionReport {
            record,
            version,
            failed_units,
        })
    }

    /// Append a full snapshot of an extraction's summaries. This path may
    /// reset strengths; incremental merges never do.
    async fn seed_from_extraction(
        &self,
        case_id: &str,
        document: &ExtractionDocument,
    ) -> Result<AnalysisVersion, PipelineError> {
        let _guard = self.locks.acquire(case_id).await;
        let base = self
            .store
            .latest_version(case_id)
            .await?
            .map_or(0, |v| v.version);
        let criteria = snapshot_from_summaries(&document.criteria_summary);
        let version = self
            .store
            .append_version(case_id, base, criteria, VersionSource::Extraction)
            .await?;
        Ok(version)
    }
}
