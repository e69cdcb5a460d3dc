//! The gated stage cascade.
//!
//! ```text
//! extraction → strength_evaluation → gap_analysis → case_strategy → consolidation
//!                                  → risk_probability
//! ```
//!
//! A stage runs only when its required predecessor has stored output. Its
//! context is the predecessor's own context with the predecessor's output
//! appended, so context grows monotonically down the cascade. Each stage
//! writes only its own output; runs accumulate.

use dossier_core::entities::{
    CaseStrategy, Consolidation, GapAnalysis, StageOutputRecord, StrengthEvaluation,
};
use dossier_core::enums::{PipelineStage, Prerequisite};
use dossier_llm::prompts::slugs;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{Pipeline, PipelineError};

fn section(title: &str, body: &str) -> String {
    format!("## {title}\n\n{body}\n\n")
}

impl Pipeline {
    /// Fail with `PredecessorMissing` unless `stage`'s required input exists.
    pub(crate) async fn check_prerequisite(
        &self,
        case_id: &str,
        stage: PipelineStage,
    ) -> Result<(), PipelineError> {
        let present = match stage.prerequisite() {
            Prerequisite::Extraction => self.store.has_extraction(case_id).await?,
            Prerequisite::Stage(upstream) => self
                .store
                .latest_stage_output(case_id, upstream)
                .await?
                .is_some(),
        };
        if present {
            Ok(())
        } else {
            Err(PipelineError::PredecessorMissing {
                stage,
                missing: stage.prerequisite(),
            })
        }
    }

    /// Context for `stage`: the latest extraction, then every stage output
    /// on the path from the root down to `stage`'s predecessor.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::PredecessorMissing` for the first missing
    /// link, checking `stage`'s own predecessor first.
    pub async fn stage_context(
        &self,
        case_id: &str,
        stage: PipelineStage,
    ) -> Result<String, PipelineError> {
        self.check_prerequisite(case_id, stage).await?;

        // (stage, its upstream stage) pairs from `stage` back to the root.
        let mut chain = Vec::new();
        let mut current = stage;
        while let Prerequisite::Stage(upstream) = current.prerequisite() {
            chain.push((current, upstream));
            current = upstream;
        }

        let extraction = self
            .store
            .latest_extraction(case_id)
            .await?
            .ok_or(PipelineError::PredecessorMissing {
                stage: current,
                missing: Prerequisite::Extraction,
            })?;
        let mut context = section(
            "extraction",
            &serde_json::to_string_pretty(&extraction.document)?,
        );

        for (needing, upstream) in chain.into_iter().rev() {
            let output = self
                .store
                .latest_stage_output(case_id, upstream)
                .await?
                .ok_or(PipelineError::PredecessorMissing {
                    stage: needing,
                    missing: Prerequisite::Stage(upstream),
                })?;
            context.push_str(&section(
                upstream.as_str(),
                &serde_json::to_string_pretty(&output.output)?,
            ));
        }
        Ok(context)
    }

    /// Run one cascade stage and store its output.
    ///
    /// `RiskProbability` is delegated to [`Self::assess_risk`].
    ///
    /// # Errors
    ///
    /// - `PipelineError::PredecessorMissing` before any completion call when
    ///   the required upstream output is absent.
    /// - `PipelineError::SchemaValidation` if the output does not conform.
    /// - `PipelineError::Database` if storing fails.
    pub async fn run_stage(
        &self,
        case_id: &str,
        stage: PipelineStage,
    ) -> Result<StageOutputRecord, PipelineError> {
        let output = match stage {
            PipelineStage::RiskProbability => return Ok(self.assess_risk(case_id).await?.record),
            PipelineStage::StrengthEvaluation => {
                self.complete_stage::<StrengthEvaluation>(case_id, slugs::STRENGTH_EVALUATION, stage)
                    .await?
            }
            PipelineStage::GapAnalysis => {
                self.complete_stage::<GapAnalysis>(case_id, slugs::GAP_ANALYSIS, stage)
                    .await?
            }
            PipelineStage::CaseStrategy => {
                self.complete_stage::<CaseStrategy>(case_id, slugs::CASE_STRATEGY, stage)
                    .await?
            }
            PipelineStage::Consolidation => {
                self.complete_stage::<Consolidation>(case_id, slugs::CONSOLIDATION, stage)
                    .await?
            }
        };

        let record = self
            .store
            .append_stage_output(case_id, stage, &output)
            .await?;
        tracing::info!(case_id, %stage, record_id = %record.id, "stage output stored");
        Ok(record)
    }

    /// Complete against the stage schema, decode into `T`, and re-encode so
    /// only fields `T` knows are stored.
    async fn complete_stage<T: DeserializeOwned + Serialize>(
        &self,
        case_id: &str,
        slug: &str,
        stage: PipelineStage,
    ) -> Result<Value, PipelineError> {
        let context = self.stage_context(case_id, stage).await?;
        tracing::debug!(case_id, %stage, context_len = context.len(), "running stage");
        let output: T = self
            .completer
            .complete(slug, stage.schema_name(), &[("context", context.as_str())])
            .await?;
        Ok(serde_json::to_value(output)?)
    }
}
