//! Two-pass risk computation.
//!
//! Pass 1 asks for qualitative findings only. Pass 2 asks for a base rate and
//! named integer adjustments; the total, the clamp, the secondary
//! request-for-evidence probability, and the filing recommendation are all
//! computed here, never taken from the model. There are no retries between
//! passes.

use std::cmp::Reverse;

use dossier_core::entities::{
    EvidenceInventory, OverallAssessment, ProbabilityBreakdown, ProbabilityDraft,
    QualitativeRiskFindings, RedFlag, RiskAssessment, StageOutputRecord,
};
use dossier_core::enums::{FilingRecommendation, PipelineStage, RiskLevel, Severity};
use dossier_llm::prompts::slugs;
use dossier_schema::names;
use serde::Serialize;

use crate::{Pipeline, PipelineError};

pub const MIN_DENIAL_PCT: i32 = 5;
pub const MAX_DENIAL_PCT: i32 = 95;
/// Request-for-evidence likelihood is 1.5x the denial probability, capped.
pub const RFE_CAP_PCT: i32 = 85;
/// At or below this denial probability the case can be filed as is.
pub const FILE_NOW_MAX_PCT: i32 = 30;
/// At or below this the case should be strengthened before filing.
pub const STRENGTHEN_FIRST_MAX_PCT: i32 = 55;

/// Upstream stages folded into the risk context when present.
const OPTIONAL_UPSTREAM: [PipelineStage; 3] = [
    PipelineStage::GapAnalysis,
    PipelineStage::CaseStrategy,
    PipelineStage::Consolidation,
];

// ---------------------------------------------------------------------------
// Pass 1 rules
// ---------------------------------------------------------------------------

/// Apply the inventory hard rules to pass-1 findings.
///
/// Every critical inventory gap appears as a `Critical` red flag. With no
/// documents and no extraction there is nothing to ground a strength in, so
/// strengths are dropped. With no recommenders the letter portfolio is
/// `Critical`. Red flags end up ordered by severity, highest first.
pub fn enforce_inventory_rules(findings: &mut QualitativeRiskFindings, inventory: &EvidenceInventory) {
    for gap in inventory.critical_gaps() {
        let present = findings
            .red_flags
            .iter()
            .any(|flag| flag.severity == Severity::Critical && flag.title == gap);
        if !present {
            findings.red_flags.push(RedFlag {
                severity: Severity::Critical,
                title: gap.to_string(),
                detail: String::new(),
            });
        }
    }
    if inventory.document_count == 0 && !inventory.has_extraction {
        findings.strengths.clear();
    }
    if inventory.recommender_count == 0 {
        findings.letter_assessment.adequacy = RiskLevel::Critical;
    }
    findings.red_flags.sort_by_key(|flag| Reverse(flag.severity));
}

// ---------------------------------------------------------------------------
// Pass 2 arithmetic
// ---------------------------------------------------------------------------

/// Sum the draft and clamp the total to `[MIN_DENIAL_PCT, MAX_DENIAL_PCT]`.
#[must_use]
pub fn compute_breakdown(draft: &ProbabilityDraft) -> ProbabilityBreakdown {
    let unclamped_total = draft
        .adjustments
        .iter()
        .fold(draft.base_rate_pct, |total, a| total.saturating_add(a.points));
    ProbabilityBreakdown {
        base_rate_pct: draft.base_rate_pct,
        adjustments: draft.adjustments.clone(),
        unclamped_total,
        final_denial_probability: unclamped_total.clamp(MIN_DENIAL_PCT, MAX_DENIAL_PCT),
    }
}

/// `round(denial * 1.5)`, capped at [`RFE_CAP_PCT`].
#[must_use]
pub fn rfe_probability(denial_pct: i32) -> i32 {
    let denial = denial_pct.clamp(0, 100);
    ((denial * 3 + 1) / 2).min(RFE_CAP_PCT)
}

#[must_use]
pub const fn recommend(denial_pct: i32) -> FilingRecommendation {
    if denial_pct <= FILE_NOW_MAX_PCT {
        FilingRecommendation::FileNow
    } else if denial_pct <= STRENGTHEN_FIRST_MAX_PCT {
        FilingRecommendation::StrengthenFirst
    } else {
        FilingRecommendation::MajorGaps
    }
}

/// Combine both passes. The overall denial probability is copied from the
/// breakdown, so the two can never disagree.
#[must_use]
pub fn finalize(
    inventory: EvidenceInventory,
    findings: QualitativeRiskFindings,
    draft: &ProbabilityDraft,
) -> RiskAssessment {
    let breakdown = compute_breakdown(draft);
    let denial = breakdown.final_denial_probability;
    RiskAssessment {
        inventory,
        findings,
        overall_assessment: OverallAssessment {
            denial_probability_pct: denial,
            rfe_probability_pct: rfe_probability(denial),
            recommendation: recommend(denial),
            summary: draft.summary.clone(),
        },
        probability_breakdown: breakdown,
    }
}

// ---------------------------------------------------------------------------
// Stage
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct RiskRun {
    pub assessment: RiskAssessment,
    pub record: StageOutputRecord,
}

impl Pipeline {
    /// Run both risk passes and store the assessment as the
    /// `risk_probability` stage output.
    ///
    /// # Errors
    ///
    /// - `PipelineError::PredecessorMissing` without any completion call
    ///   when no strength evaluation is stored.
    /// - `PipelineError::SchemaValidation` if either pass does not conform.
    /// - `PipelineError::Database` on storage failures.
    pub async fn assess_risk(&self, case_id: &str) -> Result<RiskRun, PipelineError> {
        let stage = PipelineStage::RiskProbability;
        let mut context = self.stage_context(case_id, stage).await?;
        for upstream in OPTIONAL_UPSTREAM {
            if let Some(output) = self.store.latest_stage_output(case_id, upstream).await? {
                context.push_str(&format!(
                    "## {upstream}\n\n{}\n\n",
                    serde_json::to_string_pretty(&output.output)?
                ));
            }
        }
        let inventory = self.store.evidence_inventory(case_id).await?;
        let inventory_text = inventory.render();

        tracing::debug!(case_id, "risk pass 1");
        let mut findings: QualitativeRiskFindings = self
            .completer
            .complete(
                slugs::RISK_FINDINGS,
                names::RISK_FINDINGS,
                &[("context", context.as_str()), ("inventory", inventory_text.as_str())],
            )
            .await?;
        enforce_inventory_rules(&mut findings, &inventory);

        tracing::debug!(case_id, "risk pass 2");
        let findings_text = serde_json::to_string_pretty(&findings)?;
        let draft: ProbabilityDraft = self
            .completer
            .complete(
                slugs::PROBABILITY_DRAFT,
                names::PROBABILITY_DRAFT,
                &[
                    ("findings", findings_text.as_str()),
                    ("inventory", inventory_text.as_str()),
                ],
            )
            .await?;

        let assessment = finalize(inventory, findings, &draft);
        let record = self
            .store
            .append_stage_output(case_id, stage, &serde_json::to_value(&assessment)?)
            .await?;
        tracing::info!(
            case_id,
            denial_pct = assessment.overall_assessment.denial_probability_pct,
            record_id = %record.id,
            "risk assessment stored"
        );
        Ok(RiskRun { assessment, record })
    }
}
