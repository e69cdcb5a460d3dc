use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{Criterion, FilingRecommendation, RiskLevel, Severity};

/// Read-only evidence inventory consumed by both risk passes.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct EvidenceInventory {
    pub document_count: u32,
    pub recommender_count: u32,
    pub has_profile: bool,
    pub has_extraction: bool,
}

impl EvidenceInventory {
    /// Inventory conditions that must surface as top-severity red flags.
    #[must_use]
    pub fn critical_gaps(&self) -> Vec<&'static str> {
        let mut gaps = Vec::new();
        if self.document_count == 0 {
            gaps.push("no supporting documents uploaded");
        }
        if self.recommender_count == 0 {
            gaps.push("no recommenders identified");
        }
        if !self.has_extraction {
            gaps.push("no evidence extraction on record");
        }
        gaps
    }

    /// Compact text form embedded in risk prompts.
    #[must_use]
    pub fn render(&self) -> String {
        format!(
            "documents: {}\nrecommenders: {}\nprofile: {}\nextraction: {}",
            self.document_count,
            self.recommender_count,
            if self.has_profile { "present" } else { "absent" },
            if self.has_extraction { "present" } else { "absent" },
        )
    }
}

// ---------------------------------------------------------------------------
// Pass 1: qualitative findings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CriterionRisk {
    pub criterion: Criterion,
    pub level: RiskLevel,
    pub rationale: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RedFlag {
    pub severity: Severity,
    pub title: String,
    #[serde(default)]
    pub detail: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct LetterPortfolioAssessment {
    pub adequacy: RiskLevel,
    pub summary: String,
    #[serde(default)]
    pub gaps: Vec<String>,
}

/// Output of the qualitative pass. Contains no numeric probabilities.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct QualitativeRiskFindings {
    pub criterion_risks: Vec<CriterionRisk>,
    #[serde(default)]
    pub red_flags: Vec<RedFlag>,
    #[serde(default)]
    pub strengths: Vec<String>,
    pub letter_assessment: LetterPortfolioAssessment,
}

// ---------------------------------------------------------------------------
// Pass 2: quantitative output
// ---------------------------------------------------------------------------

/// A named, signed adjustment in whole percentage points.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ProbabilityAdjustment {
    pub factor: String,
    pub points: i32,
    #[serde(default)]
    pub rationale: String,
}

/// What the model proposes in pass 2. Totals are recomputed, never trusted.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ProbabilityDraft {
    pub base_rate_pct: i32,
    pub adjustments: Vec<ProbabilityAdjustment>,
    pub summary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ProbabilityBreakdown {
    pub base_rate_pct: i32,
    pub adjustments: Vec<ProbabilityAdjustment>,
    /// Base rate plus all adjustments, before clamping.
    pub unclamped_total: i32,
    pub final_denial_probability: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct OverallAssessment {
    /// Always equal to `probability_breakdown.final_denial_probability`.
    pub denial_probability_pct: i32,
    pub rfe_probability_pct: i32,
    pub recommendation: FilingRecommendation,
    pub summary: String,
}

/// Persisted output of the risk-probability stage.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RiskAssessment {
    pub inventory: EvidenceInventory,
    pub findings: QualitativeRiskFindings,
    pub probability_breakdown: ProbabilityBreakdown,
    pub overall_assessment: OverallAssessment,
}

impl RiskAssessment {
    /// The single-source-of-truth invariant between the two reported values.
    #[must_use]
    pub const fn is_consistent(&self) -> bool {
        self.overall_assessment.denial_probability_pct
            == self.probability_breakdown.final_denial_probability
    }
}
