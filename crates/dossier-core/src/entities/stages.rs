use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::enums::{Criterion, PipelineStage, Severity, Strength};
use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// Strength evaluation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CriterionEvaluation {
    pub criterion: Criterion,
    pub strength: Strength,
    /// 1 (no support) to 10 (overwhelming support).
    pub score: u8,
    pub rationale: String,
    #[serde(default)]
    pub key_evidence: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StrengthEvaluation {
    pub criteria: Vec<CriterionEvaluation>,
    pub overall_summary: String,
}

// ---------------------------------------------------------------------------
// Gap analysis
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct EvidenceGap {
    pub criterion: Criterion,
    pub severity: Severity,
    pub description: String,
    #[serde(default)]
    pub recommended_evidence: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct GapAnalysis {
    pub gaps: Vec<EvidenceGap>,
    /// Criteria worth pursuing first.
    #[serde(default)]
    pub priority_criteria: Vec<Criterion>,
    pub summary: String,
}

// ---------------------------------------------------------------------------
// Case strategy
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StrategyAction {
    pub title: String,
    #[serde(default)]
    pub criterion: Option<Criterion>,
    /// 1 = most urgent.
    pub priority: u8,
    #[serde(default)]
    pub timeline: Option<String>,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CaseStrategy {
    pub target_criteria: Vec<Criterion>,
    pub actions: Vec<StrategyAction>,
    pub narrative: String,
}

// ---------------------------------------------------------------------------
// Consolidation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Consolidation {
    pub executive_summary: String,
    pub strongest_criteria: Vec<Criterion>,
    #[serde(default)]
    pub action_plan: Vec<String>,
    #[serde(default)]
    pub open_risks: Vec<String>,
}

// ---------------------------------------------------------------------------
// Stored envelope
// ---------------------------------------------------------------------------

/// One persisted output of a pipeline stage. Records accumulate per run; the
/// most recent one is "current".
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct StageOutputRecord {
    pub id: String,
    pub case_id: String,
    pub stage: PipelineStage,
    pub output: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl StageOutputRecord {
    /// Deserialize the stored output into its typed form.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if the stored JSON does not match `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, CoreError> {
        serde_json::from_value(self.output.clone()).map_err(|e| {
            CoreError::Validation(format!("stored {} output is malformed: {e}", self.stage))
        })
    }
}
