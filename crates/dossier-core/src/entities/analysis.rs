use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{Criterion, Strength, VersionSource};

/// Current standing of one criterion inside an analysis version.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CriterionAssessment {
    pub criterion: Criterion,
    pub strength: Strength,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub evidence: Vec<String>,
}

impl CriterionAssessment {
    #[must_use]
    pub const fn seed(criterion: Criterion) -> Self {
        Self {
            criterion,
            strength: Strength::None,
            reason: String::new(),
            evidence: Vec::new(),
        }
    }
}

/// An externally proposed change to one criterion.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CriterionUpdate {
    pub criterion: Criterion,
    pub strength: Strength,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub evidence: Vec<String>,
}

/// Output of the relevance pass: which criteria a new document may affect.
///
/// A hint, not a gate. Criteria left out are not re-evaluated.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RelevanceHint {
    #[serde(default)]
    pub criteria: Vec<Criterion>,
    #[serde(default)]
    pub rationale: String,
}

/// Immutable, numbered snapshot of a case's criteria.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AnalysisVersion {
    pub id: String,
    pub case_id: String,
    /// Starts at 1 and increases by exactly one per append.
    pub version: u32,
    /// All ten criteria in canonical order.
    pub criteria: Vec<CriterionAssessment>,
    pub strong_count: u32,
    pub weak_count: u32,
    pub source: VersionSource,
    pub created_at: DateTime<Utc>,
}

impl AnalysisVersion {
    #[must_use]
    pub fn assessment(&self, criterion: Criterion) -> Option<&CriterionAssessment> {
        self.criteria.iter().find(|a| a.criterion == criterion)
    }

    #[must_use]
    pub fn strength_of(&self, criterion: Criterion) -> Strength {
        self.assessment(criterion)
            .map_or(Strength::None, |a| a.strength)
    }

    #[must_use]
    pub fn summary(&self) -> AnalysisSummary {
        AnalysisSummary::from_assessments(self.version, &self.criteria)
    }
}

/// Derived counts for display and downstream prompts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AnalysisSummary {
    pub version: u32,
    /// Number of criteria at `Strong`.
    pub criteria_satisfied_count: u32,
    pub weak_count: u32,
    pub none_count: u32,
}

impl AnalysisSummary {
    #[must_use]
    pub fn from_assessments(version: u32, criteria: &[CriterionAssessment]) -> Self {
        let mut summary = Self {
            version,
            criteria_satisfied_count: 0,
            weak_count: 0,
            none_count: 0,
        };
        for assessment in criteria {
            match assessment.strength {
                Strength::Strong => summary.criteria_satisfied_count += 1,
                Strength::Weak => summary.weak_count += 1,
                Strength::None => summary.none_count += 1,
            }
        }
        summary
    }
}
