use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::evidence::EvidenceCollections;
use crate::enums::{Criterion, Strength};

/// Per-criterion outcome of extraction. Present for all ten criteria, with an
/// explicit `None` record when nothing was found.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CriterionSummary {
    pub criterion: Criterion,
    pub evidence_count: u32,
    pub strength: Strength,
    #[serde(default)]
    pub reason: String,
    /// Short supporting excerpts, bounded by the pipeline configuration.
    #[serde(default)]
    pub evidence: Vec<String>,
}

impl CriterionSummary {
    /// Summary synthesized for a criterion without a successful unit.
    #[must_use]
    pub fn empty(criterion: Criterion) -> Self {
        Self {
            criterion,
            evidence_count: 0,
            strength: Strength::None,
            reason: String::new(),
            evidence: Vec::new(),
        }
    }

    /// Drop excerpts beyond `max`.
    pub fn truncate_evidence(&mut self, max: usize) {
        self.evidence.truncate(max);
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct PersonalInfo {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub citizenship: Option<String>,
    #[serde(default)]
    pub field_of_expertise: Option<String>,
    #[serde(default)]
    pub current_position: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Education {
    pub institution: String,
    #[serde(default)]
    pub degree: Option<String>,
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct WorkExperience {
    pub employer: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
}

/// Personal, education, and work-history sub-records of a case.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Background {
    #[serde(default)]
    pub personal_info: PersonalInfo,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub work_experience: Vec<WorkExperience>,
}

/// Aggregate result of one extraction run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ExtractionDocument {
    #[serde(default)]
    pub evidence: EvidenceCollections,
    /// One entry per criterion, in canonical order.
    #[serde(default)]
    pub criteria_summary: Vec<CriterionSummary>,
    #[serde(default)]
    pub background: Background,
}

impl ExtractionDocument {
    #[must_use]
    pub fn summary_for(&self, criterion: Criterion) -> Option<&CriterionSummary> {
        self.criteria_summary
            .iter()
            .find(|summary| summary.criterion == criterion)
    }

    /// Number of criteria whose summary is `Strong`.
    #[must_use]
    pub fn strong_count(&self) -> usize {
        self.criteria_summary
            .iter()
            .filter(|s| s.strength == Strength::Strong)
            .count()
    }
}

/// What one criterion extraction unit returns.
///
/// `criterion` is pinned per unit in the registered schema; the summary's own
/// criterion is overwritten with it during assembly.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CriterionUnitOutput {
    pub criterion: Criterion,
    #[serde(default)]
    pub evidence: EvidenceCollections,
    pub summary: CriterionSummary,
}

/// A persisted extraction run. Later runs supersede earlier ones.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ExtractionRecord {
    pub id: String,
    pub case_id: String,
    pub document: ExtractionDocument,
    /// Criteria whose unit failed during this run.
    #[serde(default)]
    pub failed_criteria: Vec<Criterion>,
    pub created_at: DateTime<Utc>,
}
